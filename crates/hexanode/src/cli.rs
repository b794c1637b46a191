//! Clap derive structures for the `hexanode` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hexanode -- curate views over Hexabus device endpoints
#[derive(Debug, Parser)]
#[command(
    name = "hexanode",
    version,
    about = "Manage Hexabus device views from the command line",
    long_about = "Create, edit and remove named views over the endpoints of known\n\
        Hexabus devices. Views are stored in devicetree.json inside the state\n\
        directory; devices are read from a hexinfo device dump.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Directory holding devicetree.json (overrides config)
    #[arg(long, env = "HEXANODE_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Device dump produced by hexinfo (overrides config)
    #[arg(long, short = 'd', env = "HEXANODE_DEVICES_FILE", global = true)]
    pub devices_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', env = "HEXANODE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create, edit and remove views
    #[command(alias = "v")]
    Views(ViewsArgs),

    /// Inspect devices from the device dump
    #[command(alias = "dev")]
    Devices(DevicesArgs),

    /// Inspect and initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Views ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ViewsArgs {
    #[command(subcommand)]
    pub command: ViewsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ViewsCommand {
    /// List all views in creation order
    #[command(alias = "ls")]
    List,

    /// Show one view
    #[command(alias = "get")]
    Show {
        /// View id
        id: String,
    },

    /// Create a new, empty view
    #[command(alias = "create")]
    New {
        /// Display name (defaults to the configured placeholder)
        #[arg(long, short = 'n')]
        name: Option<String>,
    },

    /// Replace the name and/or endpoint selection of a view
    Edit {
        /// View id
        id: String,

        /// New display name
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// New selection as JSON, e.g. '{"fd00::1": [2, 1]}'
        #[arg(long, conflicts_with = "devices_from_file")]
        devices: Option<String>,

        /// Read the new selection from a JSON file
        #[arg(long = "devices-from-file", value_name = "PATH")]
        devices_from_file: Option<PathBuf>,
    },

    /// Delete a view
    #[command(alias = "delete", alias = "remove")]
    Rm {
        /// View id
        id: String,
    },

    /// List the endpoints a view can select from
    Candidates {
        /// View id
        id: String,
    },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices in address order
    #[command(alias = "ls")]
    List,

    /// Show one device and its endpoints
    #[command(alias = "get")]
    Show {
        /// Device address
        ip: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the resolved configuration
    Show,

    /// Write a config file with the current settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
