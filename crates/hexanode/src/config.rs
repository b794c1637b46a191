//! CLI configuration: thin wrapper around `hexanode_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--state-dir, --devices-file, --output, --color).

use std::path::PathBuf;

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use hexanode_config::{Config, config_path, load_config, save_config};

/// Settings for one command invocation, after flags and config are merged.
#[derive(Debug)]
pub struct Context {
    pub state_path: PathBuf,
    pub devices_file: Option<PathBuf>,
    pub view_name: String,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

/// Merge the loaded config with global flags. Flags win.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Context, CliError> {
    let state_path = global.state_dir.as_ref().map_or_else(
        || cfg.devicetree_path(),
        |dir| dir.join(hexanode_config::STATE_FILE_NAME),
    );

    let output = match global.output {
        Some(o) => o,
        None => parse_enum::<OutputFormat>("defaults.output", &cfg.defaults.output)?,
    };
    let color = match global.color {
        Some(c) => c,
        None => parse_enum::<ColorMode>("defaults.color", &cfg.defaults.color)?,
    };

    Ok(Context {
        state_path,
        devices_file: global.devices_file.clone().or_else(|| cfg.devices_file.clone()),
        view_name: cfg.defaults.view_name.clone(),
        output,
        color: output::should_color(color),
        quiet: global.quiet,
        yes: global.yes,
    })
}

fn parse_enum<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}
