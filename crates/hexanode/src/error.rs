//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use hexanode_config::ConfigError;
use hexanode_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CORRUPT_STATE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(hexanode::not_found),
        help("Run: hexanode {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── State ────────────────────────────────────────────────────────

    #[error("Malformed file {}", path.display())]
    #[diagnostic(
        code(hexanode::corrupt_state),
        help(
            "The file exists but could not be parsed.\n\
             Fix it or move it aside; hexanode will not overwrite it."
        )
    )]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed device dump {}", path.display())]
    #[diagnostic(
        code(hexanode::malformed_dump),
        help("Regenerate the dump with hexinfo or point --devices-file at another one.")
    )]
    MalformedDump {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No device dump configured")]
    #[diagnostic(
        code(hexanode::no_devices_file),
        help(
            "Pass --devices-file, set HEXANODE_DEVICES_FILE, or add\n\
             devices_file to the config file."
        )
    )]
    NoDevicesFile,

    #[error("Could not access {}", path.display())]
    #[diagnostic(code(hexanode::io))]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hexanode::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(hexanode::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file already exists at {}", path.display())]
    #[diagnostic(code(hexanode::config_exists), help("Use --force to overwrite it."))]
    ConfigExists { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(code(hexanode::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::CorruptState { .. } => exit_code::CORRUPT_STATE,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::MalformedDump { .. }
            | Self::NoDevicesFile => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ViewNotFound { id } => CliError::NotFound {
                resource_type: "view".into(),
                identifier: id,
                list_command: "views list".into(),
            },

            CoreError::StateFileMissing { path } => CliError::Storage {
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
                path,
            },

            CoreError::Io { path, source } => CliError::Storage { path, source },

            CoreError::Parse { path, source } => CliError::CorruptState { path, source },

            CoreError::MalformedDump { path, source } => CliError::MalformedDump { path, source },

            CoreError::InvalidAddress { value } => CliError::Validation {
                field: "ip".into(),
                reason: format!("'{value}' is not an IP address"),
            },

            CoreError::Encode(e) => CliError::Internal(e.to_string()),
        }
    }
}
