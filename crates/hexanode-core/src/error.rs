// ── Core error types ──
//
// Outcomes surfaced to callers of the device tree. Callers decide the
// user-facing behavior; nothing here knows about HTTP or exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Registry errors ──────────────────────────────────────────────
    #[error("View not found: {id}")]
    ViewNotFound { id: String },

    // ── Persistence errors ───────────────────────────────────────────
    #[error("State file does not exist: {}", path.display())]
    StateFileMissing { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    // ── Device dump errors ───────────────────────────────────────────
    #[error("Malformed device dump {}: {source}", path.display())]
    MalformedDump {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid device address: {value}")]
    InvalidAddress { value: String },
}

impl CoreError {
    /// Wrap an I/O error, folding `NotFound` into [`CoreError::StateFileMissing`].
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::StateFileMissing { path }
        } else {
            Self::Io { path, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ViewNotFound { .. })
    }

    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::StateFileMissing { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
