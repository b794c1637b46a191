//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use hexanode_core::{DeviceSelection, DeviceTree, SharedDeviceTree};
use tracing::{debug, info, warn};

use crate::config::Context;
use crate::error::CliError;

/// Whether the device dump must be present for the command to make sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Devices {
    Skip,
    IfConfigured,
    Required,
}

/// Load the persisted views (and optionally the device dump) into a shared tree.
///
/// A missing state file starts an empty tree; a malformed one is an error.
pub fn open_tree(ctx: &Context, devices: Devices) -> Result<SharedDeviceTree, CliError> {
    let mut tree = match DeviceTree::load(&ctx.state_path) {
        Ok(tree) => tree,
        Err(e) if e.is_missing_file() => {
            info!(path = %ctx.state_path.display(), "no saved views yet, starting empty");
            DeviceTree::new()
        }
        Err(e) => return Err(e.into()),
    };

    match (devices, ctx.devices_file.as_deref()) {
        (Devices::Skip, _) => {}
        (_, Some(dump)) => {
            tree.import_devices(dump)?;
        }
        (Devices::IfConfigured, None) => {
            warn!("no device dump configured, candidate lists will be empty");
        }
        (Devices::Required, None) => return Err(CliError::NoDevicesFile),
    }

    debug!(
        views = tree.view_count(),
        devices = tree.device_count(),
        "device tree ready"
    );
    Ok(SharedDeviceTree::new(tree))
}

/// Parse a selection given inline or in a file.
pub fn read_selection(
    inline: Option<&str>,
    file: Option<&Path>,
) -> Result<Option<DeviceSelection>, CliError> {
    let (field, text) = match (inline, file) {
        (Some(text), _) => ("devices", text.to_owned()),
        (None, Some(path)) => ("devices-from-file", std::fs::read_to_string(path)?),
        (None, None) => return Ok(None),
    };
    text.parse::<DeviceSelection>()
        .map(Some)
        .map_err(|e| CliError::Validation {
            field: field.into(),
            reason: format!("invalid JSON: {e}"),
        })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inline_selection_parses() {
        let sel = read_selection(Some(r#"{"fd00::1": [2]}"#), None)
            .unwrap()
            .unwrap();
        assert_eq!(sel.as_value(), &json!({"fd00::1": [2]}));
    }

    #[test]
    fn no_selection_is_none() {
        assert!(read_selection(None, None).unwrap().is_none());
    }

    #[test]
    fn malformed_selection_is_validation_error() {
        let err = read_selection(Some("{oops"), None).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "devices"));
    }

    #[test]
    fn selection_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sel.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let sel = read_selection(None, Some(&path)).unwrap().unwrap();
        assert_eq!(sel.as_value(), &json!([1, 2, 3]));
    }
}
