// ── View persistence ──
//
// On-disk shape: one JSON object mapping view id to
// `{ "name": ..., "devices": ... }`. Object order is creation order, so a
// save/load cycle reproduces the enumeration order of `views()`.
//
// Devices are not written; they come from discovery.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{DeviceSelection, View, ViewId};
use crate::tree::DeviceTree;

#[derive(Serialize)]
struct RecordRef<'a> {
    name: &'a str,
    devices: &'a DeviceSelection,
}

#[derive(Deserialize)]
struct Record {
    name: String,
    devices: DeviceSelection,
}

/// Serialize the view set of `tree` to the persisted document form.
pub fn encode(tree: &DeviceTree) -> Result<String, CoreError> {
    let doc: IndexMap<&ViewId, RecordRef<'_>> = tree
        .views()
        .map(|v| {
            (
                &v.id,
                RecordRef {
                    name: &v.name,
                    devices: &v.devices,
                },
            )
        })
        .collect();
    serde_json::to_string_pretty(&doc).map_err(CoreError::Encode)
}

/// Parse a persisted document into a view set, keeping document order.
pub fn decode(doc: &str) -> Result<IndexMap<ViewId, View>, serde_json::Error> {
    let records: IndexMap<ViewId, Record> = serde_json::from_str(doc)?;
    Ok(records
        .into_iter()
        .map(|(id, r)| {
            let view = View::new(id.clone(), r.name, r.devices);
            (id, view)
        })
        .collect())
}

/// Sibling path used while a save is in flight.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

pub(crate) fn read_document(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| CoreError::from_io(path, e))
}

impl DeviceTree {
    /// Write the view set to `path`, replacing any previous content.
    ///
    /// The document is staged next to `path` and renamed into place.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        let doc = encode(self)?;
        write_replace(path, doc.as_bytes())?;
        info!(path = %path.display(), views = self.view_count(), "device tree saved");
        Ok(())
    }

    /// Build a tree whose views are read from `path`. The tree has no devices.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let mut tree = Self::new();
        tree.load_views(path)?;
        Ok(tree)
    }

    /// Replace only the view set with the content of `path`.
    ///
    /// On error the current views are left as they were.
    pub fn load_views(&mut self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        let doc = read_document(path)?;
        let views = decode(&doc).map_err(|source| CoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), views = views.len(), "device tree loaded");
        self.replace_views(views);
        Ok(())
    }
}

fn write_replace(path: &Path, bytes: &[u8]) -> Result<(), CoreError> {
    let io_err = |source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let staging = staging_path(path);
    fs::write(&staging, bytes).map_err(io_err)?;
    fs::rename(&staging, path).map_err(|source| {
        let _ = fs::remove_file(&staging);
        io_err(source)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> DeviceTree {
        let mut tree = DeviceTree::new();
        tree.add_view(
            "Kitchen",
            DeviceSelection::from(json!({"fd00::1": [3, 1], "fd00::2": [7]})),
        );
        tree.add_view("Office", DeviceSelection::from(json!({"10.0.0.4": []})));
        tree
    }

    fn snapshot(tree: &DeviceTree) -> Vec<View> {
        tree.views().cloned().collect()
    }

    #[test]
    fn round_trip_preserves_views_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devicetree.json");
        let tree = sample();

        tree.save(&path).unwrap();
        let loaded = DeviceTree::load(&path).unwrap();

        assert_eq!(snapshot(&loaded), snapshot(&tree));
    }

    #[test]
    fn document_shape_is_id_to_name_and_devices() {
        let mut tree = DeviceTree::new();
        let id = tree
            .add_view("Office", DeviceSelection::from(json!({"10.0.0.4": [2]})))
            .id
            .clone();

        let doc: serde_json::Value = serde_json::from_str(&encode(&tree).unwrap()).unwrap();
        assert_eq!(
            doc,
            json!({ id.as_str(): {"name": "Office", "devices": {"10.0.0.4": [2]}} })
        );
    }

    #[test]
    fn decode_accepts_hand_written_ids() {
        let views = decode(
            r#"{"v1": {"name": "Kitchen", "devices": {}},
                "v2": {"name": "Office", "devices": [1, 2]}}"#,
        )
        .unwrap();
        let names: Vec<&str> = views.values().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Kitchen", "Office"]);
        assert_eq!(views["v2"].devices.as_value(), &json!([1, 2]));
    }

    #[test]
    fn save_overwrites_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        sample().save(&path).unwrap();
        DeviceTree::new().save(&path).unwrap();

        assert_eq!(DeviceTree::load(&path).unwrap().view_count(), 0);
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn missing_file_is_distinct_from_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = DeviceTree::load(dir.path().join("absent.json")).unwrap_err();
        assert!(missing.is_missing_file());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(DeviceTree::load(&bad).unwrap_err().is_parse());
    }

    #[test]
    fn wrong_shape_is_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shape.json");
        for doc in [r#"[1, 2]"#, r#"{"v1": {"name": 4, "devices": {}}}"#, r#"{"v1": {}}"#] {
            fs::write(&path, doc).unwrap();
            assert!(DeviceTree::load(&path).unwrap_err().is_parse(), "{doc}");
        }
    }

    #[test]
    fn failed_load_keeps_current_views() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "null").unwrap();

        let mut tree = sample();
        let before = snapshot(&tree);
        assert!(tree.load_views(&path).is_err());
        assert_eq!(snapshot(&tree), before);
    }

    #[test]
    fn failed_rename_removes_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("occupied");
        fs::create_dir_all(path.join("inner")).unwrap();

        let err = sample().save(&path).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
        assert!(!staging_path(&path).exists());
    }
}
