// ── View domain types ──
//
// A view is a user-curated selection of device endpoints. The selection
// payload belongs to whoever edits the view; the core only stores it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use uuid::Uuid;

// ── ViewId ──────────────────────────────────────────────────────────

/// Identifier of a view. Safe to embed in URLs and file paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
    /// A fresh random identifier (UUID v4, simple hex form).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ViewId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<&str> for ViewId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ViewId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for ViewId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ViewId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── DeviceSelection ─────────────────────────────────────────────────

/// Opaque selection payload of a view.
///
/// Any JSON value is accepted and round-tripped unchanged. Editors
/// conventionally store `{ "<device ip>": [eid, ...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceSelection(Value);

impl DeviceSelection {
    /// An empty object.
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// `(device, eid)` pairs, for payloads in the conventional shape.
    ///
    /// Entries that don't fit (non-address keys, non-array values,
    /// non-integer eids) are skipped. Nothing is checked against live devices.
    pub fn references(&self) -> Vec<(IpAddr, u32)> {
        let Value::Object(map) = &self.0 else {
            return Vec::new();
        };
        map.iter()
            .filter_map(|(key, eids)| Some((key.parse::<IpAddr>().ok()?, eids.as_array()?)))
            .flat_map(|(ip, eids)| {
                eids.iter()
                    .filter_map(|v| u32::try_from(v.as_u64()?).ok())
                    .map(move |eid| (ip, eid))
            })
            .collect()
    }
}

impl Default for DeviceSelection {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for DeviceSelection {
    fn from(v: Value) -> Self {
        Self(v)
    }
}

impl FromStr for DeviceSelection {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(Self)
    }
}

// ── View ────────────────────────────────────────────────────────────

/// A named, ordered selection of device endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub id: ViewId,
    pub name: String,
    pub devices: DeviceSelection,
}

impl View {
    pub(crate) fn new(id: ViewId, name: impl Into<String>, devices: DeviceSelection) -> Self {
        Self {
            id,
            name: name.into(),
            devices,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generated_ids_are_url_safe() {
        let id = ViewId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn selection_round_trips_arbitrary_json() {
        let raw = r#"{"b":[1],"a":{"nested":true},"c":null}"#;
        let sel: DeviceSelection = raw.parse().unwrap();
        assert_eq!(serde_json::to_string(&sel).unwrap(), raw);
    }

    #[test]
    fn references_skip_unconventional_entries() {
        let sel = DeviceSelection::from(json!({
            "192.168.1.5": [10, 11],
            "not-an-ip": [1],
            "fd00::1": "oops",
            "10.0.0.2": [3, "x", -1],
        }));
        let ip5: IpAddr = "192.168.1.5".parse().unwrap();
        let ip2: IpAddr = "10.0.0.2".parse().unwrap();
        assert_eq!(sel.references(), vec![(ip5, 10), (ip5, 11), (ip2, 3)]);
    }

    #[test]
    fn references_of_non_object_is_empty() {
        assert!(DeviceSelection::from(json!([1, 2])).references().is_empty());
    }
}
