// ── Device tree ──
//
// Root of the in-memory model: every known device keyed by address, plus
// the view registry. Mutations never save; callers persist explicitly
// with `save()` once they are done mutating.

use std::collections::BTreeMap;
use std::net::IpAddr;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Device, DeviceSelection, View, ViewId};

/// Devices and views of one running process.
///
/// Views enumerate in creation order; devices in address order.
#[derive(Debug, Clone, Default)]
pub struct DeviceTree {
    devices: BTreeMap<IpAddr, Device>,
    pub(crate) views: IndexMap<ViewId, View>,
}

impl DeviceTree {
    pub fn new() -> Self {
        Self::default()
    }

    // ── View registry ───────────────────────────────────────────────

    /// Create a view under a fresh id and return it.
    pub fn add_view(&mut self, name: impl Into<String>, devices: DeviceSelection) -> &View {
        let id = loop {
            let candidate = ViewId::generate();
            if !self.views.contains_key(&candidate) {
                break candidate;
            }
        };
        let view = View::new(id.clone(), name, devices);
        debug!(view_id = %id, name = %view.name, "view added");
        self.views.entry(id).or_insert(view)
    }

    pub fn view(&self, id: &str) -> Option<&View> {
        self.views.get(id)
    }

    /// Like [`view`](Self::view), with a missing id reported as an error.
    pub fn get_view(&self, id: &str) -> Result<&View, CoreError> {
        self.view(id).ok_or_else(|| not_found(id))
    }

    /// Replace the name and selection of an existing view.
    pub fn update_view(
        &mut self,
        id: &str,
        name: impl Into<String>,
        devices: DeviceSelection,
    ) -> Result<&View, CoreError> {
        let view = self.views.get_mut(id).ok_or_else(|| not_found(id))?;
        view.name = name.into();
        view.devices = devices;
        debug!(view_id = %id, name = %view.name, "view updated");
        Ok(&*view)
    }

    /// Remove a view. Remaining views keep their relative order.
    pub fn remove_view(&mut self, id: &str) -> Result<View, CoreError> {
        let view = self.views.shift_remove(id).ok_or_else(|| not_found(id))?;
        debug!(view_id = %id, "view removed");
        Ok(view)
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub(crate) fn replace_views(&mut self, views: IndexMap<ViewId, View>) {
        self.views = views;
    }

    // ── Device enumeration ──────────────────────────────────────────

    pub fn for_each(&self, mut visitor: impl FnMut(&Device)) {
        for device in self.devices.values() {
            visitor(device);
        }
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn device(&self, ip: &IpAddr) -> Option<&Device> {
        self.devices.get(ip)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    // ── Discovery-side mutation ─────────────────────────────────────

    /// Insert or replace a device. Returns `true` if the address was new.
    pub fn upsert_device(&mut self, device: Device) -> bool {
        let ip = device.ip;
        let is_new = self.devices.insert(ip, device).is_none();
        debug!(device = %ip, is_new, "device upserted");
        is_new
    }

    pub fn remove_device(&mut self, ip: &IpAddr) -> Option<Device> {
        self.devices.remove(ip)
    }

    /// Swap in a complete device population. Views are untouched.
    pub fn replace_devices(&mut self, devices: impl IntoIterator<Item = Device>) {
        self.devices = devices.into_iter().map(|d| (d.ip, d)).collect();
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::ViewNotFound { id: id.to_owned() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Endpoint, EndpointFunction};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashSet;

    fn ids(tree: &DeviceTree) -> Vec<String> {
        tree.views().map(|v| v.id.to_string()).collect()
    }

    #[test]
    fn add_then_get_returns_given_fields() {
        let mut tree = DeviceTree::new();
        let devices = DeviceSelection::from(json!({"fd00::1": [2, 1]}));
        let id = tree.add_view("Kitchen", devices.clone()).id.clone();

        let view = tree.get_view(id.as_str()).unwrap();
        assert_eq!(view.name, "Kitchen");
        assert_eq!(view.devices, devices);
    }

    #[test]
    fn ids_stay_unique_across_removals() {
        let mut tree = DeviceTree::new();
        let mut seen = HashSet::new();
        for round in 0..50 {
            let id = tree.add_view("v", DeviceSelection::empty()).id.clone();
            assert!(seen.insert(id.clone()), "duplicate id {id}");
            if round % 3 == 0 {
                tree.remove_view(id.as_str()).unwrap();
            }
        }
    }

    #[test]
    fn update_missing_is_not_found_and_changes_nothing() {
        let mut tree = DeviceTree::new();
        tree.add_view("a", DeviceSelection::empty());
        let before: Vec<View> = tree.views().cloned().collect();

        let err = tree
            .update_view("nope", "b", DeviceSelection::from(json!([1])))
            .unwrap_err();
        assert!(err.is_not_found());

        let after: Vec<View> = tree.views().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut tree = DeviceTree::new();
        assert!(tree.remove_view("ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn remove_leaves_others_in_order() {
        let mut tree = DeviceTree::new();
        let a = tree.add_view("a", DeviceSelection::empty()).id.clone();
        let b = tree.add_view("b", DeviceSelection::empty()).id.clone();
        let c = tree.add_view("c", DeviceSelection::empty()).id.clone();

        let removed = tree.remove_view(b.as_str()).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(ids(&tree), vec![a.to_string(), c.to_string()]);
    }

    #[test]
    fn view_lifecycle_scenario() {
        let mut tree = DeviceTree::new();
        let view = tree.add_view("Unnamed View", DeviceSelection::empty());
        assert_eq!(view.name, "Unnamed View");
        assert_eq!(view.devices.as_value(), &json!({}));
        let x = view.id.clone();

        tree.update_view(
            x.as_str(),
            "Living Room",
            DeviceSelection::from(json!({"192.168.1.5": [10, 11]})),
        )
        .unwrap();
        let view = tree.get_view(x.as_str()).unwrap();
        assert_eq!(view.name, "Living Room");
        assert_eq!(view.devices.as_value(), &json!({"192.168.1.5": [10, 11]}));

        tree.remove_view(x.as_str()).unwrap();
        assert!(tree.get_view(x.as_str()).unwrap_err().is_not_found());
    }

    #[test]
    fn devices_iterate_in_address_order() {
        let mut tree = DeviceTree::new();
        for (ip, name) in [("10.0.0.9", "c"), ("10.0.0.1", "a"), ("10.0.0.5", "b")] {
            tree.upsert_device(Device::new(ip.parse().unwrap(), name));
        }
        let mut names = Vec::new();
        tree.for_each(|d| names.push(d.name.clone()));
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn upsert_device_replaces_existing() {
        let mut tree = DeviceTree::new();
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        assert!(tree.upsert_device(Device::new(ip, "old")));
        assert!(!tree.upsert_device(Device::with_endpoints(
            ip,
            "new",
            [Endpoint::new(1, EndpointFunction::Sensor)],
        )));
        assert_eq!(tree.device_count(), 1);
        assert_eq!(tree.device(&ip).unwrap().name, "new");
    }

    #[test]
    fn stale_references_survive_device_removal() {
        let mut tree = DeviceTree::new();
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        tree.upsert_device(Device::new(ip, "lamp"));
        let id = tree
            .add_view("v", DeviceSelection::from(json!({"10.0.0.1": [1]})))
            .id
            .clone();

        tree.remove_device(&ip);
        let view = tree.get_view(id.as_str()).unwrap();
        assert_eq!(view.devices.references(), vec![(ip, 1)]);
        assert_eq!(tree.devices().count(), 0);
    }
}
