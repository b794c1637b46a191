// ── Candidate endpoints for view editing ──
//
// Recomputed from the live device population on every call; nothing here
// is cached or persisted.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{Device, DeviceSelection, Endpoint, ViewId};
use crate::tree::DeviceTree;

/// Endpoints of one device that a view may include.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub ip: IpAddr,
    /// Non-infrastructure endpoints, highest eid first.
    #[serde(rename = "eids")]
    pub endpoints: Vec<Endpoint>,
}

impl Candidate {
    fn from_device(device: &Device) -> Self {
        let mut endpoints = Vec::new();
        device.for_each_endpoint(|ep| {
            if !ep.function.is_infrastructure() {
                endpoints.push(ep.clone());
            }
        });
        endpoints.sort_by(|a, b| b.eid.cmp(&a.eid));

        Self {
            name: device.name.clone(),
            ip: device.ip,
            endpoints,
        }
    }

    pub fn eids(&self) -> Vec<u32> {
        self.endpoints.iter().map(|ep| ep.eid).collect()
    }
}

/// Everything an editor needs to present one view for editing.
#[derive(Debug, Clone, Serialize)]
pub struct ViewEditor {
    pub view_id: ViewId,
    pub view_name: String,
    pub used_devices: DeviceSelection,
    pub known_devices: BTreeMap<IpAddr, Candidate>,
}

impl DeviceTree {
    /// Candidate endpoints of every device, keyed by address.
    pub fn candidates(&self) -> BTreeMap<IpAddr, Candidate> {
        let mut out = BTreeMap::new();
        self.for_each(|device| {
            out.insert(device.ip, Candidate::from_device(device));
        });
        out
    }

    /// Pair a view's current selection with the candidates it can draw from.
    pub fn edit_view(&self, id: &str) -> Result<ViewEditor, CoreError> {
        let view = self.get_view(id)?;
        Ok(ViewEditor {
            view_id: view.id.clone(),
            view_name: view.name.clone(),
            used_devices: view.devices.clone(),
            known_devices: self.candidates(),
        })
    }
}
