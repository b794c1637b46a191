// ── Device dump import ──
//
// Reads the JSON device description emitted by the discovery tooling:
//
//   [ { "name": "...", "ip": "fd00::...", "endpoints": [ { "eid": 2, ... } ] } ]
//
// and turns it into the device population of a tree.

use std::net::IpAddr;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{Device, Endpoint};
use crate::persist::read_document;
use crate::tree::DeviceTree;

#[derive(Debug, Deserialize)]
struct DumpEntry {
    #[serde(default)]
    name: String,
    ip: String,
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

impl DumpEntry {
    fn into_device(self) -> Result<Device, CoreError> {
        let ip: IpAddr = self
            .ip
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidAddress { value: self.ip.clone() })?;

        let endpoints = self.endpoints.into_iter().filter(|ep| {
            if ep.is_descriptor() {
                debug!(device = %ip, eid = ep.eid, "skipping descriptor endpoint");
                return false;
            }
            true
        });
        Ok(Device::with_endpoints(ip, self.name, endpoints))
    }
}

/// Read a device dump. Entries without a name are dropped.
pub fn read_device_dump(path: impl AsRef<Path>) -> Result<Vec<Device>, CoreError> {
    let path = path.as_ref();
    let doc = read_document(path)?;
    let entries: Vec<DumpEntry> =
        serde_json::from_str(&doc).map_err(|source| CoreError::MalformedDump {
            path: path.to_path_buf(),
            source,
        })?;

    let mut devices = Vec::with_capacity(entries.len());
    for entry in entries {
        // An empty name means the device did not answer the description query.
        if entry.name.is_empty() {
            warn!(ip = %entry.ip, "skipping unnamed device");
            continue;
        }
        devices.push(entry.into_device()?);
    }
    Ok(devices)
}

impl DeviceTree {
    /// Replace the device population with the content of a device dump.
    ///
    /// Returns the number of devices now known. Views are untouched, and on
    /// error the previous devices are kept.
    pub fn import_devices(&mut self, path: impl AsRef<Path>) -> Result<usize, CoreError> {
        let path = path.as_ref();
        let devices = read_device_dump(path)?;
        self.replace_devices(devices);
        info!(path = %path.display(), devices = self.device_count(), "devices imported");
        Ok(self.device_count())
    }
}
