// ── Device domain types ──

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::endpoint::Endpoint;

/// A networked device and its endpoints, in the order the device reported them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub ip: IpAddr,
    pub name: String,
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

impl Device {
    pub fn new(ip: IpAddr, name: impl Into<String>) -> Self {
        Self {
            ip,
            name: name.into(),
            endpoints: Vec::new(),
        }
    }

    /// Build a device from an endpoint list; later duplicates of an eid win.
    pub fn with_endpoints(
        ip: IpAddr,
        name: impl Into<String>,
        endpoints: impl IntoIterator<Item = Endpoint>,
    ) -> Self {
        let mut device = Self::new(ip, name);
        for ep in endpoints {
            device.upsert_endpoint(ep);
        }
        device
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn for_each_endpoint(&self, mut visitor: impl FnMut(&Endpoint)) {
        for ep in &self.endpoints {
            visitor(ep);
        }
    }

    pub fn endpoint(&self, eid: u32) -> Option<&Endpoint> {
        self.endpoints.iter().find(|ep| ep.eid == eid)
    }

    /// Insert or replace an endpoint. A replaced endpoint keeps its position.
    /// Returns `true` if the eid was new.
    pub fn upsert_endpoint(&mut self, endpoint: Endpoint) -> bool {
        match self.endpoints.iter_mut().find(|ep| ep.eid == endpoint.eid) {
            Some(slot) => {
                *slot = endpoint;
                false
            }
            None => {
                self.endpoints.push(endpoint);
                true
            }
        }
    }

    pub fn remove_endpoint(&mut self, eid: u32) -> Option<Endpoint> {
        let pos = self.endpoints.iter().position(|ep| ep.eid == eid)?;
        Some(self.endpoints.remove(pos))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::EndpointFunction;

    fn addr() -> IpAddr {
        "fd00::50:c4ff:fe04:8310".parse().unwrap()
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut dev = Device::with_endpoints(
            addr(),
            "plug",
            [
                Endpoint::new(1, EndpointFunction::Actor),
                Endpoint::new(2, EndpointFunction::Sensor),
            ],
        );
        assert!(!dev.upsert_endpoint(Endpoint::new(1, EndpointFunction::Sensor)));

        let eids: Vec<u32> = dev.endpoints().iter().map(|ep| ep.eid).collect();
        assert_eq!(eids, vec![1, 2]);
        assert_eq!(dev.endpoint(1).unwrap().function, EndpointFunction::Sensor);
    }

    #[test]
    fn for_each_endpoint_keeps_stored_order() {
        let dev = Device::with_endpoints(
            addr(),
            "plug",
            [3, 1, 7].map(|eid| Endpoint::new(eid, EndpointFunction::Sensor)),
        );
        let mut seen = Vec::new();
        dev.for_each_endpoint(|ep| seen.push(ep.eid));
        assert_eq!(seen, vec![3, 1, 7]);
    }

    #[test]
    fn remove_endpoint_missing_is_none() {
        let mut dev = Device::new(addr(), "empty");
        assert!(dev.remove_endpoint(4).is_none());
        assert!(dev.endpoints().is_empty());
    }
}
