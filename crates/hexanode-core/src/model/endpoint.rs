// ── Endpoint domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Category tag of an endpoint.
///
/// Discovery tooling reports `sensor`, `actor` and `infrastructure`; any
/// other tag is kept as [`EndpointFunction::Unknown`] rather than rejected.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EndpointFunction {
    Sensor,
    #[serde(alias = "actuator")]
    #[strum(to_string = "actor", serialize = "actuator")]
    Actor,
    /// Management channels, never offered for view composition.
    Infrastructure,
    #[default]
    #[serde(other)]
    Unknown,
}

impl EndpointFunction {
    pub fn is_infrastructure(self) -> bool {
        matches!(self, Self::Infrastructure)
    }
}

/// One addressable channel on a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Identifier, unique within the owning device.
    pub eid: u32,
    #[serde(default)]
    pub function: EndpointFunction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Wire datatype code as reported by the device.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub datatype: Option<u8>,
}

impl Endpoint {
    /// Every 32nd eid is a device descriptor channel.
    const DESCRIPTOR_STRIDE: u32 = 32;

    pub fn new(eid: u32, function: EndpointFunction) -> Self {
        Self {
            eid,
            function,
            description: None,
            unit: None,
            datatype: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn is_descriptor(&self) -> bool {
        self.eid % Self::DESCRIPTOR_STRIDE == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn function_parses_known_tags() {
        assert_eq!(
            "infrastructure".parse::<EndpointFunction>().unwrap(),
            EndpointFunction::Infrastructure
        );
        assert_eq!(
            "actuator".parse::<EndpointFunction>().unwrap(),
            EndpointFunction::Actor
        );
        assert_eq!(EndpointFunction::Actor.to_string(), "actor");
    }

    #[test]
    fn function_deserializes_unknown_tag() {
        let f: EndpointFunction = serde_json::from_str("\"thermostat\"").unwrap();
        assert_eq!(f, EndpointFunction::Unknown);
    }

    #[test]
    fn endpoint_defaults_missing_metadata() {
        let ep: Endpoint = serde_json::from_str(r#"{"eid": 2}"#).unwrap();
        assert_eq!(ep, Endpoint::new(2, EndpointFunction::Unknown));
    }

    #[test]
    fn descriptor_eids_are_multiples_of_32() {
        assert!(Endpoint::new(0, EndpointFunction::Infrastructure).is_descriptor());
        assert!(Endpoint::new(64, EndpointFunction::Infrastructure).is_descriptor());
        assert!(!Endpoint::new(33, EndpointFunction::Sensor).is_descriptor());
    }
}
