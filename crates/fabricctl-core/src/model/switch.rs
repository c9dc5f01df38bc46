// ── Switch domain types ──

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::interface::InterfaceRecord;

/// The nine roles the controller accepts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum SwitchRole {
    Leaf,
    Spine,
    #[strum(serialize = "super spine")]
    SuperSpine,
    #[strum(serialize = "border gateway")]
    BorderGateway,
    #[strum(serialize = "border gateway spine")]
    BorderGatewaySpine,
    #[strum(serialize = "border gateway super spine")]
    BorderGatewaySuperSpine,
    #[strum(serialize = "core router")]
    CoreRouter,
    #[strum(serialize = "edge router")]
    EdgeRouter,
    Tor,
}

impl SwitchRole {
    /// Parse operator spellings: any case, `_`/`-` for spaces, extra whitespace.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let normalized = raw
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        Self::from_str(&normalized).ok()
    }

    /// The controller's wire value.
    pub fn as_wire(self) -> &'static str {
        self.into()
    }
}

/// Canonical switch declaration. Identity is the serial number.
#[derive(Debug, Clone, Serialize)]
pub struct SwitchRecord {
    pub fabric: String,
    /// File stem; used as sysName during discovery.
    pub name: String,
    pub serial_number: String,
    pub ip_address: Option<String>,
    pub platform: String,
    pub version: String,
    pub role: SwitchRole,
    /// Directory the switch YAML lives in; relative freeform paths resolve here.
    pub dir: PathBuf,
    /// `Switch Freeform Config`, relative to `dir`.
    pub freeform_config: Option<String>,
    pub interfaces: Vec<InterfaceRecord>,
}

impl SwitchRecord {
    /// Platform family before the first `-` (`N9K-C9300v` -> `N9K`).
    pub fn model_prefix(&self) -> &str {
        self.platform
            .split_once('-')
            .map_or(self.platform.as_str(), |(head, _)| head)
    }

    /// Discovery device index: `{name}-{model}({serial})`.
    pub fn device_index(&self) -> String {
        format!("{}-{}({})", self.name, self.model_prefix(), self.serial_number)
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceRecord> {
        self.interfaces.iter().find(|i| i.name == name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn nine_roles_round_trip_through_wire_form() {
        let roles: Vec<_> = SwitchRole::iter().collect();
        assert_eq!(roles.len(), 9);
        for role in roles {
            assert_eq!(SwitchRole::parse_lenient(role.as_wire()), Some(role));
        }
    }

    #[test]
    fn lenient_parse_accepts_directory_spellings() {
        assert_eq!(
            SwitchRole::parse_lenient("Border_Gateway"),
            Some(SwitchRole::BorderGateway)
        );
        assert_eq!(
            SwitchRole::parse_lenient("super-spine"),
            Some(SwitchRole::SuperSpine)
        );
        assert_eq!(SwitchRole::parse_lenient("  LEAF "), Some(SwitchRole::Leaf));
        assert_eq!(SwitchRole::parse_lenient("router"), None);
    }

    #[test]
    fn device_index_uses_platform_prefix() {
        let sw = SwitchRecord {
            fabric: "Site1".into(),
            name: "leaf1".into(),
            serial_number: "SAL123".into(),
            ip_address: Some("10.0.0.11".into()),
            platform: "N9K-C9300v".into(),
            version: "9.3(15)".into(),
            role: SwitchRole::Leaf,
            dir: PathBuf::new(),
            freeform_config: None,
            interfaces: Vec::new(),
        };
        assert_eq!(sw.device_index(), "leaf1-N9K(SAL123)");
    }
}
