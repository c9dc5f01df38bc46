// ── Network domain types ──

use indexmap::IndexMap;
use serde::Serialize;

use super::scalar::Scalar;

/// VRF name the controller expects for Layer-2-only networks.
pub const L2_ONLY_VRF: &str = "NA";

/// Canonical network declaration. Identity is `(fabric, name)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkRecord {
    pub fabric: String,
    pub name: String,
    pub network_id: u32,
    pub vlan_id: u16,
    pub vlan_name: Option<String>,
    vrf: String,
    pub layer2_only: bool,
    /// `a.b.c.d/len`, only meaningful for Layer-3 networks.
    pub gateway: Option<String>,
    pub interface_description: Option<String>,
    pub overrides: IndexMap<String, IndexMap<String, Scalar>>,
}

impl NetworkRecord {
    /// Build a record, forcing the VRF to [`L2_ONLY_VRF`] for Layer-2-only networks.
    pub fn new(
        fabric: String,
        name: String,
        network_id: u32,
        vlan_id: u16,
        vrf: Option<String>,
        layer2_only: bool,
    ) -> Self {
        let vrf = if layer2_only {
            L2_ONLY_VRF.to_owned()
        } else {
            vrf.unwrap_or_default()
        };
        Self {
            fabric,
            name,
            network_id,
            vlan_id,
            vlan_name: None,
            vrf,
            layer2_only,
            gateway: None,
            interface_description: None,
            overrides: IndexMap::new(),
        }
    }

    /// The VRF this network is bound to.
    pub fn vrf(&self) -> &str {
        &self.vrf
    }
}
