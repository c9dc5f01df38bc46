// ── VRF domain types ──

use indexmap::IndexMap;
use serde::Serialize;

use super::scalar::Scalar;

/// Canonical VRF declaration. Identity is `(fabric, name)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VrfRecord {
    pub fabric: String,
    pub name: String,
    pub vrf_id: u32,
    pub vlan_id: u16,
    pub vlan_name: Option<String>,
    pub interface_description: Option<String>,
    pub description: Option<String>,
    /// User `General Parameters` / `Advanced` values, keyed by section then field.
    pub overrides: IndexMap<String, IndexMap<String, Scalar>>,
}
