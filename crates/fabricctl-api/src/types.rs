// Wire-format types for the NDFC LAN-fabric API.
//
// Field names follow the controller's camelCase JSON. Observed (read)
// types default every optional field so partial controller responses
// still decode; request types serialize exactly what the controller
// expects and nothing more.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered string nvPairs, as sent in interface and fabric bodies.
pub type NvPairs = IndexMap<String, String>;

// ── Fabrics ─────────────────────────────────────────────────────────

/// Entry from `GET control/fabrics`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricSummary {
    pub fabric_name: String,
    #[serde(default)]
    pub fabric_id: Option<String>,
    #[serde(default)]
    pub fabric_type: Option<String>,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub fabric_technology: Option<String>,
    #[serde(default)]
    pub nv_pairs: Option<Value>,
}

/// Body for `POST control/fabrics/msdAdd` and `msdExit`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MsdMembership {
    pub dest_fabric: String,
    pub source_fabric: String,
}

/// Per-switch entry from `GET control/fabrics/{f}/config-preview`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSwitchConfig {
    #[serde(default, alias = "serialNumber")]
    pub switch_id: String,
    #[serde(default, alias = "hostName")]
    pub switch_name: Option<String>,
    #[serde(default)]
    pub pending_config: PendingLines,
    #[serde(default)]
    pub status: Option<String>,
}

/// Pending configuration arrives either as a list of lines or as one
/// newline-separated string depending on controller release.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PendingLines {
    Lines(Vec<String>),
    Text(String),
}

impl Default for PendingLines {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl PendingLines {
    /// Non-blank configuration lines in controller order.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Lines(lines) => lines
                .iter()
                .map(String::as_str)
                .filter(|l| !l.trim().is_empty())
                .collect(),
            Self::Text(text) => text.lines().filter(|l| !l.trim().is_empty()).collect(),
        }
    }
}

// ── VRFs ────────────────────────────────────────────────────────────

/// Body for `POST/PUT top-down/fabrics/{f}/vrfs[/{v}]`, also returned by list.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VrfPayload {
    pub fabric: String,
    pub vrf_name: String,
    #[serde(default)]
    pub vrf_id: u32,
    #[serde(default)]
    pub vrf_template: String,
    #[serde(default)]
    pub vrf_extension_template: String,
    /// JSON-encoded template parameters (a string, not an object).
    #[serde(default)]
    pub vrf_template_config: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchical_key: Option<String>,
}

/// One switch in a VRF attach/detach request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VrfLanAttach {
    pub fabric: String,
    pub vrf_name: String,
    pub serial_number: String,
    pub vlan: String,
    pub deployment: bool,
    pub instance_values: String,
    pub freeform_config: String,
}

/// Body element for `POST top-down/fabrics/{f}/vrfs/attachments`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VrfAttachmentRequest {
    pub vrf_name: String,
    pub lan_attach_list: Vec<VrfLanAttach>,
}

/// Response element for `GET top-down/fabrics/{f}/vrfs/attachments`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VrfAttachmentStatus {
    pub vrf_name: String,
    #[serde(default)]
    pub lan_attach_list: Vec<LanAttachState>,
}

/// Attachment state of one switch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanAttachState {
    #[serde(default)]
    pub switch_serial_no: String,
    #[serde(default)]
    pub switch_name: Option<String>,
    #[serde(default)]
    pub vlan_id: Option<u16>,
    #[serde(default)]
    pub is_lan_attached: bool,
    #[serde(default)]
    pub lan_attach_state: Option<String>,
}

// ── Networks ────────────────────────────────────────────────────────

/// Body for `POST/PUT top-down/fabrics/{f}/networks[/{n}]`, also returned by list.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPayload {
    pub fabric: String,
    pub network_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub network_id: u32,
    #[serde(default)]
    pub network_template: String,
    #[serde(default)]
    pub network_extension_template: String,
    #[serde(default)]
    pub vrf: String,
    /// JSON-encoded template parameters (a string, not an object).
    #[serde(default)]
    pub network_template_config: String,
    #[serde(default, rename = "type")]
    pub network_type: String,
    #[serde(default)]
    pub primary_network_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchical_key: Option<String>,
}

/// Body for `POST top-down/fabrics/{f}/networks/{n}/attachments`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAttachRequest {
    pub fabric: String,
    pub network_name: String,
    pub serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_ports: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detach_switch_ports: Option<String>,
    pub vlan: u16,
    pub deployment: bool,
    pub instance_values: String,
    pub freeform_config: String,
}

/// Response element for `GET top-down/fabrics/{f}/networks/{n}/attachments`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAttachmentStatus {
    #[serde(default)]
    pub network_name: String,
    #[serde(default)]
    pub switch_serial_no: String,
    #[serde(default)]
    pub switch_name: Option<String>,
    /// Comma-separated interface names the network is attached to.
    #[serde(default)]
    pub port_names: Option<String>,
    #[serde(default)]
    pub vlan_id: Option<u16>,
    #[serde(default, alias = "lanAttached")]
    pub is_lan_attached: bool,
}

impl NetworkAttachmentStatus {
    /// Attached interface names, split from `portNames`.
    pub fn ports(&self) -> Vec<&str> {
        self.port_names
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

// ── Switches ────────────────────────────────────────────────────────

/// Entry from `GET control/fabrics/{f}/inventory/switchesByFabric`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchInventory {
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub logical_name: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub switch_role: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One switch in a discovery request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredSwitch {
    pub sys_name: String,
    pub serial_number: String,
    pub ipaddr: String,
    pub platform: String,
    pub device_index: String,
    pub version: String,
}

/// Body for `POST control/fabrics/{f}/inventory/discover`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRequest {
    #[serde(rename = "seedIP")]
    pub seed_ip: String,
    pub username: String,
    pub password: String,
    pub max_hops: u32,
    pub preserve_config: bool,
    pub switches: Vec<DiscoveredSwitch>,
    pub platform: String,
}

/// Body element for `POST control/switches/roles`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchRoleAssignment {
    pub serial_number: String,
    pub role: String,
}

/// Body for `PUT control/fabrics/{f}/inventory/discoveryIP`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryIpChange {
    pub serial_number: String,
    pub ip_address: String,
}

// ── Interfaces ──────────────────────────────────────────────────────

/// Interface reference used by admin-status and mark-delete calls.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceRef {
    pub serial_number: String,
    pub if_name: String,
}

/// One interface inside an interface policy body.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceConfig {
    pub serial_number: String,
    pub if_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric_name: Option<String>,
    pub nv_pairs: NvPairs,
}

/// Body for `PUT interface` (update) and `POST interface` (create).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterfacePolicyRequest {
    pub policy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_type: Option<String>,
    pub interfaces: Vec<InterfaceConfig>,
}

/// Body for `POST interface/adminstatus`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatusRequest {
    pub operation: AdminOperation,
    pub interfaces: Vec<InterfaceRef>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdminOperation {
    Shut,
    NoShut,
}

/// Response element for `GET interface?serialNumber=`: interfaces grouped by policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceGroup {
    #[serde(default)]
    pub policy: String,
    #[serde(default)]
    pub interfaces: Vec<InterfaceState>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceState {
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub if_name: String,
    #[serde(default)]
    pub nv_pairs: IndexMap<String, Value>,
}

// ── vPC ─────────────────────────────────────────────────────────────

/// Body for `POST vpcpair`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpcPairRequest {
    pub peer_one_id: String,
    pub peer_two_id: String,
    pub use_virtual_peerlink: bool,
}

// ── Policies ────────────────────────────────────────────────────────

/// Policy record: body for `POST control/policies`, element of
/// `GET control/policies/switches/{serial}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub policy_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub template_content_type: String,
    #[serde(default)]
    pub nv_pairs: IndexMap<String, Value>,
    #[serde(default)]
    pub generated_config: String,
    #[serde(default)]
    pub auto_generated: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub status: String,
}
