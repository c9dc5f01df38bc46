// ── Raw YAML shapes ──
//
// Field names are the operator-facing YAML keys. Everything loosely
// typed goes through `Scalar` and is validated when converted into a
// canonical record.

use serde::Deserialize;
use serde_yaml::Value;

use crate::model::Scalar;

#[derive(Debug, Deserialize)]
pub(crate) struct RawSwitch {
    #[serde(rename = "Serial Number")]
    pub serial_number: Option<Scalar>,
    #[serde(rename = "IP Address")]
    pub ip_address: Option<Scalar>,
    #[serde(rename = "Platform")]
    pub platform: Option<Scalar>,
    #[serde(rename = "Version")]
    pub version: Option<Scalar>,
    #[serde(rename = "Role")]
    pub role: Option<String>,
    #[serde(rename = "Switch Freeform Config")]
    pub freeform_config: Option<String>,
    /// List of single-key maps, or one map of interface name to attributes.
    #[serde(rename = "Interface", default)]
    pub interfaces: Value,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawInterface {
    pub policy: Option<String>,
    #[serde(rename = "Interface Description")]
    pub description: Option<Scalar>,
    #[serde(rename = "Enable Interface")]
    pub enabled: Option<Scalar>,
    #[serde(rename = "Access Vlan")]
    pub access_vlan: Option<Scalar>,
    #[serde(rename = "Trunk Allowed Vlans")]
    pub allowed_vlans: Option<Scalar>,
    #[serde(rename = "Interface VRF")]
    pub vrf: Option<Scalar>,
    #[serde(rename = "Interface IP")]
    pub ip: Option<Scalar>,
    #[serde(rename = "IP Netmask Length")]
    pub prefix: Option<Scalar>,
    #[serde(rename = "MTU")]
    pub mtu: Option<Scalar>,
    #[serde(rename = "SPEED")]
    pub speed: Option<Scalar>,
    #[serde(rename = "Member Interfaces")]
    pub members: Option<Scalar>,
    #[serde(rename = "Port Channel Mode")]
    pub pc_mode: Option<Scalar>,
    #[serde(rename = "Freeform Config")]
    pub freeform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVpc {
    #[serde(rename = "VPC Name")]
    pub name: Option<Scalar>,
    #[serde(rename = "Peer-1 Serial Number")]
    pub peer1: Option<Scalar>,
    #[serde(rename = "Peer-2 Serial Number")]
    pub peer2: Option<Scalar>,
    #[serde(rename = "Policy")]
    pub policy: Option<RawVpcPolicy>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVpcPolicy {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "General Parameter", default)]
    pub general: RawVpcGeneral,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawVpcGeneral {
    #[serde(rename = "Peer-1 Port-Channel ID")]
    pub peer1_pcid: Option<Scalar>,
    #[serde(rename = "Peer-2 Port-Channel ID")]
    pub peer2_pcid: Option<Scalar>,
    #[serde(rename = "Port Channel Mode")]
    pub mode: Option<Scalar>,
    #[serde(rename = "Peer-1 Member Interfaces")]
    pub peer1_members: Option<Scalar>,
    #[serde(rename = "Peer-2 Member Interfaces")]
    pub peer2_members: Option<Scalar>,
    #[serde(rename = "Peer-1 Trunk Allowed Vlans")]
    pub peer1_allowed: Option<Scalar>,
    #[serde(rename = "Peer-2 Trunk Allowed Vlans")]
    pub peer2_allowed: Option<Scalar>,
    #[serde(rename = "Enable BPDU Guard")]
    pub bpdu_guard: Option<Scalar>,
    #[serde(rename = "Enable Port Type Fast")]
    pub port_type_fast: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVrfFile {
    #[serde(rename = "VRF", default)]
    pub vrfs: Vec<RawVrf>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVrf {
    #[serde(rename = "Fabric")]
    pub fabric: Option<String>,
    #[serde(rename = "VRF Name")]
    pub name: Option<Scalar>,
    #[serde(rename = "VRF ID")]
    pub vrf_id: Option<Scalar>,
    #[serde(rename = "VLAN ID")]
    pub vlan_id: Option<Scalar>,
    #[serde(rename = "VLAN Name")]
    pub vlan_name: Option<Scalar>,
    #[serde(rename = "Interface Description")]
    pub interface_description: Option<Scalar>,
    #[serde(rename = "VRF Description")]
    pub description: Option<Scalar>,
    #[serde(rename = "General Parameters", default)]
    pub general: Value,
    #[serde(rename = "Advanced", default)]
    pub advanced: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNetworkFile {
    #[serde(rename = "Network", default)]
    pub networks: Vec<RawNetwork>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNetwork {
    #[serde(rename = "Fabric")]
    pub fabric: Option<String>,
    #[serde(rename = "Network Name")]
    pub name: Option<Scalar>,
    #[serde(rename = "Network ID")]
    pub network_id: Option<Scalar>,
    #[serde(rename = "VLAN ID")]
    pub vlan_id: Option<Scalar>,
    #[serde(rename = "VLAN Name")]
    pub vlan_name: Option<Scalar>,
    #[serde(rename = "VRF Name")]
    pub vrf: Option<Scalar>,
    #[serde(rename = "Layer 2 Only")]
    pub layer2_only: Option<Scalar>,
    #[serde(rename = "Interface Description")]
    pub interface_description: Option<Scalar>,
    #[serde(rename = "IPv4 Gateway/NetMask")]
    pub gateway: Option<Scalar>,
    #[serde(rename = "General Parameters", default)]
    pub general: Value,
    #[serde(rename = "Advanced", default)]
    pub advanced: Value,
}

/// `Scalar` to trimmed text, treating blanks as absent.
pub(crate) fn text(value: Option<&Scalar>) -> Option<String> {
    value
        .filter(|s| !s.is_blank())
        .map(|s| s.to_string().trim().to_owned())
}
