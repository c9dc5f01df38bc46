// ── Fabric domain types ──

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::scalar::Scalar;

/// The three fabric flavours the controller manages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum FabricType {
    #[strum(to_string = "Data Center VXLAN EVPN", serialize = "vxlan")]
    VxlanEvpn,
    #[strum(to_string = "VXLAN EVPN Multi-Site", serialize = "msd")]
    MultiSiteDomain,
    #[strum(to_string = "Multi-Site Interconnect Network", serialize = "isn")]
    InterSiteNetwork,
}

impl FabricType {
    /// Directory under `network_configs/1_vxlan_evpn/` holding this type's files.
    pub fn config_dir(self) -> &'static str {
        match self {
            Self::VxlanEvpn => "fabric",
            Self::MultiSiteDomain => "multisite_deployment",
            Self::InterSiteNetwork => "inter-site_network",
        }
    }

    /// Stem of the corp-defaults and field-mapping tables.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::VxlanEvpn => "cisco_vxlan",
            Self::MultiSiteDomain => "cisco_multi-site",
            Self::InterSiteNetwork => "cisco_inter-site",
        }
    }

    /// Controller template the fabric is created from.
    pub fn template(self) -> &'static str {
        match self {
            Self::VxlanEvpn => "Easy_Fabric",
            Self::MultiSiteDomain => "MSD_Fabric",
            Self::InterSiteNetwork => "External_Fabric",
        }
    }

    /// Whether VRF and network attachments apply to this fabric.
    pub fn carries_attachments(self) -> bool {
        !matches!(self, Self::InterSiteNetwork)
    }
}

/// Freeform CLI blocks, read verbatim from `.sh` files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FabricFreeform {
    pub leaf: Option<String>,
    pub spine: Option<String>,
    pub aaa: Option<String>,
    pub banner: Option<String>,
    pub intra_links: Option<String>,
    /// ISN-only fabric-wide freeform.
    pub fabric: Option<String>,
}

/// Canonical fabric declaration.
#[derive(Debug, Clone, Serialize)]
pub struct FabricRecord {
    pub name: String,
    pub fabric_type: FabricType,
    /// Corp defaults overlaid with the YAML, flattened to `Section_Key` form.
    pub properties: IndexMap<String, Scalar>,
    /// Child fabrics declared for an MSD (empty for other types).
    pub child_fabrics: BTreeSet<String>,
    pub freeform: FabricFreeform,
}
