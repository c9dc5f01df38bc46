// ── Interface domain types ──

use serde::Serialize;

use crate::range::{RangeParseError, RangeSet};

pub const ACCESS_POLICY: &str = "int_access_host";
pub const TRUNK_POLICY: &str = "int_trunk_host";
pub const ROUTED_POLICY: &str = "int_routed_host";

/// Trunk allowed-VLAN declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AllowedVlans {
    All,
    None,
    /// The controller manages the list (e.g. port-channel members).
    ControlledByPolicy,
    List(#[serde(serialize_with = "serialize_range")] RangeSet),
}

fn serialize_range<S: serde::Serializer>(set: &RangeSet, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(set)
}

impl AllowedVlans {
    /// Parse the YAML text; absent or blank means `all`.
    pub fn parse(raw: Option<&str>) -> Result<Self, RangeParseError> {
        let text = raw.map(str::trim).unwrap_or_default();
        let lower = text.to_ascii_lowercase();
        if text.is_empty() || lower == "all" {
            Ok(Self::All)
        } else if lower == "none" {
            Ok(Self::None)
        } else if lower.contains("controlled by policy") {
            Ok(Self::ControlledByPolicy)
        } else {
            text.parse().map(Self::List)
        }
    }

    /// Value for the `ALLOWED_VLANS` nvPair, if one should be sent.
    pub fn nv_value(&self) -> Option<String> {
        match self {
            Self::All => Some("all".into()),
            Self::None => Some("none".into()),
            Self::ControlledByPolicy => None,
            Self::List(set) => Some(set.to_string()),
        }
    }

    /// Explicit VLAN ids; sentinels name none.
    pub fn explicit(&self) -> Option<&RangeSet> {
        match self {
            Self::List(set) => Some(set),
            _ => None,
        }
    }
}

/// Policy-specific interface attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InterfacePolicy {
    Access {
        vlan: Option<u16>,
    },
    Trunk {
        allowed: AllowedVlans,
    },
    Routed {
        vrf: Option<String>,
        ip: Option<String>,
        prefix: Option<String>,
    },
    PortChannel {
        template: String,
        members: Vec<String>,
        mode: Option<String>,
        allowed: AllowedVlans,
    },
    /// No policy: only admin state is managed.
    None,
}

impl InterfacePolicy {
    /// Controller template name, if the interface carries a policy.
    pub fn template(&self) -> Option<&str> {
        match self {
            Self::Access { .. } => Some(ACCESS_POLICY),
            Self::Trunk { .. } => Some(TRUNK_POLICY),
            Self::Routed { .. } => Some(ROUTED_POLICY),
            Self::PortChannel { template, .. } => Some(template),
            Self::None => None,
        }
    }
}

/// Canonical interface declaration. Identity is `(serial, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    pub name: String,
    pub description: Option<String>,
    pub admin_enabled: bool,
    pub policy: InterfacePolicy,
    pub mtu: Option<String>,
    pub speed: Option<String>,
    /// Freeform CLI text, already read from the referenced file.
    pub freeform: Option<String>,
}

impl InterfaceRecord {
    /// A bare policy-less interface, enabled.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            admin_enabled: true,
            policy: InterfacePolicy::None,
            mtu: None,
            speed: None,
            freeform: None,
        }
    }

    pub fn with_policy(mut self, policy: InterfacePolicy) -> Self {
        self.policy = policy;
        self
    }
}
