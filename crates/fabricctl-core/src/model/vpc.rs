// ── vPC pair domain types ──

use std::path::PathBuf;

use serde::Serialize;

pub const DEFAULT_VPC_POLICY: &str = "int_vpc_trunk_host";

/// Port-channel policy applied to the vPC interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpcPolicyConfig {
    pub template: String,
    pub peer1_pcid: String,
    pub peer2_pcid: String,
    pub mode: String,
    /// Member interface lists as written; validated by the range parser on load.
    pub peer1_members: String,
    pub peer2_members: String,
    pub peer1_allowed_vlans: String,
    pub peer2_allowed_vlans: String,
    pub bpdu_guard: bool,
    pub port_type_fast: bool,
}

impl Default for VpcPolicyConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_VPC_POLICY.into(),
            peer1_pcid: "1".into(),
            peer2_pcid: "1".into(),
            mode: "active".into(),
            peer1_members: String::new(),
            peer2_members: String::new(),
            peer1_allowed_vlans: String::new(),
            peer2_allowed_vlans: String::new(),
            bpdu_guard: false,
            port_type_fast: false,
        }
    }
}

/// Canonical vPC pair declaration. Identity is `(peer1, peer2)` plus the vPC name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpcPairRecord {
    pub fabric: String,
    pub name: String,
    pub peer1_serial: String,
    pub peer2_serial: String,
    /// `None` when the file declares no `Policy` block (pair only).
    pub policy: Option<VpcPolicyConfig>,
    pub source: PathBuf,
}

impl VpcPairRecord {
    /// The `peer1~peer2` serial the controller uses for vPC interfaces.
    pub fn pair_serial(&self) -> String {
        format!("{}~{}", self.peer1_serial, self.peer2_serial)
    }
}

/// Parse the legacy `peer1=peer2=name` file stem.
pub fn parse_legacy_stem(stem: &str) -> Option<(&str, &str, &str)> {
    let mut parts = stem.splitn(3, '=');
    let peer1 = parts.next()?;
    let peer2 = parts.next()?;
    let name = parts.next()?;
    if peer1.is_empty() || peer2.is_empty() || name.is_empty() {
        return None;
    }
    Some((peer1, peer2, name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn legacy_stem_parses_three_parts() {
        assert_eq!(
            parse_legacy_stem("leaf1=leaf2=vpc10"),
            Some(("leaf1", "leaf2", "vpc10"))
        );
        assert_eq!(parse_legacy_stem("leaf1=leaf2"), None);
        assert_eq!(parse_legacy_stem("=leaf2=x"), None);
    }
}
