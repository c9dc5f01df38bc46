// ── Attachment deriver ──
//
// Infers which VRFs and networks a switch needs from its interface
// configuration. Routed interfaces imply VRF attachments; access and
// trunk interfaces imply network attachments.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::model::{AttachmentRelation, InterfacePolicy, NetworkRecord, SwitchRecord, VrfRecord};

/// VRF name routed interfaces use for the global table.
const GLOBAL_VRF: &str = "default";

/// One relation per VRF named by a routed interface, carrying the VRF's
/// own VLAN. VRFs not declared for the fabric are logged and skipped.
pub fn derive_vrf_attachments(switch: &SwitchRecord, vrfs: &[VrfRecord]) -> Vec<AttachmentRelation> {
    let declared: BTreeMap<&str, &VrfRecord> = vrfs.iter().map(|v| (v.name.as_str(), v)).collect();
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for intf in &switch.interfaces {
        let InterfacePolicy::Routed { vrf: Some(vrf), .. } = &intf.policy else {
            continue;
        };
        let vrf = vrf.trim();
        if vrf.is_empty() || vrf.eq_ignore_ascii_case(GLOBAL_VRF) {
            continue;
        }
        let Some(record) = declared.get(vrf) else {
            warn!(
                switch = %switch.name,
                interface = %intf.name,
                vrf,
                "routed interface names an undeclared VRF, skipping"
            );
            continue;
        };
        if seen.insert(vrf) {
            out.push(AttachmentRelation::vrf(
                vrf,
                &switch.serial_number,
                record.vlan_id,
            ));
        }
    }
    out
}

/// One relation per (network, interface). Access ports contribute their
/// access VLAN; trunks contribute every explicit allowed VLAN. VLANs with
/// no declared network are outside this tool's scope and are skipped.
pub fn derive_network_attachments(
    switch: &SwitchRecord,
    networks: &[NetworkRecord],
) -> Vec<AttachmentRelation> {
    let by_vlan: BTreeMap<u16, &NetworkRecord> = networks.iter().map(|n| (n.vlan_id, n)).collect();
    let mut out = Vec::new();
    let mut seen = BTreeSet::new();
    let mut push = |vlan: u16, interface: &str, out: &mut Vec<AttachmentRelation>| {
        match by_vlan.get(&vlan) {
            Some(net) => {
                if seen.insert((net.name.clone(), interface.to_owned())) {
                    out.push(AttachmentRelation::network(
                        &net.name,
                        &switch.serial_number,
                        interface,
                        vlan,
                    ));
                }
            }
            None => warn!(
                switch = %switch.name,
                interface,
                vlan,
                "no network declared for VLAN, skipping"
            ),
        }
    };

    for intf in &switch.interfaces {
        match &intf.policy {
            InterfacePolicy::Access { vlan: Some(vlan) } => push(*vlan, &intf.name, &mut out),
            InterfacePolicy::Trunk { allowed } => match allowed.explicit() {
                Some(set) => {
                    for vlan in set.iter() {
                        push(vlan, &intf.name, &mut out);
                    }
                }
                None => debug!(interface = %intf.name, "trunk names no explicit VLANs"),
            },
            _ => {}
        }
    }
    out
}

/// Group network relations into (network, serial) -> ports, for
/// multi-port attach bodies.
pub fn group_ports(relations: &[AttachmentRelation]) -> BTreeMap<(String, String), (u16, Vec<String>)> {
    let mut groups: BTreeMap<(String, String), (u16, Vec<String>)> = BTreeMap::new();
    for rel in relations {
        if let Some(intf) = rel.interface() {
            let entry = groups
                .entry((rel.entity.clone(), rel.switch_serial.clone()))
                .or_insert_with(|| (rel.vlan(), Vec::new()));
            entry.1.push(intf.to_owned());
        }
    }
    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{AllowedVlans, InterfaceRecord, SwitchRole};

    fn switch(interfaces: Vec<InterfaceRecord>) -> SwitchRecord {
        SwitchRecord {
            fabric: "Site1".into(),
            name: "leaf1".into(),
            serial_number: "SAL1".into(),
            ip_address: None,
            platform: String::new(),
            version: String::new(),
            role: SwitchRole::Leaf,
            dir: PathBuf::new(),
            freeform_config: None,
            interfaces,
        }
    }

    fn network(name: &str, vlan: u16) -> NetworkRecord {
        NetworkRecord::new(
            "Site1".into(),
            name.into(),
            30000 + u32::from(vlan),
            vlan,
            Some("bluevrf".into()),
            false,
        )
    }

    fn vrf(name: &str, vlan: u16) -> VrfRecord {
        VrfRecord {
            fabric: "Site1".into(),
            name: name.into(),
            vrf_id: 50000 + u32::from(vlan),
            vlan_id: vlan,
            vlan_name: None,
            interface_description: None,
            description: None,
            overrides: IndexMap::new(),
        }
    }

    fn trunk(name: &str, vlans: &str) -> InterfaceRecord {
        InterfaceRecord::plain(name).with_policy(InterfacePolicy::Trunk {
            allowed: AllowedVlans::parse(Some(vlans)).unwrap(),
        })
    }

    fn routed(name: &str, vrf: &str) -> InterfaceRecord {
        InterfaceRecord::plain(name).with_policy(InterfacePolicy::Routed {
            vrf: Some(vrf.into()),
            ip: None,
            prefix: None,
        })
    }

    #[test]
    fn trunk_only_attaches_declared_vlans() {
        let sw = switch(vec![trunk("Ethernet1/1", "100,200,300-302")]);
        let nets = vec![network("web", 100), network("db", 300)];
        let rels = derive_network_attachments(&sw, &nets);
        let got: Vec<_> = rels.iter().map(|r| (r.entity.as_str(), r.vlan())).collect();
        assert_eq!(got, vec![("web", 100), ("db", 300)]);
    }

    #[test]
    fn access_port_maps_to_one_network_and_sentinels_to_none() {
        let sw = switch(vec![
            InterfaceRecord::plain("Ethernet1/2").with_policy(InterfacePolicy::Access { vlan: Some(100) }),
            InterfaceRecord::plain("Ethernet1/3").with_policy(InterfacePolicy::Access { vlan: None }),
            trunk("Ethernet1/4", "all"),
        ]);
        let rels = derive_network_attachments(&sw, &[network("web", 100)]);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].key(), "web@SAL1:Ethernet1/2");
    }

    #[test]
    fn vrf_referenced_twice_yields_one_relation_with_vrf_vlan() {
        let sw = switch(vec![
            routed("Ethernet1/5", "bluevrf"),
            routed("Ethernet1/6", "bluevrf"),
            routed("Ethernet1/7", "default"),
            routed("Ethernet1/8", "ghostvrf"),
        ]);
        let rels = derive_vrf_attachments(&sw, &[vrf("bluevrf", 2001)]);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].entity, "bluevrf");
        assert_eq!(rels[0].vlan(), 2001);
        assert_eq!(rels[0].interface(), None);
    }

    #[test]
    fn ports_group_by_network_and_switch() {
        let sw = switch(vec![trunk("Ethernet1/1", "100"), trunk("Ethernet1/2", "100")]);
        let rels = derive_network_attachments(&sw, &[network("web", 100)]);
        let groups = group_ports(&rels);
        let (vlan, ports) = &groups[&("web".to_owned(), "SAL1".to_owned())];
        assert_eq!(*vlan, 100);
        assert_eq!(ports, &vec!["Ethernet1/1".to_owned(), "Ethernet1/2".to_owned()]);
    }
}
