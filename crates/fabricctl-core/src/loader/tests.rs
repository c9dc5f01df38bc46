use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::*;
use crate::model::{AllowedVlans, FabricType, InterfacePolicy, L2_ONLY_VRF, Scalar, SwitchRole};

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn project() -> (TempDir, ConfigLoader) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "resources/corp_defaults/cisco_vxlan.yaml",
        "General:\n  BGP ASN: 65000\n  Replication Mode: Multicast\nAdvanced:\n  Banner: Banner.sh\n",
    );
    write(
        root,
        "resources/_field_mapping/cisco_vxlan.yaml",
        "General:\n  BGP ASN: BGP_AS\n  Replication Mode: REPLICATION_MODE\n",
    );
    write(root, "resources/freeform/Banner.sh", "Authorized access only");
    write(
        root,
        "network_configs/1_vxlan_evpn/fabric/Site1.yaml",
        "General:\n  BGP ASN: 65001\nAdvanced:\n  Leaf Freeform Config:\n    Freeform: freeform/leaf.sh\n",
    );
    write(root, "freeform/leaf.sh", "feature lacp\n");
    write(
        root,
        "network_configs/5_segment/vrf.yaml",
        "VRF:\n  - Fabric: Site1\n    VRF Name: bluevrf\n    VRF ID: 50001\n    VLAN ID: 2001\n  - Fabric: Site2\n    VRF Name: bluevrf\n    VRF ID: 50001\n    VLAN ID: \"2001\"\n",
    );
    write(
        root,
        "network_configs/5_segment/network.yaml",
        "Network:\n  - Fabric: Site1\n    Network Name: web\n    Network ID: 30001\n    VLAN ID: 100\n    VRF Name: bluevrf\n    IPv4 Gateway/NetMask: 10.1.0.1/24\n  - Fabric: Site1\n    Network Name: storage\n    Network ID: 30002\n    VLAN ID: 300\n    VRF Name: bluevrf\n    Layer 2 Only: true\n",
    );
    let loader = ConfigLoader::new(ProjectLayout::new(root));
    (dir, loader)
}

#[test]
fn fabric_merges_defaults_and_reads_freeform() {
    let (_dir, loader) = project();
    let fabric = loader.fabric("Site1").unwrap();
    assert_eq!(fabric.fabric_type, FabricType::VxlanEvpn);
    assert_eq!(fabric.properties.get("General_BGP ASN"), Some(&Scalar::Int(65001)));
    assert_eq!(
        fabric.properties.get("General_Replication Mode"),
        Some(&Scalar::from("Multicast"))
    );
    assert_eq!(fabric.freeform.leaf.as_deref(), Some("feature lacp\n"));
    assert_eq!(fabric.freeform.banner.as_deref(), Some("Authorized access only"));
    assert_eq!(fabric.freeform.spine, None);
}

#[test]
fn per_fabric_freeform_dir_overrides_declared_paths() {
    let (dir, loader) = project();
    write(
        dir.path(),
        "network_configs/1_vxlan_evpn/fabric/Site1_FreeForm/Leaf Freeform Config.sh",
        "feature bfd\n",
    );
    let fabric = loader.fabric("Site1").unwrap();
    assert_eq!(fabric.freeform.leaf.as_deref(), Some("feature bfd\n"));
}

#[test]
fn unknown_fabric_is_not_found() {
    let (_dir, loader) = project();
    let err = loader.fabric("Nope").unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn files_are_parsed_once() {
    let (_dir, loader) = project();
    loader.vrfs("Site1").unwrap();
    let after_first = loader.cached_files();
    loader.vrfs("Site1").unwrap();
    loader.vrf("Site1", "bluevrf").unwrap();
    assert_eq!(loader.cached_files(), after_first);
}

#[test]
fn vrfs_are_scoped_to_their_fabric() {
    let (_dir, loader) = project();
    let vrfs = loader.vrfs("Site2").unwrap();
    assert_eq!(vrfs.len(), 1);
    assert_eq!(vrfs[0].vlan_id, 2001);
    assert!(matches!(
        loader.vrf("Site1", "redvrf"),
        Err(CoreError::ConfigNotFound { .. })
    ));
}

#[test]
fn layer2_network_ignores_declared_vrf() {
    let (_dir, loader) = project();
    let storage = loader.network("Site1", "storage").unwrap();
    assert!(storage.layer2_only);
    assert_eq!(storage.vrf(), L2_ONLY_VRF);
    let web = loader.network("Site1", "web").unwrap();
    assert_eq!(web.vrf(), "bluevrf");
    assert_eq!(web.gateway.as_deref(), Some("10.1.0.1/24"));
}

#[test]
fn switch_interfaces_are_typed() {
    let (dir, loader) = project();
    write(
        dir.path(),
        "network_configs/3_node/Site1/leaf/leaf1.yaml",
        r#"
Serial Number: SAL1001
IP Address: 10.0.0.11/24
Platform: N9K-C9300v
Interface:
  - Ethernet1/1:
      policy: int_trunk_host
      Trunk Allowed Vlans: 100,200,300-302
  - Ethernet1/2:
      policy: int_access_host
      Access Vlan: 100
  - Ethernet1/3:
      policy: int_routed_host
      Interface VRF: bluevrf
      Interface IP: 10.9.9.1
      IP Netmask Length: 30
  - Ethernet1/4:
      Enable Interface: false
"#,
    );
    let sw = loader.switch("Site1", "leaf", "leaf1").unwrap();
    assert_eq!(sw.role, SwitchRole::Leaf);
    assert_eq!(sw.version, "9.3(15)");
    assert_eq!(sw.interfaces.len(), 4);
    match &sw.interfaces[0].policy {
        InterfacePolicy::Trunk { allowed } => {
            assert_eq!(allowed, &AllowedVlans::parse(Some("100,200,300-302")).unwrap());
        }
        other => panic!("unexpected policy {other:?}"),
    }
    assert_eq!(
        sw.interfaces[1].policy,
        InterfacePolicy::Access { vlan: Some(100) }
    );
    assert!(!sw.interfaces[3].admin_enabled);
    assert_eq!(sw.interfaces[3].policy, InterfacePolicy::None);
}

#[test]
fn invalid_role_is_a_validation_error() {
    let (dir, loader) = project();
    write(
        dir.path(),
        "network_configs/3_node/Site1/leaf/leaf9.yaml",
        "Serial Number: SAL9\nRole: router\n",
    );
    let err = loader.switch("Site1", "leaf", "leaf9").unwrap_err();
    assert!(matches!(err, CoreError::ConfigValidation { ref field, .. } if field == "Role"));
}

#[test]
fn malformed_trunk_range_is_rejected() {
    let (dir, loader) = project();
    write(
        dir.path(),
        "network_configs/3_node/Site1/leaf/leaf2.yaml",
        "Serial Number: SAL2\nInterface:\n  - Ethernet1/1:\n      policy: int_trunk_host\n      Trunk Allowed Vlans: 300-100\n",
    );
    let err = loader.switch("Site1", "leaf", "leaf2").unwrap_err();
    assert!(matches!(err, CoreError::RangeParse(_)));
}

#[test]
fn vpc_name_field_wins_over_filename() {
    let (dir, loader) = project();
    write(
        dir.path(),
        "network_configs/3_node/Site1/vpc/SAL1=SAL2=legacy.yaml",
        "VPC Name: vpc10\nPeer-1 Serial Number: SAL1\nPeer-2 Serial Number: SAL2\nPolicy:\n  General Parameter:\n    Peer-1 Member Interfaces: Ethernet1/10-11\n",
    );
    write(
        dir.path(),
        "network_configs/3_node/Site1/vpc/SAL3=SAL4=vpc20.yaml",
        "",
    );
    let pairs = loader.vpc_pairs("Site1").unwrap();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].name, "vpc10");
    assert_eq!(pairs[0].pair_serial(), "SAL1~SAL2");
    let policy = pairs[0].policy.as_ref().unwrap();
    assert_eq!(policy.peer1_pcid, "1");
    assert_eq!(policy.mode, "active");
    assert_eq!(pairs[1].name, "vpc20");
    assert_eq!(pairs[1].peer1_serial, "SAL3");
    assert!(pairs[1].policy.is_none());
}
