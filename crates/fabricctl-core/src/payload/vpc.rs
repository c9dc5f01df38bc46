use fabricctl_api::types::{InterfaceConfig, InterfacePolicyRequest, InterfaceRef, NvPairs, VpcPairRequest};

use super::flag;
use crate::model::VpcPairRecord;

const VPC_INTERFACE_TYPE: &str = "INTERFACE_VPC";

pub fn vpc_pair_request(record: &VpcPairRecord) -> VpcPairRequest {
    VpcPairRequest {
        peer_one_id: record.peer1_serial.clone(),
        peer_two_id: record.peer2_serial.clone(),
        use_virtual_peerlink: false,
    }
}

/// `POST interface` body for the vPC port-channel, if the file declares a policy.
pub fn vpc_interface_request(record: &VpcPairRecord) -> Option<InterfacePolicyRequest> {
    let policy = record.policy.as_ref()?;
    let mut nv = NvPairs::new();
    nv.insert("PEER1_PCID".into(), policy.peer1_pcid.clone());
    nv.insert("PEER2_PCID".into(), policy.peer2_pcid.clone());
    nv.insert("PC_MODE".into(), policy.mode.clone());
    nv.insert("PEER1_MEMBER_INTERFACES".into(), policy.peer1_members.clone());
    nv.insert("PEER2_MEMBER_INTERFACES".into(), policy.peer2_members.clone());
    nv.insert("PEER1_ALLOWED_VLANS".into(), policy.peer1_allowed_vlans.clone());
    nv.insert("PEER2_ALLOWED_VLANS".into(), policy.peer2_allowed_vlans.clone());
    nv.insert("BPDUGUARD_ENABLED".into(), flag(policy.bpdu_guard));
    nv.insert("PORTTYPE_FAST_ENABLED".into(), flag(policy.port_type_fast));
    nv.insert("INTF_NAME".into(), record.name.clone());

    Some(InterfacePolicyRequest {
        policy: policy.template.clone(),
        interface_type: Some(VPC_INTERFACE_TYPE.into()),
        interfaces: vec![InterfaceConfig {
            serial_number: record.pair_serial(),
            if_name: record.name.clone(),
            interface_type: Some(VPC_INTERFACE_TYPE.into()),
            fabric_name: Some(record.fabric.clone()),
            nv_pairs: nv,
        }],
    })
}

/// Mark-delete target for the vPC interface.
pub fn vpc_interface_ref(record: &VpcPairRecord) -> InterfaceRef {
    InterfaceRef {
        serial_number: record.pair_serial(),
        if_name: record.name.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::VpcPolicyConfig;

    fn pair(policy: Option<VpcPolicyConfig>) -> VpcPairRecord {
        VpcPairRecord {
            fabric: "Site1".into(),
            name: "vPC10".into(),
            peer1_serial: "SAL1".into(),
            peer2_serial: "SAL2".into(),
            policy,
            source: PathBuf::new(),
        }
    }

    #[test]
    fn pair_request_never_uses_virtual_peerlink() {
        let body = serde_json::to_value(vpc_pair_request(&pair(None))).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"peerOneId": "SAL1", "peerTwoId": "SAL2", "useVirtualPeerlink": false})
        );
    }

    #[test]
    fn interface_request_targets_the_pair_serial() {
        let policy = VpcPolicyConfig {
            peer1_members: "Ethernet1/10-11".into(),
            bpdu_guard: true,
            ..VpcPolicyConfig::default()
        };
        let request = vpc_interface_request(&pair(Some(policy))).unwrap();
        assert_eq!(request.policy, "int_vpc_trunk_host");
        let intf = &request.interfaces[0];
        assert_eq!(intf.serial_number, "SAL1~SAL2");
        assert_eq!(intf.nv_pairs["PEER1_PCID"], "1");
        assert_eq!(intf.nv_pairs["PEER1_MEMBER_INTERFACES"], "Ethernet1/10-11");
        assert_eq!(intf.nv_pairs["BPDUGUARD_ENABLED"], "true");
        assert_eq!(intf.nv_pairs["PORTTYPE_FAST_ENABLED"], "false");
        assert!(vpc_interface_request(&pair(None)).is_none());
    }
}
