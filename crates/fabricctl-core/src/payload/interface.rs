use std::collections::{BTreeMap, BTreeSet};

use fabricctl_api::types::{
    AdminOperation, AdminStatusRequest, InterfaceConfig, InterfaceGroup, InterfacePolicyRequest,
    InterfaceRef, NvPairs,
};

use super::{build_err, flag};
use crate::error::CoreError;
use crate::model::interface::{ACCESS_POLICY, TRUNK_POLICY};
use crate::model::{InterfacePolicy, InterfaceRecord, SwitchRecord};

const DEFAULT_ACCESS_VLAN: &str = "1";
const HOST_MTU: &str = "jumbo";
const ROUTED_MTU: &str = "9100";
const DEFAULT_VRF: &str = "default";
const AUTO_SPEED: &str = "Auto";

/// One `PUT interface` body per policy template, in template order.
pub fn interface_requests(switch: &SwitchRecord) -> Result<Vec<InterfacePolicyRequest>, CoreError> {
    let mut groups: BTreeMap<&str, Vec<InterfaceConfig>> = BTreeMap::new();
    for intf in &switch.interfaces {
        let Some(template) = intf.policy.template() else {
            continue;
        };
        groups.entry(template).or_default().push(InterfaceConfig {
            serial_number: switch.serial_number.clone(),
            if_name: intf.name.clone(),
            interface_type: None,
            fabric_name: None,
            nv_pairs: nv_pairs(intf)?,
        });
    }
    Ok(groups
        .into_iter()
        .map(|(policy, interfaces)| InterfacePolicyRequest {
            policy: policy.to_owned(),
            interface_type: None,
            interfaces,
        })
        .collect())
}

fn nv_pairs(intf: &InterfaceRecord) -> Result<NvPairs, CoreError> {
    let mut nv = NvPairs::new();
    nv.insert("INTF_NAME".into(), intf.name.clone());
    nv.insert("DESC".into(), intf.description.clone().unwrap_or_default());
    nv.insert("ADMIN_STATE".into(), flag(intf.admin_enabled));
    nv.insert(
        "SPEED".into(),
        intf.speed.clone().unwrap_or_else(|| AUTO_SPEED.into()),
    );
    nv.insert("NETFLOW_MONITOR".into(), String::new());
    nv.insert("POLICY_DESC".into(), String::new());
    nv.insert("CONF".into(), intf.freeform.clone().unwrap_or_default());

    let mtu = |default: &str| intf.mtu.clone().unwrap_or_else(|| default.to_owned());
    match &intf.policy {
        InterfacePolicy::Access { vlan } => {
            nv.insert(
                "ACCESS_VLAN".into(),
                vlan.map_or_else(|| DEFAULT_ACCESS_VLAN.to_owned(), |v| v.to_string()),
            );
            nv.insert("MTU".into(), mtu(HOST_MTU));
            nv.insert("BPDUGUARD_ENABLED".into(), flag(true));
            nv.insert("PORTTYPE_FAST_ENABLED".into(), flag(true));
        }
        InterfacePolicy::Trunk { allowed } => {
            if let Some(vlans) = allowed.nv_value() {
                nv.insert("ALLOWED_VLANS".into(), vlans);
            }
            nv.insert("MTU".into(), mtu(HOST_MTU));
        }
        InterfacePolicy::Routed { vrf, ip, prefix } => {
            if let Some(len) = prefix {
                match len.parse::<u8>() {
                    Ok(n) if n <= 32 => {}
                    _ => {
                        return Err(build_err(
                            "IP Netmask Length",
                            format!("'{len}' on {} is not a prefix length", intf.name),
                        ));
                    }
                }
            }
            nv.insert("IP".into(), ip.clone().unwrap_or_default());
            nv.insert("PREFIX".into(), prefix.clone().unwrap_or_default());
            nv.insert(
                "INTF_VRF".into(),
                vrf.clone().unwrap_or_else(|| DEFAULT_VRF.into()),
            );
            nv.insert("MTU".into(), mtu(ROUTED_MTU));
        }
        InterfacePolicy::PortChannel {
            members,
            mode,
            allowed,
            ..
        } => {
            nv.insert("MEMBER_INTERFACES".into(), members.join(","));
            nv.insert("PC_MODE".into(), mode.clone().unwrap_or_else(|| "active".into()));
            if let Some(vlans) = allowed.nv_value() {
                nv.insert("ALLOWED_VLANS".into(), vlans);
            }
            nv.insert("MTU".into(), mtu(HOST_MTU));
        }
        InterfacePolicy::None => {}
    }
    Ok(nv)
}

/// Admin up/down for YAML interfaces without a policy: `shut` first, then `noshut`.
pub fn admin_status_requests(switch: &SwitchRecord) -> Vec<AdminStatusRequest> {
    let (up, down): (Vec<_>, Vec<_>) = switch
        .interfaces
        .iter()
        .filter(|i| i.policy == InterfacePolicy::None)
        .partition(|i| i.admin_enabled);
    let refs = |list: Vec<&InterfaceRecord>| {
        list.into_iter()
            .map(|i| InterfaceRef {
                serial_number: switch.serial_number.clone(),
                if_name: i.name.clone(),
            })
            .collect::<Vec<_>>()
    };
    [(AdminOperation::Shut, refs(down)), (AdminOperation::NoShut, refs(up))]
        .into_iter()
        .filter(|(_, interfaces)| !interfaces.is_empty())
        .map(|(operation, interfaces)| AdminStatusRequest {
            operation,
            interfaces,
        })
        .collect()
}

/// Default-closed: controller Ethernet ports the YAML never mentions and
/// that carry no policy or a host policy. Fabric links, port-channel
/// members and anything under another policy are left alone.
pub fn default_closed_interfaces(
    switch: &SwitchRecord,
    observed: &[InterfaceGroup],
) -> Vec<InterfaceRef> {
    let mut declared: BTreeSet<&str> = switch.interfaces.iter().map(|i| i.name.as_str()).collect();
    for intf in &switch.interfaces {
        if let InterfacePolicy::PortChannel { members, .. } = &intf.policy {
            declared.extend(members.iter().map(String::as_str));
        }
    }

    let mut out: BTreeSet<&str> = BTreeSet::new();
    for group in observed {
        let policy = group.policy.trim();
        let closable = policy.is_empty() || policy == ACCESS_POLICY || policy == TRUNK_POLICY;
        if !closable {
            continue;
        }
        for state in &group.interfaces {
            let name = state.if_name.as_str();
            let is_ethernet = name.to_ascii_lowercase().starts_with("ethernet");
            if is_ethernet && !declared.contains(name) {
                out.insert(name);
            }
        }
    }
    out.into_iter()
        .map(|name| InterfaceRef {
            serial_number: switch.serial_number.clone(),
            if_name: name.to_owned(),
        })
        .collect()
}

/// Wrap interface refs in a `shut` request, if there are any.
pub fn shut_request(interfaces: Vec<InterfaceRef>) -> Option<AdminStatusRequest> {
    (!interfaces.is_empty()).then_some(AdminStatusRequest {
        operation: AdminOperation::Shut,
        interfaces,
    })
}
