use std::net::Ipv4Addr;

use fabricctl_api::types::NetworkPayload;
use indexmap::IndexMap;

use super::{build_err, flag};
use crate::error::CoreError;
use crate::loader::ReferenceTables;
use crate::model::NetworkRecord;

pub const NETWORK_TEMPLATE: &str = "Default_Network_Universal";
pub const NETWORK_EXTENSION_TEMPLATE: &str = "Default_Network_Extension_Universal";
const NETWORK_TYPE: &str = "Normal";

const SECTIONS: [&str; 2] = ["General Parameters", "Advanced"];

/// Template fields corp defaults may fill. Unknown mapped keys are ignored.
const TEMPLATE_FIELDS: &[(&str, &str)] = &[
    ("nveId", "1"),
    ("tag", "12345"),
    ("mcastGroup", ""),
    ("switchRole", ""),
    ("gen_address", ""),
    ("isIpDhcpRelay", ""),
    ("flagSet", ""),
    ("vrfDhcp", ""),
    ("dhcpServerAddr1", ""),
    ("dhcpServerAddr2", ""),
    ("dhcpServerAddr3", ""),
    ("gen_mask", ""),
    ("isIp6DhcpRelay", ""),
    ("dhcpServers", ""),
];

pub fn network_payload(
    record: &NetworkRecord,
    tables: &ReferenceTables,
) -> Result<NetworkPayload, CoreError> {
    let mut config: IndexMap<String, String> = IndexMap::new();
    config.insert("networkName".into(), record.name.clone());
    config.insert("vlanName".into(), record.vlan_name.clone().unwrap_or_default());
    config.insert("vlanId".into(), record.vlan_id.to_string());
    config.insert(
        "intfDescription".into(),
        record.interface_description.clone().unwrap_or_default(),
    );
    config.insert("segmentId".into(), record.network_id.to_string());
    config.insert("type".into(), NETWORK_TYPE.into());
    config.insert("vrfName".into(), record.vrf().to_owned());
    config.insert("isLayer2Only".into(), flag(record.layer2_only));
    config.insert("gatewayIpAddress".into(), String::new());
    for (key, value) in TEMPLATE_FIELDS {
        config.insert((*key).into(), (*value).into());
    }

    let known = |key: &str| TEMPLATE_FIELDS.iter().any(|(k, _)| *k == key);
    for section in SECTIONS {
        for (key, value) in tables.mapped_section(section) {
            if known(&key) {
                config.insert(key, value.to_string());
            }
        }
        if let Some(user) = record.overrides.get(section) {
            for (key, value) in user {
                let wire = tables.wire_name(section, key);
                if known(&wire) {
                    config.insert(wire, value.to_string());
                }
            }
        }
    }

    if !record.layer2_only {
        if let Some(gateway) = &record.gateway {
            validate_gateway(gateway)?;
            config.insert("gatewayIpAddress".into(), gateway.clone());
        }
    }

    let network_template_config = serde_json::to_string(&config)
        .map_err(|e| build_err("networkTemplateConfig", e.to_string()))?;

    Ok(NetworkPayload {
        fabric: record.fabric.clone(),
        network_name: record.name.clone(),
        display_name: record.name.clone(),
        network_id: record.network_id,
        network_template: tables
            .default_str("networkTemplate")
            .unwrap_or_else(|| NETWORK_TEMPLATE.into()),
        network_extension_template: tables
            .default_str("networkExtensionTemplate")
            .unwrap_or_else(|| NETWORK_EXTENSION_TEMPLATE.into()),
        vrf: record.vrf().to_owned(),
        network_template_config,
        network_type: NETWORK_TYPE.into(),
        primary_network_id: -1,
        hierarchical_key: Some(record.fabric.clone()),
    })
}

/// `a.b.c.d/len` with a prefix length of at most 32.
fn validate_gateway(gateway: &str) -> Result<(), CoreError> {
    let field = "IPv4 Gateway/NetMask";
    let (addr, len) = gateway
        .split_once('/')
        .ok_or_else(|| build_err(field, format!("'{gateway}' is missing a /prefix length")))?;
    addr.trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| build_err(field, format!("'{addr}' is not an IPv4 address")))?;
    match len.trim().parse::<u8>() {
        Ok(n) if n <= 32 => Ok(()),
        _ => Err(build_err(field, format!("'{len}' is not a prefix length"))),
    }
}
