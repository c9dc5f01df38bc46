use fabricctl_api::types::{DiscoveredSwitch, DiscoveryRequest, SwitchRoleAssignment};
use secrecy::{ExposeSecret, SecretString};

use super::build_err;
use crate::error::CoreError;
use crate::model::SwitchRecord;

const DISCOVERY_USER: &str = "admin";

/// Discovery body for one switch. `seedIP` is the management address
/// without any `/prefix`.
pub fn discovery_request(
    switch: &SwitchRecord,
    password: &SecretString,
    preserve_config: bool,
) -> Result<DiscoveryRequest, CoreError> {
    let ip = switch
        .ip_address
        .as_deref()
        .map(|ip| ip.split('/').next().unwrap_or(ip).trim())
        .filter(|ip| !ip.is_empty())
        .ok_or_else(|| build_err("IP Address", format!("is required to discover {}", switch.name)))?;
    Ok(DiscoveryRequest {
        seed_ip: ip.to_owned(),
        username: DISCOVERY_USER.into(),
        password: password.expose_secret().to_owned(),
        max_hops: 0,
        preserve_config,
        switches: vec![DiscoveredSwitch {
            sys_name: switch.name.clone(),
            serial_number: switch.serial_number.clone(),
            ipaddr: ip.to_owned(),
            platform: switch.platform.clone(),
            device_index: switch.device_index(),
            version: switch.version.clone(),
        }],
        platform: "null".into(),
    })
}

pub fn role_assignments(switches: &[&SwitchRecord]) -> Vec<SwitchRoleAssignment> {
    switches
        .iter()
        .map(|s| SwitchRoleAssignment {
            serial_number: s.serial_number.clone(),
            role: s.role.as_wire().to_owned(),
        })
        .collect()
}
