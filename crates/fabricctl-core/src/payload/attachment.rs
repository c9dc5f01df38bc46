use fabricctl_api::types::{NetworkAttachRequest, VrfAttachmentRequest, VrfLanAttach};

/// One-switch VRF attach (`attach = true`) or detach body.
pub fn vrf_attach_request(
    fabric: &str,
    vrf: &str,
    serial: &str,
    vlan: u16,
    attach: bool,
) -> VrfAttachmentRequest {
    VrfAttachmentRequest {
        vrf_name: vrf.to_owned(),
        lan_attach_list: vec![VrfLanAttach {
            fabric: fabric.to_owned(),
            vrf_name: vrf.to_owned(),
            serial_number: serial.to_owned(),
            vlan: vlan.to_string(),
            deployment: attach,
            instance_values: String::new(),
            freeform_config: String::new(),
        }],
    }
}

/// Network attach/detach body for a set of ports on one switch.
pub fn network_attach_request(
    fabric: &str,
    network: &str,
    serial: &str,
    ports: &[String],
    vlan: u16,
    attach: bool,
) -> NetworkAttachRequest {
    let ports = ports.join(",");
    let (switch_ports, detach_switch_ports) = if attach {
        (Some(ports), None)
    } else {
        (None, Some(ports))
    };
    NetworkAttachRequest {
        fabric: fabric.to_owned(),
        network_name: network.to_owned(),
        serial_number: serial.to_owned(),
        switch_ports,
        detach_switch_ports,
        vlan,
        deployment: attach,
        instance_values: String::new(),
        freeform_config: String::new(),
    }
}
