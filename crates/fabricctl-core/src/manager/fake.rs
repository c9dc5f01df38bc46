// Recording in-memory controller for manager tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use fabricctl_api::types::{
    AdminOperation, AdminStatusRequest, DiscoveryIpChange, DiscoveryRequest, FabricSummary,
    InterfaceGroup, InterfacePolicyRequest, InterfaceRef, LanAttachState, NetworkAttachRequest,
    NetworkAttachmentStatus, NetworkPayload, PendingSwitchConfig, PolicyRecord, SwitchInventory,
    SwitchRoleAssignment, VpcPairRequest, VrfAttachmentRequest, VrfPayload,
};
use tempfile::TempDir;

use crate::controller::{FabricApi, InterfaceApi, PolicyApi, SegmentApi, SwitchApi, VpcApi};
use crate::error::CoreError;
use crate::payload::FabricPayload;

/// Write `(relative path, body)` pairs into a fresh project root.
pub(crate) fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (rel, body) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }
    dir
}

#[derive(Default)]
struct State {
    calls: Vec<String>,
    fabrics: BTreeMap<String, FabricPayload>,
    vrfs: BTreeMap<String, VrfPayload>,
    /// (vrf, attachment)
    vrf_attachments: Vec<(String, LanAttachState)>,
    networks: BTreeMap<String, NetworkPayload>,
    network_attachments: Vec<NetworkAttachmentStatus>,
    switches: Vec<SwitchInventory>,
    interfaces: Vec<InterfaceGroup>,
    policies: Vec<PolicyRecord>,
    /// fabric -> pending preview
    pending: BTreeMap<String, Vec<PendingSwitchConfig>>,
    fail_detach: BTreeSet<String>,
    fail_calls: BTreeSet<String>,
    reject_attached_delete: bool,
}

#[derive(Default)]
pub(crate) struct FakeController {
    state: RefCell<State>,
}

impl FakeController {
    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn policies(&self) -> Vec<PolicyRecord> {
        self.state.borrow().policies.clone()
    }

    pub(crate) fn fabric(&self, name: &str) -> Option<FabricPayload> {
        self.state.borrow().fabrics.get(name).cloned()
    }

    pub(crate) fn seed_vrf(&self, fabric: &str, name: &str) {
        self.state.borrow_mut().vrfs.insert(
            name.into(),
            VrfPayload {
                fabric: fabric.into(),
                vrf_name: name.into(),
                vrf_id: 0,
                vrf_template: String::new(),
                vrf_extension_template: String::new(),
                vrf_template_config: String::new(),
                hierarchical_key: None,
            },
        );
    }

    pub(crate) fn seed_vrf_attachment(&self, vrf: &str, serial: &str, switch: &str, vlan: u16) {
        self.state.borrow_mut().vrf_attachments.push((
            vrf.into(),
            LanAttachState {
                switch_serial_no: serial.into(),
                switch_name: Some(switch.into()),
                vlan_id: Some(vlan),
                is_lan_attached: true,
                lan_attach_state: Some("DEPLOYED".into()),
            },
        ));
    }

    pub(crate) fn seed_network(&self, fabric: &str, name: &str) {
        self.state.borrow_mut().networks.insert(
            name.into(),
            NetworkPayload {
                fabric: fabric.into(),
                network_name: name.into(),
                display_name: name.into(),
                network_id: 0,
                network_template: String::new(),
                network_extension_template: String::new(),
                vrf: String::new(),
                network_template_config: String::new(),
                network_type: "Normal".into(),
                primary_network_id: -1,
                hierarchical_key: None,
            },
        );
    }

    pub(crate) fn seed_network_attachment(
        &self,
        network: &str,
        serial: &str,
        switch: &str,
        vlan: u16,
        ports: &str,
    ) {
        self.state
            .borrow_mut()
            .network_attachments
            .push(NetworkAttachmentStatus {
                network_name: network.into(),
                switch_serial_no: serial.into(),
                switch_name: Some(switch.into()),
                port_names: Some(ports.into()),
                vlan_id: Some(vlan),
                is_lan_attached: true,
            });
    }

    pub(crate) fn seed_switch(&self, serial: &str, name: &str, ip: &str) {
        self.state.borrow_mut().switches.push(SwitchInventory {
            serial_number: serial.into(),
            logical_name: Some(name.into()),
            ip_address: Some(ip.into()),
            switch_role: Some("leaf".into()),
            model: None,
            release: None,
            status: None,
        });
    }

    pub(crate) fn seed_interfaces(&self, groups: Vec<InterfaceGroup>) {
        self.state.borrow_mut().interfaces = groups;
    }

    pub(crate) fn seed_policy(&self, policy: PolicyRecord) {
        self.state.borrow_mut().policies.push(policy);
    }

    pub(crate) fn seed_pending(&self, fabric: &str, pending: Vec<PendingSwitchConfig>) {
        self.state.borrow_mut().pending.insert(fabric.into(), pending);
    }

    /// Detach calls for this serial fail with HTTP 500.
    pub(crate) fn fail_detach_on(&self, serial: &str) {
        self.state.borrow_mut().fail_detach.insert(serial.into());
    }

    /// Calls whose log line starts with `prefix` fail with HTTP 500.
    pub(crate) fn fail_call(&self, prefix: &str) {
        self.state.borrow_mut().fail_calls.insert(prefix.into());
    }

    pub(crate) fn reject_delete_as_attached(&self) {
        self.state.borrow_mut().reject_attached_delete = true;
    }

    fn log(&self, line: String) -> Result<(), CoreError> {
        let mut state = self.state.borrow_mut();
        let failing = state.fail_calls.iter().any(|p| line.starts_with(p.as_str()));
        state.calls.push(line);
        if failing {
            return Err(server_error());
        }
        Ok(())
    }
}

fn server_error() -> CoreError {
    CoreError::ControllerApi {
        status: 500,
        body: "internal error".into(),
    }
}

fn attached_error() -> CoreError {
    CoreError::ControllerApi {
        status: 400,
        body: "entity is attached to one or more switches".into(),
    }
}

// ── Fabrics ──────────────────────────────────────────────────────────

impl FabricApi for FakeController {
    async fn list_fabrics(&self) -> Result<Vec<FabricSummary>, CoreError> {
        self.log("list_fabrics".into())?;
        Ok(self
            .state
            .borrow()
            .fabrics
            .values()
            .map(|f| FabricSummary {
                fabric_name: f.name.clone(),
                fabric_id: None,
                fabric_type: None,
                template_name: Some(f.template.into()),
                fabric_technology: None,
                nv_pairs: None,
            })
            .collect())
    }

    async fn create_fabric(&self, payload: &FabricPayload) -> Result<(), CoreError> {
        self.log(format!("create_fabric {}", payload.name))?;
        self.state
            .borrow_mut()
            .fabrics
            .insert(payload.name.clone(), payload.clone());
        Ok(())
    }

    async fn update_fabric(&self, payload: &FabricPayload) -> Result<(), CoreError> {
        self.log(format!("update_fabric {}", payload.name))?;
        self.state
            .borrow_mut()
            .fabrics
            .insert(payload.name.clone(), payload.clone());
        Ok(())
    }

    async fn delete_fabric(&self, fabric: &str) -> Result<(), CoreError> {
        self.log(format!("delete_fabric {fabric}"))?;
        self.state.borrow_mut().fabrics.remove(fabric);
        Ok(())
    }

    async fn recalculate(&self, fabric: &str) -> Result<(), CoreError> {
        self.log(format!("recalculate {fabric}"))
    }

    async fn deploy(&self, fabric: &str) -> Result<(), CoreError> {
        self.log(format!("deploy {fabric}"))
    }

    async fn pending_config(&self, fabric: &str) -> Result<Vec<PendingSwitchConfig>, CoreError> {
        self.log(format!("pending_config {fabric}"))?;
        Ok(self
            .state
            .borrow()
            .pending
            .get(fabric)
            .cloned()
            .unwrap_or_default())
    }

    async fn msd_add(&self, msd: &str, child: &str) -> Result<(), CoreError> {
        self.log(format!("msd_add {msd} {child}"))
    }

    async fn msd_remove(&self, msd: &str, child: &str) -> Result<(), CoreError> {
        self.log(format!("msd_remove {msd} {child}"))
    }
}

// ── VRFs and networks ────────────────────────────────────────────────

impl SegmentApi for FakeController {
    async fn list_vrfs(&self, fabric: &str) -> Result<Vec<VrfPayload>, CoreError> {
        self.log(format!("list_vrfs {fabric}"))?;
        Ok(self
            .state
            .borrow()
            .vrfs
            .values()
            .filter(|v| v.fabric == fabric)
            .cloned()
            .collect())
    }

    async fn create_vrf(&self, payload: &VrfPayload) -> Result<(), CoreError> {
        self.log(format!("create_vrf {}", payload.vrf_name))?;
        self.state
            .borrow_mut()
            .vrfs
            .insert(payload.vrf_name.clone(), payload.clone());
        Ok(())
    }

    async fn update_vrf(&self, payload: &VrfPayload) -> Result<(), CoreError> {
        self.log(format!("update_vrf {}", payload.vrf_name))
    }

    async fn delete_vrf(&self, _fabric: &str, vrf: &str) -> Result<(), CoreError> {
        self.log(format!("delete_vrf {vrf}"))?;
        let mut state = self.state.borrow_mut();
        if state.reject_attached_delete {
            return Err(attached_error());
        }
        state.vrfs.remove(vrf);
        Ok(())
    }

    async fn vrf_attachments(&self, _fabric: &str, vrf: &str) -> Result<Vec<LanAttachState>, CoreError> {
        self.log(format!("vrf_attachments {vrf}"))?;
        Ok(self
            .state
            .borrow()
            .vrf_attachments
            .iter()
            .filter(|(name, _)| name == vrf)
            .map(|(_, a)| a.clone())
            .collect())
    }

    async fn post_vrf_attachment(&self, _fabric: &str, body: &VrfAttachmentRequest) -> Result<(), CoreError> {
        for lan in &body.lan_attach_list {
            let verb = if lan.deployment { "attach" } else { "detach" };
            self.log(format!("{verb}_vrf {} {}", lan.vrf_name, lan.serial_number))?;
            let mut state = self.state.borrow_mut();
            if !lan.deployment {
                if state.fail_detach.contains(&lan.serial_number) {
                    return Err(server_error());
                }
                state
                    .vrf_attachments
                    .retain(|(vrf, a)| !(vrf == &lan.vrf_name && a.switch_serial_no == lan.serial_number));
            }
        }
        Ok(())
    }

    async fn list_networks(&self, fabric: &str) -> Result<Vec<NetworkPayload>, CoreError> {
        self.log(format!("list_networks {fabric}"))?;
        Ok(self
            .state
            .borrow()
            .networks
            .values()
            .filter(|n| n.fabric == fabric)
            .cloned()
            .collect())
    }

    async fn create_network(&self, payload: &NetworkPayload) -> Result<(), CoreError> {
        self.log(format!("create_network {}", payload.network_name))?;
        self.state
            .borrow_mut()
            .networks
            .insert(payload.network_name.clone(), payload.clone());
        Ok(())
    }

    async fn update_network(&self, payload: &NetworkPayload) -> Result<(), CoreError> {
        self.log(format!("update_network {}", payload.network_name))
    }

    async fn delete_network(&self, _fabric: &str, network: &str) -> Result<(), CoreError> {
        self.log(format!("delete_network {network}"))?;
        let mut state = self.state.borrow_mut();
        if state.reject_attached_delete {
            return Err(attached_error());
        }
        state.networks.remove(network);
        Ok(())
    }

    async fn network_attachments(
        &self,
        _fabric: &str,
        network: &str,
    ) -> Result<Vec<NetworkAttachmentStatus>, CoreError> {
        // Per-switch sync walks every network; only log lookups that return something.
        let found: Vec<_> = self
            .state
            .borrow()
            .network_attachments
            .iter()
            .filter(|a| a.network_name == network)
            .cloned()
            .collect();
        if !found.is_empty() {
            self.log(format!("network_attachments {network}"))?;
        }
        Ok(found)
    }

    async fn post_network_attachment(&self, body: &NetworkAttachRequest) -> Result<(), CoreError> {
        let (verb, ports) = match (&body.switch_ports, &body.detach_switch_ports) {
            (Some(ports), _) => ("attach", ports.clone()),
            (None, Some(ports)) => ("detach", ports.clone()),
            (None, None) => ("attach", String::new()),
        };
        self.log(format!(
            "{verb}_network {} {} {ports}",
            body.network_name, body.serial_number
        ))?;
        if verb == "detach" && self.state.borrow().fail_detach.contains(&body.serial_number) {
            return Err(server_error());
        }
        Ok(())
    }
}

// ── Switches ─────────────────────────────────────────────────────────

impl SwitchApi for FakeController {
    async fn list_switches(&self, fabric: &str) -> Result<Vec<SwitchInventory>, CoreError> {
        self.log(format!("list_switches {fabric}"))?;
        Ok(self.state.borrow().switches.clone())
    }

    async fn discover(&self, fabric: &str, body: &DiscoveryRequest) -> Result<(), CoreError> {
        self.log(format!("discover {fabric} {}", body.seed_ip))?;
        let mut state = self.state.borrow_mut();
        for sw in &body.switches {
            state.switches.push(SwitchInventory {
                serial_number: sw.serial_number.clone(),
                logical_name: Some(sw.sys_name.clone()),
                ip_address: Some(sw.ipaddr.clone()),
                switch_role: None,
                model: None,
                release: Some(sw.version.clone()),
                status: None,
            });
        }
        Ok(())
    }

    async fn delete_switch(&self, fabric: &str, serial: &str) -> Result<(), CoreError> {
        self.log(format!("delete_switch {fabric} {serial}"))?;
        self.state
            .borrow_mut()
            .switches
            .retain(|s| s.serial_number != serial);
        Ok(())
    }

    async fn set_roles(&self, body: &[SwitchRoleAssignment]) -> Result<(), CoreError> {
        let roles: Vec<String> = body
            .iter()
            .map(|r| format!("{}={}", r.serial_number, r.role))
            .collect();
        self.log(format!("set_roles {}", roles.join(",")))
    }

    async fn change_discovery_ip(&self, fabric: &str, body: &DiscoveryIpChange) -> Result<(), CoreError> {
        self.log(format!(
            "change_ip {fabric} {} {}",
            body.serial_number, body.ip_address
        ))
    }

    async fn rediscover(&self, fabric: &str, serial: &str) -> Result<(), CoreError> {
        self.log(format!("rediscover {fabric} {serial}"))
    }

    async fn deploy_switch(&self, fabric: &str, serial: &str) -> Result<(), CoreError> {
        self.log(format!("deploy_switch {fabric} {serial}"))
    }
}

// ── Interfaces, vPC, policies ────────────────────────────────────────

impl InterfaceApi for FakeController {
    async fn list_interfaces(&self, serial: &str) -> Result<Vec<InterfaceGroup>, CoreError> {
        self.log(format!("list_interfaces {serial}"))?;
        Ok(self.state.borrow().interfaces.clone())
    }

    async fn update_interfaces(&self, body: &InterfacePolicyRequest) -> Result<(), CoreError> {
        let names: Vec<&str> = body.interfaces.iter().map(|i| i.if_name.as_str()).collect();
        self.log(format!("update_interfaces {} {}", body.policy, names.join(",")))
    }

    async fn create_interfaces(&self, body: &InterfacePolicyRequest) -> Result<(), CoreError> {
        let names: Vec<&str> = body.interfaces.iter().map(|i| i.if_name.as_str()).collect();
        self.log(format!("create_interfaces {} {}", body.policy, names.join(",")))
    }

    async fn set_admin_status(&self, body: &AdminStatusRequest) -> Result<(), CoreError> {
        let op = match body.operation {
            AdminOperation::Shut => "shut",
            AdminOperation::NoShut => "noshut",
        };
        let names: Vec<&str> = body.interfaces.iter().map(|i| i.if_name.as_str()).collect();
        self.log(format!("{op} {}", names.join(",")))
    }

    async fn mark_delete(&self, interfaces: &[InterfaceRef]) -> Result<(), CoreError> {
        let names: Vec<String> = interfaces
            .iter()
            .map(|i| format!("{}:{}", i.serial_number, i.if_name))
            .collect();
        self.log(format!("mark_delete {}", names.join(",")))
    }
}

impl VpcApi for FakeController {
    async fn create_vpc_pair(&self, body: &VpcPairRequest) -> Result<(), CoreError> {
        self.log(format!(
            "create_vpc_pair {} {}",
            body.peer_one_id, body.peer_two_id
        ))
    }

    async fn delete_vpc_pair(&self, serial: &str) -> Result<(), CoreError> {
        self.log(format!("delete_vpc_pair {serial}"))
    }
}

impl PolicyApi for FakeController {
    async fn switch_policies(&self, serial: &str) -> Result<Vec<PolicyRecord>, CoreError> {
        self.log(format!("switch_policies {serial}"))?;
        Ok(self
            .state
            .borrow()
            .policies
            .iter()
            .filter(|p| p.serial_number == serial)
            .cloned()
            .collect())
    }

    async fn create_policy(&self, policy: &PolicyRecord) -> Result<(), CoreError> {
        self.log(format!("create_policy {}", policy.template_name))?;
        self.state.borrow_mut().policies.push(policy.clone());
        Ok(())
    }

    async fn update_policy(&self, policy: &PolicyRecord) -> Result<(), CoreError> {
        self.log(format!("update_policy {}", policy.policy_id))?;
        let mut state = self.state.borrow_mut();
        if let Some(existing) = state
            .policies
            .iter_mut()
            .find(|p| p.policy_id == policy.policy_id)
        {
            *existing = policy.clone();
        }
        Ok(())
    }

    async fn delete_policy(&self, policy_id: &str) -> Result<(), CoreError> {
        self.log(format!("delete_policy {policy_id}"))?;
        self.state
            .borrow_mut()
            .policies
            .retain(|p| p.policy_id != policy_id);
        Ok(())
    }
}
