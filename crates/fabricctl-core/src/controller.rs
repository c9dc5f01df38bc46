// ── Controller seam ──
//
// Entity managers talk to the controller through these traits, split
// by concern so tests can fake only what a manager touches. The live
// implementation is `NdfcClient`; every API error is folded into
// `CoreError` here.

use fabricctl_api::NdfcClient;
use fabricctl_api::types::{
    AdminStatusRequest, DiscoveryIpChange, DiscoveryRequest, FabricSummary, InterfaceGroup,
    InterfacePolicyRequest, InterfaceRef, LanAttachState, NetworkAttachRequest,
    NetworkAttachmentStatus, NetworkPayload, PendingSwitchConfig, PolicyRecord, SwitchInventory,
    SwitchRoleAssignment, VpcPairRequest, VrfAttachmentRequest, VrfPayload,
};

use crate::error::CoreError;
use crate::payload::FabricPayload;

#[allow(async_fn_in_trait)]
pub trait FabricApi {
    async fn list_fabrics(&self) -> Result<Vec<FabricSummary>, CoreError>;
    async fn create_fabric(&self, payload: &FabricPayload) -> Result<(), CoreError>;
    async fn update_fabric(&self, payload: &FabricPayload) -> Result<(), CoreError>;
    async fn delete_fabric(&self, fabric: &str) -> Result<(), CoreError>;
    async fn recalculate(&self, fabric: &str) -> Result<(), CoreError>;
    async fn deploy(&self, fabric: &str) -> Result<(), CoreError>;
    async fn pending_config(&self, fabric: &str) -> Result<Vec<PendingSwitchConfig>, CoreError>;
    async fn msd_add(&self, msd: &str, child: &str) -> Result<(), CoreError>;
    async fn msd_remove(&self, msd: &str, child: &str) -> Result<(), CoreError>;
}

/// VRFs and networks, plus their switch attachments.
#[allow(async_fn_in_trait)]
pub trait SegmentApi {
    async fn list_vrfs(&self, fabric: &str) -> Result<Vec<VrfPayload>, CoreError>;
    async fn create_vrf(&self, payload: &VrfPayload) -> Result<(), CoreError>;
    async fn update_vrf(&self, payload: &VrfPayload) -> Result<(), CoreError>;
    async fn delete_vrf(&self, fabric: &str, vrf: &str) -> Result<(), CoreError>;
    /// Switches the VRF is currently attached to.
    async fn vrf_attachments(&self, fabric: &str, vrf: &str) -> Result<Vec<LanAttachState>, CoreError>;
    async fn post_vrf_attachment(&self, fabric: &str, body: &VrfAttachmentRequest) -> Result<(), CoreError>;

    async fn list_networks(&self, fabric: &str) -> Result<Vec<NetworkPayload>, CoreError>;
    async fn create_network(&self, payload: &NetworkPayload) -> Result<(), CoreError>;
    async fn update_network(&self, payload: &NetworkPayload) -> Result<(), CoreError>;
    async fn delete_network(&self, fabric: &str, network: &str) -> Result<(), CoreError>;
    /// Switches (and ports) the network is currently attached to.
    async fn network_attachments(
        &self,
        fabric: &str,
        network: &str,
    ) -> Result<Vec<NetworkAttachmentStatus>, CoreError>;
    async fn post_network_attachment(&self, body: &NetworkAttachRequest) -> Result<(), CoreError>;
}

#[allow(async_fn_in_trait)]
pub trait SwitchApi {
    async fn list_switches(&self, fabric: &str) -> Result<Vec<SwitchInventory>, CoreError>;
    async fn discover(&self, fabric: &str, body: &DiscoveryRequest) -> Result<(), CoreError>;
    async fn delete_switch(&self, fabric: &str, serial: &str) -> Result<(), CoreError>;
    async fn set_roles(&self, body: &[SwitchRoleAssignment]) -> Result<(), CoreError>;
    async fn change_discovery_ip(&self, fabric: &str, body: &DiscoveryIpChange) -> Result<(), CoreError>;
    async fn rediscover(&self, fabric: &str, serial: &str) -> Result<(), CoreError>;
    async fn deploy_switch(&self, fabric: &str, serial: &str) -> Result<(), CoreError>;
}

#[allow(async_fn_in_trait)]
pub trait InterfaceApi {
    async fn list_interfaces(&self, serial: &str) -> Result<Vec<InterfaceGroup>, CoreError>;
    async fn update_interfaces(&self, body: &InterfacePolicyRequest) -> Result<(), CoreError>;
    async fn create_interfaces(&self, body: &InterfacePolicyRequest) -> Result<(), CoreError>;
    async fn set_admin_status(&self, body: &AdminStatusRequest) -> Result<(), CoreError>;
    async fn mark_delete(&self, interfaces: &[InterfaceRef]) -> Result<(), CoreError>;
}

#[allow(async_fn_in_trait)]
pub trait VpcApi {
    async fn create_vpc_pair(&self, body: &VpcPairRequest) -> Result<(), CoreError>;
    async fn delete_vpc_pair(&self, serial: &str) -> Result<(), CoreError>;
}

#[allow(async_fn_in_trait)]
pub trait PolicyApi {
    async fn switch_policies(&self, serial: &str) -> Result<Vec<PolicyRecord>, CoreError>;
    async fn create_policy(&self, policy: &PolicyRecord) -> Result<(), CoreError>;
    async fn update_policy(&self, policy: &PolicyRecord) -> Result<(), CoreError>;
    async fn delete_policy(&self, policy_id: &str) -> Result<(), CoreError>;
}

/// Everything the build pipeline needs.
pub trait Controller: FabricApi + SegmentApi + SwitchApi + InterfaceApi + VpcApi + PolicyApi {}

impl<T> Controller for T where T: FabricApi + SegmentApi + SwitchApi + InterfaceApi + VpcApi + PolicyApi {}

// ── NdfcClient ───────────────────────────────────────────────────────

impl FabricApi for NdfcClient {
    async fn list_fabrics(&self) -> Result<Vec<FabricSummary>, CoreError> {
        Ok(NdfcClient::list_fabrics(self).await?)
    }

    async fn create_fabric(&self, payload: &FabricPayload) -> Result<(), CoreError> {
        Ok(NdfcClient::create_fabric(self, &payload.name, payload.template, &payload.body()).await?)
    }

    async fn update_fabric(&self, payload: &FabricPayload) -> Result<(), CoreError> {
        Ok(NdfcClient::update_fabric(self, &payload.name, payload.template, &payload.body()).await?)
    }

    async fn delete_fabric(&self, fabric: &str) -> Result<(), CoreError> {
        Ok(NdfcClient::delete_fabric(self, fabric).await?)
    }

    async fn recalculate(&self, fabric: &str) -> Result<(), CoreError> {
        Ok(self.recalculate_fabric(fabric).await?)
    }

    async fn deploy(&self, fabric: &str) -> Result<(), CoreError> {
        Ok(self.deploy_fabric(fabric).await?)
    }

    async fn pending_config(&self, fabric: &str) -> Result<Vec<PendingSwitchConfig>, CoreError> {
        Ok(self.fabric_pending_config(fabric).await?)
    }

    async fn msd_add(&self, msd: &str, child: &str) -> Result<(), CoreError> {
        Ok(NdfcClient::msd_add(self, msd, child).await?)
    }

    async fn msd_remove(&self, msd: &str, child: &str) -> Result<(), CoreError> {
        Ok(self.msd_exit(msd, child).await?)
    }
}

impl SegmentApi for NdfcClient {
    async fn list_vrfs(&self, fabric: &str) -> Result<Vec<VrfPayload>, CoreError> {
        Ok(NdfcClient::list_vrfs(self, fabric).await?)
    }

    async fn create_vrf(&self, payload: &VrfPayload) -> Result<(), CoreError> {
        Ok(NdfcClient::create_vrf(self, payload).await?)
    }

    async fn update_vrf(&self, payload: &VrfPayload) -> Result<(), CoreError> {
        Ok(NdfcClient::update_vrf(self, payload).await?)
    }

    async fn delete_vrf(&self, fabric: &str, vrf: &str) -> Result<(), CoreError> {
        Ok(NdfcClient::delete_vrf(self, fabric, vrf).await?)
    }

    async fn vrf_attachments(&self, fabric: &str, vrf: &str) -> Result<Vec<LanAttachState>, CoreError> {
        let groups = NdfcClient::vrf_attachments(self, fabric, vrf).await?;
        Ok(groups
            .into_iter()
            .filter(|g| g.vrf_name == vrf)
            .flat_map(|g| g.lan_attach_list)
            .filter(|a| a.is_lan_attached)
            .collect())
    }

    async fn post_vrf_attachment(&self, fabric: &str, body: &VrfAttachmentRequest) -> Result<(), CoreError> {
        Ok(self
            .post_vrf_attachments(fabric, std::slice::from_ref(body))
            .await?)
    }

    async fn list_networks(&self, fabric: &str) -> Result<Vec<NetworkPayload>, CoreError> {
        Ok(NdfcClient::list_networks(self, fabric).await?)
    }

    async fn create_network(&self, payload: &NetworkPayload) -> Result<(), CoreError> {
        Ok(NdfcClient::create_network(self, payload).await?)
    }

    async fn update_network(&self, payload: &NetworkPayload) -> Result<(), CoreError> {
        Ok(NdfcClient::update_network(self, payload).await?)
    }

    async fn delete_network(&self, fabric: &str, network: &str) -> Result<(), CoreError> {
        Ok(NdfcClient::delete_network(self, fabric, network).await?)
    }

    async fn network_attachments(
        &self,
        fabric: &str,
        network: &str,
    ) -> Result<Vec<NetworkAttachmentStatus>, CoreError> {
        let all = NdfcClient::network_attachments(self, fabric, network).await?;
        Ok(all.into_iter().filter(|a| a.is_lan_attached).collect())
    }

    async fn post_network_attachment(&self, body: &NetworkAttachRequest) -> Result<(), CoreError> {
        Ok(NdfcClient::post_network_attachment(self, body).await?)
    }
}

impl SwitchApi for NdfcClient {
    async fn list_switches(&self, fabric: &str) -> Result<Vec<SwitchInventory>, CoreError> {
        Ok(NdfcClient::list_switches(self, fabric).await?)
    }

    async fn discover(&self, fabric: &str, body: &DiscoveryRequest) -> Result<(), CoreError> {
        Ok(self.discover_switches(fabric, body).await?)
    }

    async fn delete_switch(&self, fabric: &str, serial: &str) -> Result<(), CoreError> {
        Ok(NdfcClient::delete_switch(self, fabric, serial).await?)
    }

    async fn set_roles(&self, body: &[SwitchRoleAssignment]) -> Result<(), CoreError> {
        Ok(self.set_switch_roles(body).await?)
    }

    async fn change_discovery_ip(&self, fabric: &str, body: &DiscoveryIpChange) -> Result<(), CoreError> {
        Ok(NdfcClient::change_discovery_ip(self, fabric, body).await?)
    }

    async fn rediscover(&self, fabric: &str, serial: &str) -> Result<(), CoreError> {
        Ok(self.rediscover_switch(fabric, serial).await?)
    }

    async fn deploy_switch(&self, fabric: &str, serial: &str) -> Result<(), CoreError> {
        Ok(NdfcClient::deploy_switch(self, fabric, serial).await?)
    }
}

impl InterfaceApi for NdfcClient {
    async fn list_interfaces(&self, serial: &str) -> Result<Vec<InterfaceGroup>, CoreError> {
        Ok(NdfcClient::list_interfaces(self, serial).await?)
    }

    async fn update_interfaces(&self, body: &InterfacePolicyRequest) -> Result<(), CoreError> {
        Ok(NdfcClient::update_interfaces(self, body).await?)
    }

    async fn create_interfaces(&self, body: &InterfacePolicyRequest) -> Result<(), CoreError> {
        Ok(NdfcClient::create_interfaces(self, body).await?)
    }

    async fn set_admin_status(&self, body: &AdminStatusRequest) -> Result<(), CoreError> {
        Ok(NdfcClient::set_admin_status(self, body).await?)
    }

    async fn mark_delete(&self, interfaces: &[InterfaceRef]) -> Result<(), CoreError> {
        Ok(self.mark_delete_interfaces(interfaces).await?)
    }
}

impl VpcApi for NdfcClient {
    async fn create_vpc_pair(&self, body: &VpcPairRequest) -> Result<(), CoreError> {
        Ok(NdfcClient::create_vpc_pair(self, body).await?)
    }

    async fn delete_vpc_pair(&self, serial: &str) -> Result<(), CoreError> {
        Ok(NdfcClient::delete_vpc_pair(self, serial).await?)
    }
}

impl PolicyApi for NdfcClient {
    async fn switch_policies(&self, serial: &str) -> Result<Vec<PolicyRecord>, CoreError> {
        Ok(NdfcClient::switch_policies(self, serial).await?)
    }

    async fn create_policy(&self, policy: &PolicyRecord) -> Result<(), CoreError> {
        Ok(NdfcClient::create_policy(self, policy).await?)
    }

    async fn update_policy(&self, policy: &PolicyRecord) -> Result<(), CoreError> {
        Ok(NdfcClient::update_policy(self, policy).await?)
    }

    async fn delete_policy(&self, policy_id: &str) -> Result<(), CoreError> {
        Ok(NdfcClient::delete_policy(self, policy_id).await?)
    }
}
