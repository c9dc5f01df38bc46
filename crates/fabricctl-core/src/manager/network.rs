use fabricctl_api::types::NetworkPayload;
use tracing::{debug, info};

use super::attachments_apply;
use crate::controller::SegmentApi;
use crate::derive::{derive_network_attachments, group_ports};
use crate::error::{CoreError, DetachFailure};
use crate::loader::ConfigLoader;
use crate::model::{AttachmentRelation, EntityKind, NetworkRecord, SwitchRecord};
use crate::payload::{network_attach_request, network_payload};
use crate::reconcile::{Phase, SyncPlan, SyncReport, SyncTarget, plan, reconcile};

const TABLES: &str = "network";

pub struct NetworkManager<'a, C> {
    loader: &'a ConfigLoader,
    api: &'a C,
}

impl<'a, C: SegmentApi> NetworkManager<'a, C> {
    pub fn new(loader: &'a ConfigLoader, api: &'a C) -> Self {
        Self { loader, api }
    }

    fn payload(&self, record: &NetworkRecord) -> Result<NetworkPayload, CoreError> {
        let tables = self.loader.optional_tables(TABLES)?;
        network_payload(record, &tables)
    }

    fn desired(&self, fabric: &str) -> Result<Vec<NetworkPayload>, CoreError> {
        self.loader
            .networks(fabric)?
            .iter()
            .map(|record| self.payload(record))
            .collect()
    }

    pub async fn create(&self, fabric: &str, name: &str) -> Result<(), CoreError> {
        let payload = self.payload(&self.loader.network(fabric, name)?)?;
        self.api.create_network(&payload).await?;
        info!(fabric, network = name, "network created");
        Ok(())
    }

    pub async fn update(&self, fabric: &str, name: &str) -> Result<(), CoreError> {
        let payload = self.payload(&self.loader.network(fabric, name)?)?;
        self.api.update_network(&payload).await?;
        info!(fabric, network = name, "network updated");
        Ok(())
    }

    /// Detach from every switch (all ports), then delete.
    pub async fn delete(&self, fabric: &str, name: &str) -> Result<(), CoreError> {
        let attached = self.api.network_attachments(fabric, name).await?;
        let mut failures = Vec::new();
        for state in &attached {
            let ports: Vec<String> = state.ports().into_iter().map(str::to_owned).collect();
            let body = network_attach_request(
                fabric,
                name,
                &state.switch_serial_no,
                &ports,
                state.vlan_id.unwrap_or_default(),
                false,
            );
            match self.api.post_network_attachment(&body).await {
                Ok(()) => debug!(network = name, serial = %state.switch_serial_no, "detached"),
                Err(e) => failures.push(DetachFailure {
                    switch: state
                        .switch_name
                        .clone()
                        .unwrap_or_else(|| state.switch_serial_no.clone()),
                    cause: e.to_string(),
                }),
            }
        }
        if !failures.is_empty() {
            return Err(CoreError::DetachFailed {
                entity: name.to_owned(),
                failures,
            });
        }

        self.api
            .delete_network(fabric, name)
            .await
            .map_err(|e| CoreError::from_delete_rejection(name, e))?;
        info!(fabric, network = name, "network deleted");
        Ok(())
    }

    pub async fn list(&self, fabric: &str) -> Result<Vec<NetworkPayload>, CoreError> {
        self.api.list_networks(fabric).await
    }

    pub async fn plan(&self, fabric: &str) -> Result<SyncPlan<String>, CoreError> {
        let desired = self.desired(fabric)?;
        let observed = self.api.list_networks(fabric).await?;
        Ok(plan(
            desired.into_iter().map(|p| p.network_name),
            observed.into_iter().map(|p| p.network_name),
        ))
    }

    pub async fn sync(&self, fabric: &str) -> Result<SyncReport, CoreError> {
        let desired = self.desired(fabric)?;
        let observed = self.api.list_networks(fabric).await?;
        Ok(reconcile(self, desired, observed).await)
    }

    /// Attach every network the switch's access and trunk ports carry,
    /// one request per network with all its ports.
    pub async fn attach(&self, fabric: &str, role: &str, switch: &str) -> Result<SyncReport, CoreError> {
        self.apply_derived(fabric, role, switch, true).await
    }

    pub async fn detach(&self, fabric: &str, role: &str, switch: &str) -> Result<SyncReport, CoreError> {
        self.apply_derived(fabric, role, switch, false).await
    }

    async fn apply_derived(
        &self,
        fabric: &str,
        role: &str,
        switch: &str,
        attach: bool,
    ) -> Result<SyncReport, CoreError> {
        if !attachments_apply(self.loader, fabric)? {
            return Ok(SyncReport::empty(EntityKind::NetworkAttachment));
        }
        let record = self.loader.switch(fabric, role, switch)?;
        self.apply_to(&record, attach).await
    }

    /// Attach (or detach) the networks derived for an already-loaded switch.
    pub(crate) async fn apply_to(&self, record: &SwitchRecord, attach: bool) -> Result<SyncReport, CoreError> {
        let fabric = record.fabric.as_str();
        let mut report = SyncReport::empty(EntityKind::NetworkAttachment);
        let relations = derive_network_attachments(record, &self.loader.networks(fabric)?);
        let phase = if attach { Phase::Create } else { Phase::Delete };
        for ((network, serial), (vlan, ports)) in group_ports(&relations) {
            let body = network_attach_request(fabric, &network, &serial, &ports, vlan, attach);
            let result = self.api.post_network_attachment(&body).await;
            report.record(format!("{network}@{serial}"), phase, result);
        }
        Ok(report)
    }

    /// Diff the switch's derived port attachments against the controller.
    pub async fn sync_attachments(
        &self,
        fabric: &str,
        role: &str,
        switch: &str,
    ) -> Result<SyncReport, CoreError> {
        if !attachments_apply(self.loader, fabric)? {
            return Ok(SyncReport::empty(EntityKind::NetworkAttachment));
        }
        let record = self.loader.switch(fabric, role, switch)?;
        let desired = derive_network_attachments(&record, &self.loader.networks(fabric)?);

        let mut observed = Vec::new();
        for network in self.api.list_networks(fabric).await? {
            for state in self
                .api
                .network_attachments(fabric, &network.network_name)
                .await?
            {
                if state.switch_serial_no != record.serial_number {
                    continue;
                }
                let vlan = state.vlan_id.unwrap_or_default();
                observed.extend(state.ports().into_iter().map(|port| {
                    AttachmentRelation::network(&network.network_name, &state.switch_serial_no, port, vlan)
                }));
            }
        }

        let target = NetworkAttachments {
            api: self.api,
            fabric,
        };
        Ok(reconcile(&target, desired, observed).await)
    }
}

impl<C: SegmentApi> SyncTarget for NetworkManager<'_, C> {
    type Desired = NetworkPayload;
    type Observed = NetworkPayload;
    type Key = String;

    fn kind(&self) -> EntityKind {
        EntityKind::Network
    }

    fn desired_key(&self, desired: &NetworkPayload) -> String {
        desired.network_name.clone()
    }

    fn observed_key(&self, observed: &NetworkPayload) -> String {
        observed.network_name.clone()
    }

    async fn delete(&self, observed: &NetworkPayload) -> Result<(), CoreError> {
        NetworkManager::delete(self, &observed.fabric, &observed.network_name).await
    }

    async fn update(&self, desired: &NetworkPayload, _observed: &NetworkPayload) -> Result<(), CoreError> {
        self.api.update_network(desired).await
    }

    async fn create(&self, desired: &NetworkPayload) -> Result<(), CoreError> {
        self.api.create_network(desired).await
    }
}

/// Per-port network attachments of one switch.
struct NetworkAttachments<'a, C> {
    api: &'a C,
    fabric: &'a str,
}

impl<C: SegmentApi> NetworkAttachments<'_, C> {
    async fn post(&self, rel: &AttachmentRelation, attach: bool) -> Result<(), CoreError> {
        let ports: Vec<String> = rel.interface().map(str::to_owned).into_iter().collect();
        let body = network_attach_request(
            self.fabric,
            &rel.entity,
            &rel.switch_serial,
            &ports,
            rel.vlan(),
            attach,
        );
        self.api.post_network_attachment(&body).await
    }
}

impl<C: SegmentApi> SyncTarget for NetworkAttachments<'_, C> {
    type Desired = AttachmentRelation;
    type Observed = AttachmentRelation;
    type Key = String;

    fn kind(&self) -> EntityKind {
        EntityKind::NetworkAttachment
    }

    fn desired_key(&self, desired: &AttachmentRelation) -> String {
        desired.key()
    }

    fn observed_key(&self, observed: &AttachmentRelation) -> String {
        observed.key()
    }

    async fn delete(&self, observed: &AttachmentRelation) -> Result<(), CoreError> {
        self.post(observed, false).await
    }

    async fn update(&self, desired: &AttachmentRelation, _observed: &AttachmentRelation) -> Result<(), CoreError> {
        self.post(desired, true).await
    }

    async fn create(&self, desired: &AttachmentRelation) -> Result<(), CoreError> {
        self.post(desired, true).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::loader::ProjectLayout;
    use crate::manager::fake::{FakeController, project};

    const FABRIC: &str = "General:\n  BGP ASN: 65001\n";

    const NETWORKS: &str = "\
Network:
  - Fabric: Site1
    Network Name: web
    Network ID: 30100
    VLAN ID: 100
    VRF Name: bluevrf
    IPv4 Gateway/NetMask: 10.1.100.1/24
  - Fabric: Site1
    Network Name: db
    Network ID: 30300
    VLAN ID: 300
    Layer 2 Only: true
";

    const LEAF: &str = "\
Serial Number: SAL1
IP Address: 10.0.0.11/24
Interface:
  - Ethernet1/1:
      policy: int_trunk_host
      Trunk Allowed Vlans: 100,200,300-302
  - Ethernet1/2:
      policy: int_access_host
      Access Vlan: 100
";

    fn fixture() -> tempfile::TempDir {
        project(&[
            ("network_configs/1_vxlan_evpn/fabric/Site1.yaml", FABRIC),
            ("network_configs/5_segment/network.yaml", NETWORKS),
            ("network_configs/3_node/Site1/leaf/leaf1.yaml", LEAF),
        ])
    }

    #[tokio::test]
    async fn attach_groups_ports_per_network() {
        let dir = fixture();
        let loader = ConfigLoader::new(ProjectLayout::new(dir.path()));
        let api = FakeController::default();

        let report = NetworkManager::new(&loader, &api)
            .attach("Site1", "leaf", "leaf1")
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(
            api.calls(),
            vec![
                "attach_network db SAL1 Ethernet1/1",
                "attach_network web SAL1 Ethernet1/1,Ethernet1/2",
            ]
        );
    }

    #[tokio::test]
    async fn sync_attachments_detaches_stale_ports() {
        let dir = fixture();
        let loader = ConfigLoader::new(ProjectLayout::new(dir.path()));
        let api = FakeController::default();
        api.seed_network("Site1", "web");
        api.seed_network("Site1", "db");
        api.seed_network_attachment("web", "SAL1", "leaf1", 100, "Ethernet1/2,Ethernet1/9");

        let report = NetworkManager::new(&loader, &api)
            .sync_attachments("Site1", "leaf", "leaf1")
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.plan.to_delete, vec!["web@SAL1:Ethernet1/9".to_owned()]);
        assert_eq!(report.plan.to_update, vec!["web@SAL1:Ethernet1/2".to_owned()]);
        assert_eq!(
            report.plan.to_create,
            vec!["db@SAL1:Ethernet1/1".to_owned(), "web@SAL1:Ethernet1/1".to_owned()]
        );
        let calls = api.calls();
        let detach = calls.iter().position(|c| c == "detach_network web SAL1 Ethernet1/9");
        let create = calls.iter().position(|c| c == "attach_network db SAL1 Ethernet1/1");
        assert!(detach < create);
    }

    #[tokio::test]
    async fn delete_detaches_every_port_first() {
        let dir = fixture();
        let loader = ConfigLoader::new(ProjectLayout::new(dir.path()));
        let api = FakeController::default();
        api.seed_network("Site1", "web");
        api.seed_network_attachment("web", "SAL1", "leaf1", 100, "Ethernet1/1,Ethernet1/2");

        NetworkManager::new(&loader, &api)
            .delete("Site1", "web")
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                "network_attachments web",
                "detach_network web SAL1 Ethernet1/1,Ethernet1/2",
                "delete_network web",
            ]
        );
    }

    #[tokio::test]
    async fn inter_site_fabric_is_skipped() {
        let dir = project(&[(
            "network_configs/1_vxlan_evpn/inter-site_network/ISN1.yaml",
            "General:\n  BGP ASN: 65000\n",
        )]);
        let loader = ConfigLoader::new(ProjectLayout::new(dir.path()));
        let api = FakeController::default();

        let report = NetworkManager::new(&loader, &api)
            .attach("ISN1", "leaf", "leaf1")
            .await
            .unwrap();

        assert!(report.outcomes.is_empty());
        assert!(api.calls().is_empty());
    }
}
