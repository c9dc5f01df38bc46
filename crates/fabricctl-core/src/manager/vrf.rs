use fabricctl_api::types::{VrfAttachmentRequest, VrfPayload};
use tracing::{debug, info};

use super::attachments_apply;
use crate::controller::SegmentApi;
use crate::derive::derive_vrf_attachments;
use crate::error::{CoreError, DetachFailure};
use crate::loader::ConfigLoader;
use crate::model::{AttachmentRelation, EntityKind, SwitchRecord, VrfRecord};
use crate::payload::{vrf_attach_request, vrf_payload};
use crate::reconcile::{Phase, SyncPlan, SyncReport, SyncTarget, plan, reconcile};

/// Reference tables carrying VRF template defaults.
const TABLES: &str = "vrf";

pub struct VrfManager<'a, C> {
    loader: &'a ConfigLoader,
    api: &'a C,
}

impl<'a, C: SegmentApi> VrfManager<'a, C> {
    pub fn new(loader: &'a ConfigLoader, api: &'a C) -> Self {
        Self { loader, api }
    }

    fn payload(&self, record: &VrfRecord) -> Result<VrfPayload, CoreError> {
        let tables = self.loader.optional_tables(TABLES)?;
        vrf_payload(record, &tables)
    }

    fn desired(&self, fabric: &str) -> Result<Vec<VrfPayload>, CoreError> {
        self.loader
            .vrfs(fabric)?
            .iter()
            .map(|record| self.payload(record))
            .collect()
    }

    pub async fn create(&self, fabric: &str, name: &str) -> Result<(), CoreError> {
        let payload = self.payload(&self.loader.vrf(fabric, name)?)?;
        self.api.create_vrf(&payload).await?;
        info!(fabric, vrf = name, "VRF created");
        Ok(())
    }

    pub async fn update(&self, fabric: &str, name: &str) -> Result<(), CoreError> {
        let payload = self.payload(&self.loader.vrf(fabric, name)?)?;
        self.api.update_vrf(&payload).await?;
        info!(fabric, vrf = name, "VRF updated");
        Ok(())
    }

    /// Detach from every switch, then delete. A single failed detach
    /// leaves the VRF in place.
    pub async fn delete(&self, fabric: &str, name: &str) -> Result<(), CoreError> {
        let attached = self.api.vrf_attachments(fabric, name).await?;
        let mut failures = Vec::new();
        for state in &attached {
            let vlan = state.vlan_id.unwrap_or_default();
            let body = vrf_attach_request(fabric, name, &state.switch_serial_no, vlan, false);
            match self.api.post_vrf_attachment(fabric, &body).await {
                Ok(()) => debug!(vrf = name, serial = %state.switch_serial_no, "detached"),
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
            .delete_vrf(fabric, name)
            .await
            .map_err(|e| CoreError::from_delete_rejection(name, e))?;
        info!(fabric, vrf = name, "VRF deleted");
        Ok(())
    }

    pub async fn list(&self, fabric: &str) -> Result<Vec<VrfPayload>, CoreError> {
        self.api.list_vrfs(fabric).await
    }

    /// Diff only: what `sync` would do.
    pub async fn plan(&self, fabric: &str) -> Result<SyncPlan<String>, CoreError> {
        let desired = self.desired(fabric)?;
        let observed = self.api.list_vrfs(fabric).await?;
        Ok(plan(
            desired.into_iter().map(|p| p.vrf_name),
            observed.into_iter().map(|p| p.vrf_name),
        ))
    }

    /// Converge the fabric's VRFs on the YAML. Config errors abort before
    /// any call; controller errors are collected per VRF in the report.
    pub async fn sync(&self, fabric: &str) -> Result<SyncReport, CoreError> {
        let desired = self.desired(fabric)?;
        let observed = self.api.list_vrfs(fabric).await?;
        Ok(reconcile(self, desired, observed).await)
    }

    /// Attach every VRF the switch's routed interfaces reference.
    pub async fn attach(&self, fabric: &str, role: &str, switch: &str) -> Result<SyncReport, CoreError> {
        self.apply_derived(fabric, role, switch, true).await
    }

    /// Detach every VRF the switch's routed interfaces reference.
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
            return Ok(SyncReport::empty(EntityKind::VrfAttachment));
        }
        let record = self.loader.switch(fabric, role, switch)?;
        self.apply_to(&record, attach).await
    }

    /// Attach (or detach) the VRFs derived for an already-loaded switch.
    pub(crate) async fn apply_to(&self, record: &SwitchRecord, attach: bool) -> Result<SyncReport, CoreError> {
        let fabric = record.fabric.as_str();
        let mut report = SyncReport::empty(EntityKind::VrfAttachment);
        let relations = derive_vrf_attachments(record, &self.loader.vrfs(fabric)?);
        let phase = if attach { Phase::Create } else { Phase::Delete };
        for rel in &relations {
            let body = relation_body(fabric, rel, attach);
            let result = self.api.post_vrf_attachment(fabric, &body).await;
            report.record(rel.key(), phase, result);
        }
        Ok(report)
    }

    /// Diff the switch's derived VRF attachments against the controller:
    /// stale ones are detached, the rest (re)attached.
    pub async fn sync_attachments(
        &self,
        fabric: &str,
        role: &str,
        switch: &str,
    ) -> Result<SyncReport, CoreError> {
        if !attachments_apply(self.loader, fabric)? {
            return Ok(SyncReport::empty(EntityKind::VrfAttachment));
        }
        let record = self.loader.switch(fabric, role, switch)?;
        let desired = derive_vrf_attachments(&record, &self.loader.vrfs(fabric)?);

        let mut observed = Vec::new();
        for vrf in self.api.list_vrfs(fabric).await? {
            for state in self.api.vrf_attachments(fabric, &vrf.vrf_name).await? {
                if state.switch_serial_no == record.serial_number {
                    observed.push(AttachmentRelation::vrf(
                        &vrf.vrf_name,
                        &state.switch_serial_no,
                        state.vlan_id.unwrap_or_default(),
                    ));
                }
            }
        }

        let target = VrfAttachments {
            api: self.api,
            fabric,
        };
        Ok(reconcile(&target, desired, observed).await)
    }
}

fn relation_body(fabric: &str, rel: &AttachmentRelation, attach: bool) -> VrfAttachmentRequest {
    vrf_attach_request(fabric, &rel.entity, &rel.switch_serial, rel.vlan(), attach)
}

impl<C: SegmentApi> SyncTarget for VrfManager<'_, C> {
    type Desired = VrfPayload;
    type Observed = VrfPayload;
    type Key = String;

    fn kind(&self) -> EntityKind {
        EntityKind::Vrf
    }

    fn desired_key(&self, desired: &VrfPayload) -> String {
        desired.vrf_name.clone()
    }

    fn observed_key(&self, observed: &VrfPayload) -> String {
        observed.vrf_name.clone()
    }

    async fn delete(&self, observed: &VrfPayload) -> Result<(), CoreError> {
        VrfManager::delete(self, &observed.fabric, &observed.vrf_name).await
    }

    async fn update(&self, desired: &VrfPayload, _observed: &VrfPayload) -> Result<(), CoreError> {
        self.api.update_vrf(desired).await
    }

    async fn create(&self, desired: &VrfPayload) -> Result<(), CoreError> {
        self.api.create_vrf(desired).await
    }
}

/// Per-switch VRF attachments of one fabric.
struct VrfAttachments<'a, C> {
    api: &'a C,
    fabric: &'a str,
}

impl<C: SegmentApi> SyncTarget for VrfAttachments<'_, C> {
    type Desired = AttachmentRelation;
    type Observed = AttachmentRelation;
    type Key = String;

    fn kind(&self) -> EntityKind {
        EntityKind::VrfAttachment
    }

    fn desired_key(&self, desired: &AttachmentRelation) -> String {
        desired.key()
    }

    fn observed_key(&self, observed: &AttachmentRelation) -> String {
        observed.key()
    }

    async fn delete(&self, observed: &AttachmentRelation) -> Result<(), CoreError> {
        let body = relation_body(self.fabric, observed, false);
        self.api.post_vrf_attachment(self.fabric, &body).await
    }

    async fn update(&self, desired: &AttachmentRelation, _observed: &AttachmentRelation) -> Result<(), CoreError> {
        let body = relation_body(self.fabric, desired, true);
        self.api.post_vrf_attachment(self.fabric, &body).await
    }

    async fn create(&self, desired: &AttachmentRelation) -> Result<(), CoreError> {
        let body = relation_body(self.fabric, desired, true);
        self.api.post_vrf_attachment(self.fabric, &body).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::manager::fake::{FakeController, project};

    const VRFS: &str = "\
VRF:
  - Fabric: Site1
    VRF Name: bluevrf
    VRF ID: 50001
    VLAN ID: 2001
  - Fabric: Site1
    VRF Name: redvrf
    VRF ID: 50002
    VLAN ID: 2002
";

    #[tokio::test]
    async fn sync_deletes_then_updates_then_creates() {
        let dir = project(&[("network_configs/5_segment/vrf.yaml", VRFS)]);
        let loader = ConfigLoader::new(crate::loader::ProjectLayout::new(dir.path()));
        let api = FakeController::default();
        api.seed_vrf("Site1", "bluevrf");
        api.seed_vrf("Site1", "greenvrf");
        api.seed_vrf_attachment("greenvrf", "SAL1", "leafA", 2003);

        let report = VrfManager::new(&loader, &api).sync("Site1").await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.plan.to_delete, vec!["greenvrf".to_owned()]);
        assert_eq!(report.plan.to_update, vec!["bluevrf".to_owned()]);
        assert_eq!(report.plan.to_create, vec!["redvrf".to_owned()]);
        assert_eq!(
            api.calls(),
            vec![
                "list_vrfs Site1",
                "vrf_attachments greenvrf",
                "detach_vrf greenvrf SAL1",
                "delete_vrf greenvrf",
                "update_vrf bluevrf",
                "create_vrf redvrf",
            ]
        );
    }

    #[tokio::test]
    async fn second_sync_creates_and_deletes_nothing() {
        let dir = project(&[("network_configs/5_segment/vrf.yaml", VRFS)]);
        let loader = ConfigLoader::new(crate::loader::ProjectLayout::new(dir.path()));
        let api = FakeController::default();
        let manager = VrfManager::new(&loader, &api);

        manager.sync("Site1").await.unwrap();
        let plan = manager.plan("Site1").await.unwrap();

        assert!(plan.is_noop());
        assert_eq!(plan.to_update, vec!["bluevrf".to_owned(), "redvrf".to_owned()]);
    }

    #[tokio::test]
    async fn failed_detach_blocks_delete_and_names_switch() {
        let dir = project(&[("network_configs/5_segment/vrf.yaml", VRFS)]);
        let loader = ConfigLoader::new(crate::loader::ProjectLayout::new(dir.path()));
        let api = FakeController::default();
        api.seed_vrf("Site1", "greenvrf");
        api.seed_vrf_attachment("greenvrf", "SALA", "switchA", 2003);
        api.seed_vrf_attachment("greenvrf", "SALB", "switchB", 2003);
        api.fail_detach_on("SALB");

        let err = VrfManager::new(&loader, &api)
            .delete("Site1", "greenvrf")
            .await
            .unwrap_err();

        match &err {
            CoreError::DetachFailed { failures, .. } => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].switch, "switchB");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_retryable());
        assert!(api.calls().iter().all(|c| !c.starts_with("delete_vrf")));
        assert!(api.calls().contains(&"detach_vrf greenvrf SALA".to_owned()));
    }

    #[tokio::test]
    async fn controller_refusing_attached_delete_is_dependency_conflict() {
        let dir = project(&[("network_configs/5_segment/vrf.yaml", VRFS)]);
        let loader = ConfigLoader::new(crate::loader::ProjectLayout::new(dir.path()));
        let api = FakeController::default();
        api.seed_vrf("Site1", "bluevrf");
        api.reject_delete_as_attached();

        let err = VrfManager::new(&loader, &api)
            .delete("Site1", "bluevrf")
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::DependencyConflict { .. }));
    }

    const ROUTED_LEAF: &str = "\
Serial Number: SAL1
IP Address: 10.0.0.11/24
Interface:
  - Ethernet1/5:
      policy: int_routed_host
      Interface VRF: bluevrf
      Interface IP: 10.9.9.1
      IP Netmask Length: 30
";

    #[tokio::test]
    async fn sync_attachments_detaches_only_this_switch_stale_vrfs() {
        let dir = project(&[
            ("network_configs/1_vxlan_evpn/fabric/Site1.yaml", "General:\n  BGP ASN: 65001\n"),
            ("network_configs/5_segment/vrf.yaml", VRFS),
            ("network_configs/3_node/Site1/leaf/leaf1.yaml", ROUTED_LEAF),
        ]);
        let loader = ConfigLoader::new(crate::loader::ProjectLayout::new(dir.path()));
        let api = FakeController::default();
        api.seed_vrf("Site1", "bluevrf");
        api.seed_vrf("Site1", "greenvrf");
        api.seed_vrf("Site1", "redvrf");
        api.seed_vrf_attachment("bluevrf", "SAL1", "leaf1", 2001);
        api.seed_vrf_attachment("greenvrf", "SAL1", "leaf1", 2003);
        api.seed_vrf_attachment("redvrf", "SAL2", "leaf2", 2002);

        let report = VrfManager::new(&loader, &api)
            .sync_attachments("Site1", "leaf", "leaf1")
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.plan.to_delete, vec!["greenvrf@SAL1".to_owned()]);
        assert_eq!(report.plan.to_update, vec!["bluevrf@SAL1".to_owned()]);
        assert!(report.plan.to_create.is_empty());

        let calls = api.calls();
        let detaches: Vec<&String> = calls.iter().filter(|c| c.starts_with("detach_vrf")).collect();
        assert_eq!(detaches, vec!["detach_vrf greenvrf SAL1"]);
        assert!(calls.contains(&"attach_vrf bluevrf SAL1".to_owned()));
        assert!(calls.iter().all(|c| !c.ends_with("SAL2")));
    }
}
