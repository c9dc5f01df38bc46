use fabricctl_api::types::{DiscoveryIpChange, SwitchInventory};
use secrecy::SecretString;
use serde_json::Value;
use tracing::info;

use crate::controller::{PolicyApi, SwitchApi};
use crate::error::CoreError;
use crate::loader::ConfigLoader;
use crate::model::{EntityKind, SwitchRecord};
use crate::payload::{HOSTNAME_TEMPLATE, discovery_request, role_assignments};
use crate::reconcile::{Phase, SyncReport};

pub struct SwitchManager<'a, C> {
    loader: &'a ConfigLoader,
    api: &'a C,
}

impl<'a, C: SwitchApi + PolicyApi> SwitchManager<'a, C> {
    pub fn new(loader: &'a ConfigLoader, api: &'a C) -> Self {
        Self { loader, api }
    }

    /// Discover the switch into its fabric, then assign its role.
    pub async fn create(
        &self,
        fabric: &str,
        role: &str,
        name: &str,
        password: &SecretString,
        preserve_config: bool,
    ) -> Result<(), CoreError> {
        let record = self.loader.switch(fabric, role, name)?;
        let body = discovery_request(&record, password, preserve_config)?;
        self.api.discover(fabric, &body).await?;
        self.api.set_roles(&role_assignments(&[&record])).await?;
        info!(fabric, switch = name, serial = %record.serial_number, "switch discovered");
        Ok(())
    }

    /// Discover every switch declared for the fabric, then assign all
    /// roles in one call.
    pub async fn create_all(
        &self,
        fabric: &str,
        password: &SecretString,
        preserve_config: bool,
    ) -> Result<SyncReport, CoreError> {
        let records = self.loader.switches(fabric)?;
        let mut report = SyncReport::empty(EntityKind::Switch);
        let mut discovered: Vec<&SwitchRecord> = Vec::new();
        for record in &records {
            let body = discovery_request(record, password, preserve_config)?;
            let result = self.api.discover(fabric, &body).await;
            if result.is_ok() {
                discovered.push(record);
            }
            report.record(&record.name, Phase::Create, result);
        }
        if !discovered.is_empty() {
            let result = self.api.set_roles(&role_assignments(&discovered)).await;
            report.record(format!("{fabric} roles"), Phase::Update, result);
        }
        Ok(report)
    }

    pub async fn delete(&self, fabric: &str, role: &str, name: &str) -> Result<(), CoreError> {
        let record = self.loader.switch(fabric, role, name)?;
        self.api.delete_switch(fabric, &record.serial_number).await?;
        info!(fabric, switch = name, "switch removed");
        Ok(())
    }

    pub async fn list(&self, fabric: &str) -> Result<Vec<SwitchInventory>, CoreError> {
        self.api.list_switches(fabric).await
    }

    pub async fn set_role(&self, fabric: &str, role: &str, name: &str) -> Result<(), CoreError> {
        let record = self.loader.switch(fabric, role, name)?;
        self.api.set_roles(&role_assignments(&[&record])).await?;
        info!(switch = name, role = record.role.as_wire(), "role assigned");
        Ok(())
    }

    /// Rename the switch by rewriting `SWITCH_NAME` on its live
    /// `host_11_1` policy.
    pub async fn set_hostname(
        &self,
        fabric: &str,
        role: &str,
        name: &str,
        hostname: &str,
    ) -> Result<(), CoreError> {
        let record = self.loader.switch(fabric, role, name)?;
        let mut policy = self
            .api
            .switch_policies(&record.serial_number)
            .await?
            .into_iter()
            .find(|p| p.template_name == HOSTNAME_TEMPLATE && !p.deleted)
            .ok_or_else(|| CoreError::ConfigNotFound {
                kind: "policy".into(),
                key: format!("{HOSTNAME_TEMPLATE} on {name}"),
                path: None,
            })?;
        policy
            .nv_pairs
            .insert("SWITCH_NAME".into(), Value::String(hostname.to_owned()));
        self.api.update_policy(&policy).await?;
        info!(switch = name, hostname, policy = %policy.policy_id, "hostname updated");
        Ok(())
    }

    /// Point the controller at a new management address and rediscover.
    /// Re-addressing the device itself happens out of band.
    pub async fn change_ip(
        &self,
        fabric: &str,
        role: &str,
        name: &str,
        new_ip: &str,
    ) -> Result<(), CoreError> {
        let record = self.loader.switch(fabric, role, name)?;
        let address = new_ip.split('/').next().unwrap_or(new_ip).trim();
        if address.is_empty() {
            return Err(CoreError::ConfigValidation {
                entity: format!("switch {name}"),
                field: "IP Address".into(),
                reason: "must not be empty".into(),
            });
        }
        let body = DiscoveryIpChange {
            serial_number: record.serial_number.clone(),
            ip_address: address.to_owned(),
        };
        self.api.change_discovery_ip(fabric, &body).await?;
        self.api.rediscover(fabric, &record.serial_number).await?;
        info!(switch = name, address, "discovery address changed");
        Ok(())
    }

    pub async fn rediscover(&self, fabric: &str, role: &str, name: &str) -> Result<(), CoreError> {
        let record = self.loader.switch(fabric, role, name)?;
        self.api.rediscover(fabric, &record.serial_number).await
    }

    /// Deploy pending config to this switch only.
    pub async fn deploy(&self, fabric: &str, role: &str, name: &str) -> Result<(), CoreError> {
        let record = self.loader.switch(fabric, role, name)?;
        self.api.deploy_switch(fabric, &record.serial_number).await?;
        info!(switch = name, "switch deployed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fabricctl_api::types::PolicyRecord;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::loader::ProjectLayout;
    use crate::manager::fake::{FakeController, project};

    const LEAF: &str = "\
Serial Number: SAL1
IP Address: 10.0.0.11/24
Platform: N9K-C93180YC-EX
";

    const SPINE: &str = "\
Serial Number: SAL9
IP Address: 10.0.0.21/24
Role: Border Gateway Spine
";

    fn fixture() -> tempfile::TempDir {
        project(&[
            ("network_configs/3_node/Site1/leaf/leaf1.yaml", LEAF),
            ("network_configs/3_node/Site1/spine/spine1.yaml", SPINE),
        ])
    }

    #[tokio::test]
    async fn create_discovers_then_assigns_role() {
        let dir = fixture();
        let loader = ConfigLoader::new(ProjectLayout::new(dir.path()));
        let api = FakeController::default();

        SwitchManager::new(&loader, &api)
            .create("Site1", "leaf", "leaf1", &SecretString::from("pw".to_owned()), false)
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec!["discover Site1 10.0.0.11", "set_roles SAL1=leaf"]
        );
    }

    #[tokio::test]
    async fn create_all_assigns_roles_once() {
        let dir = fixture();
        let loader = ConfigLoader::new(ProjectLayout::new(dir.path()));
        let api = FakeController::default();

        let report = SwitchManager::new(&loader, &api)
            .create_all("Site1", &SecretString::from("pw".to_owned()), true)
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(
            api.calls(),
            vec![
                "discover Site1 10.0.0.11",
                "discover Site1 10.0.0.21",
                "set_roles SAL1=leaf,SAL9=border gateway spine",
            ]
        );
    }

    #[tokio::test]
    async fn hostname_rewrites_live_host_policy() {
        let dir = fixture();
        let loader = ConfigLoader::new(ProjectLayout::new(dir.path()));
        let api = FakeController::default();
        api.seed_policy(PolicyRecord {
            policy_id: "POLICY-4410".into(),
            serial_number: "SAL1".into(),
            template_name: HOSTNAME_TEMPLATE.into(),
            nv_pairs: IndexMap::from([("SWITCH_NAME".to_owned(), Value::from("leaf1"))]),
            ..PolicyRecord::default()
        });

        SwitchManager::new(&loader, &api)
            .set_hostname("Site1", "leaf", "leaf1", "site1-leaf1")
            .await
            .unwrap();

        let policy = &api.policies()[0];
        assert_eq!(policy.nv_pairs["SWITCH_NAME"], Value::from("site1-leaf1"));
        assert_eq!(api.calls().last().map(String::as_str), Some("update_policy POLICY-4410"));
    }

    #[tokio::test]
    async fn hostname_without_host_policy_is_not_found() {
        let dir = fixture();
        let loader = ConfigLoader::new(ProjectLayout::new(dir.path()));
        let api = FakeController::default();

        let err = SwitchManager::new(&loader, &api)
            .set_hostname("Site1", "leaf", "leaf1", "x")
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ConfigNotFound { .. }));
    }

    #[tokio::test]
    async fn change_ip_strips_prefix_and_rediscovers() {
        let dir = fixture();
        let loader = ConfigLoader::new(ProjectLayout::new(dir.path()));
        let api = FakeController::default();

        SwitchManager::new(&loader, &api)
            .change_ip("Site1", "leaf", "leaf1", "10.0.1.11/24")
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec!["change_ip Site1 SAL1 10.0.1.11", "rediscover Site1 SAL1"]
        );
    }
}
