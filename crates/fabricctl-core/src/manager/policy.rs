use tracing::{debug, info, warn};

use crate::controller::PolicyApi;
use crate::error::CoreError;
use crate::loader::ConfigLoader;
use crate::model::SwitchRecord;
use crate::payload::{FREEFORM_TEMPLATE, random_policy_number, switch_freeform_policy};

/// Attempts at finding an unused random policy id.
const MAX_ID_ATTEMPTS: usize = 10;

pub struct PolicyManager<'a, C> {
    loader: &'a ConfigLoader,
    api: &'a C,
}

impl<'a, C: PolicyApi> PolicyManager<'a, C> {
    pub fn new(loader: &'a ConfigLoader, api: &'a C) -> Self {
        Self { loader, api }
    }

    /// Replace the switch's freeform policy with the CLI from its
    /// `Switch Freeform Config` file. Returns the new policy id.
    pub async fn create(&self, fabric: &str, role: &str, name: &str) -> Result<String, CoreError> {
        let record = self.loader.switch(fabric, role, name)?;
        self.create_for(&record).await
    }

    pub(crate) async fn create_for(&self, record: &SwitchRecord) -> Result<String, CoreError> {
        let entity = format!("switch {}", record.name);
        let file = record
            .freeform_config
            .as_deref()
            .ok_or_else(|| CoreError::missing_field(&entity, "Switch Freeform Config"))?;
        let path = ConfigLoader::resolve(&record.dir, file);
        let conf = self
            .loader
            .read_freeform(&path)?
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CoreError::ConfigValidation {
                entity: entity.clone(),
                field: "Switch Freeform Config".into(),
                reason: format!("{} is missing or empty", path.display()),
            })?;

        self.remove_existing(record).await?;

        let mut last_err = None;
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let policy = switch_freeform_policy(record, &conf, random_policy_number());
            match self.api.create_policy(&policy).await {
                Ok(()) => {
                    info!(switch = %record.name, policy = %policy.policy_id, "freeform policy created");
                    return Ok(policy.policy_id);
                }
                Err(CoreError::ControllerApi { status, body }) if (400..500).contains(&status) => {
                    debug!(attempt, policy = %policy.policy_id, status, "policy id rejected, retrying");
                    last_err = Some(CoreError::ControllerApi { status, body });
                }
                Err(e) => return Err(e),
            }
        }
        warn!(switch = %record.name, "no free policy id after {MAX_ID_ATTEMPTS} attempts");
        Err(last_err.unwrap_or_else(|| CoreError::PayloadBuild {
            field: "policyId".into(),
            reason: "no free policy id".into(),
        }))
    }

    /// Delete every live freeform policy on the switch.
    pub async fn delete(&self, fabric: &str, role: &str, name: &str) -> Result<usize, CoreError> {
        let record = self.loader.switch(fabric, role, name)?;
        self.remove_existing(&record).await
    }

    async fn remove_existing(&self, record: &SwitchRecord) -> Result<usize, CoreError> {
        let existing: Vec<_> = self
            .api
            .switch_policies(&record.serial_number)
            .await?
            .into_iter()
            .filter(|p| p.template_name == FREEFORM_TEMPLATE && !p.deleted)
            .collect();
        for policy in &existing {
            self.api.delete_policy(&policy.policy_id).await?;
            debug!(switch = %record.name, policy = %policy.policy_id, "removed freeform policy");
        }
        Ok(existing.len())
    }
}
