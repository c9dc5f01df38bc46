use std::path::PathBuf;

use fabricctl_api::types::{FabricSummary, PendingSwitchConfig};
use serde::Serialize;
use strum::Display;
use tracing::{info, warn};

use crate::controller::FabricApi;
use crate::error::CoreError;
use crate::loader::ConfigLoader;
use crate::model::{EntityKind, FabricType};
use crate::payload::{FabricPayload, fabric_payload};
use crate::pending;
use crate::reconcile::{Phase, SyncReport};

/// Where a fabric sits in its lifecycle. Every transition is an explicit
/// call; nothing advances on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum FabricStage {
    Absent,
    Created,
    ConfigRecalculated,
    PendingReviewed,
    Deployed,
}

/// Build a fabric's create/update body from YAML and reference tables.
/// Needs no controller.
pub fn build_payload(loader: &ConfigLoader, name: &str) -> Result<FabricPayload, CoreError> {
    let record = loader.fabric(name)?;
    let tables = loader.tables(record.fabric_type.table_name())?;
    fabric_payload(&record, &tables)
}

pub struct FabricManager<'a, C> {
    loader: &'a ConfigLoader,
    api: &'a C,
}

impl<'a, C: FabricApi> FabricManager<'a, C> {
    pub fn new(loader: &'a ConfigLoader, api: &'a C) -> Self {
        Self { loader, api }
    }

    pub fn payload(&self, name: &str) -> Result<FabricPayload, CoreError> {
        build_payload(self.loader, name)
    }

    pub async fn create(&self, name: &str) -> Result<FabricStage, CoreError> {
        let payload = self.payload(name)?;
        self.api.create_fabric(&payload).await?;
        info!(fabric = name, template = payload.template, "fabric created");
        Ok(FabricStage::Created)
    }

    pub async fn update(&self, name: &str) -> Result<(), CoreError> {
        let payload = self.payload(name)?;
        self.api.update_fabric(&payload).await?;
        info!(fabric = name, "fabric updated");
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<FabricStage, CoreError> {
        self.api.delete_fabric(name).await?;
        info!(fabric = name, "fabric deleted");
        Ok(FabricStage::Absent)
    }

    pub async fn list(&self) -> Result<Vec<FabricSummary>, CoreError> {
        self.api.list_fabrics().await
    }

    pub async fn recalculate(&self, name: &str) -> Result<FabricStage, CoreError> {
        self.api.recalculate(name).await?;
        info!(fabric = name, "config recalculated");
        Ok(FabricStage::ConfigRecalculated)
    }

    /// Read-only; never changes the stage.
    pub async fn pending(&self, name: &str) -> Result<Vec<PendingSwitchConfig>, CoreError> {
        self.api.pending_config(name).await
    }

    /// Fetch pending config and write it to `pending.txt` under the
    /// project root. Returns the path and the pending line count.
    pub async fn write_pending(&self, name: &str) -> Result<(PathBuf, usize), CoreError> {
        let pending = self.pending(name).await?;
        let path = self.loader.layout().pending_report();
        pending::write(&path, &pending)?;
        let lines = pending::line_count(&pending);
        info!(fabric = name, path = %path.display(), lines, "pending config written");
        Ok((path, lines))
    }

    pub async fn deploy(&self, name: &str) -> Result<FabricStage, CoreError> {
        self.api.deploy(name).await?;
        info!(fabric = name, "fabric deployed");
        Ok(FabricStage::Deployed)
    }

    pub async fn msd_add(&self, msd: &str, child: &str) -> Result<(), CoreError> {
        self.api.msd_add(msd, child).await?;
        info!(msd, child, "child fabric added");
        Ok(())
    }

    pub async fn msd_remove(&self, msd: &str, child: &str) -> Result<(), CoreError> {
        self.api.msd_remove(msd, child).await?;
        info!(msd, child, "child fabric removed");
        Ok(())
    }

    /// Add the MSD's declared children. Without a `Child Fabrics` list,
    /// every VXLAN fabric and ISN in the project joins.
    pub async fn add_children(&self, msd: &str) -> Result<SyncReport, CoreError> {
        let record = self.loader.fabric(msd)?;
        if record.fabric_type != FabricType::MultiSiteDomain {
            return Err(CoreError::ConfigValidation {
                entity: format!("fabric {msd}"),
                field: "Child Fabrics".into(),
                reason: format!("only applies to a multi-site domain, not {}", record.fabric_type),
            });
        }
        let children: Vec<String> = if record.child_fabrics.is_empty() {
            let mut all = self.loader.fabric_names(FabricType::VxlanEvpn)?;
            all.extend(self.loader.fabric_names(FabricType::InterSiteNetwork)?);
            all
        } else {
            record.child_fabrics.into_iter().collect()
        };

        let mut report = SyncReport::empty(EntityKind::Fabric);
        for child in children {
            let result = self.api.msd_add(msd, &child).await;
            report.record(format!("{msd}/{child}"), Phase::Create, result);
        }
        Ok(report)
    }

    /// Recalculate, write `pending.txt`, ask `confirm` with the report
    /// path and line count, and deploy only on approval.
    pub async fn deploy_workflow<F>(&self, name: &str, confirm: F) -> Result<FabricStage, CoreError>
    where
        F: FnOnce(&std::path::Path, usize) -> bool,
    {
        self.recalculate(name).await?;
        let (path, lines) = self.write_pending(name).await?;
        if !confirm(&path, lines) {
            warn!(fabric = name, "deploy declined after review");
            return Ok(FabricStage::PendingReviewed);
        }
        self.deploy(name).await
    }
}
