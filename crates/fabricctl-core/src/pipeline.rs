// ── Build pipeline ──
//
// End-to-end bring-up of every declared fabric. Stages run in a fixed
// order and each one records per-identity outcomes; a failing entity
// never stops its siblings. Config errors still abort the whole run
// before the stage that hit them sends anything. The pipeline stops at
// `pending.txt`: deploying stays a separate, reviewed step.

use std::path::PathBuf;

use fabricctl_api::types::PendingSwitchConfig;
use secrecy::SecretString;
use serde::Serialize;
use strum::Display;
use tracing::{info, warn};

use crate::controller::Controller;
use crate::error::CoreError;
use crate::loader::ConfigLoader;
use crate::manager::{
    FabricManager, InterfaceManager, NetworkManager, PolicyManager, SwitchManager, VpcManager,
    VrfManager,
};
use crate::model::{EntityKind, FabricRecord, FabricType};
use crate::pending;
use crate::reconcile::{Phase, SyncReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum BuildStage {
    Fabrics,
    Switches,
    Recalculate,
    MsdChildren,
    Vrfs,
    VrfAttachments,
    Networks,
    NetworkAttachments,
    Interfaces,
    VpcPairs,
    Policies,
    FinalRecalculate,
    Pending,
}

#[derive(Debug)]
pub struct StageReport {
    pub stage: BuildStage,
    pub report: SyncReport,
}

#[derive(Debug)]
pub struct BuildSummary {
    pub stages: Vec<StageReport>,
    pub pending_path: PathBuf,
    pub pending_lines: usize,
}

impl BuildSummary {
    pub fn failed(&self) -> usize {
        self.stages.iter().map(|s| s.report.failed()).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Keep existing device config on discovery.
    pub preserve_config: bool,
}

pub struct BuildPipeline<'a, C> {
    loader: &'a ConfigLoader,
    api: &'a C,
    password: &'a SecretString,
    options: BuildOptions,
    stages: Vec<StageReport>,
}

impl<'a, C: Controller> BuildPipeline<'a, C> {
    pub fn new(
        loader: &'a ConfigLoader,
        api: &'a C,
        password: &'a SecretString,
        options: BuildOptions,
    ) -> Self {
        Self {
            loader,
            api,
            password,
            options,
            stages: Vec::new(),
        }
    }

    fn push(&mut self, stage: BuildStage, report: SyncReport) {
        info!(
            %stage,
            ok = report.succeeded(),
            failed = report.failed(),
            "build stage finished"
        );
        self.stages.push(StageReport { stage, report });
    }

    pub async fn run(mut self) -> Result<BuildSummary, CoreError> {
        let fabrics = self.loader.fabrics()?;
        let members: Vec<&FabricRecord> = fabrics
            .iter()
            .filter(|f| f.fabric_type != FabricType::MultiSiteDomain)
            .collect();
        let segmented: Vec<&FabricRecord> = members
            .iter()
            .copied()
            .filter(|f| f.fabric_type.carries_attachments())
            .collect();

        // 1. fabrics, then switches per member fabric
        self.create_fabrics(&fabrics).await?;
        let mut report = SyncReport::empty(EntityKind::Switch);
        for fabric in &members {
            report.absorb(
                SwitchManager::new(self.loader, self.api)
                    .create_all(&fabric.name, self.password, self.options.preserve_config)
                    .await?,
            );
        }
        self.push(BuildStage::Switches, report);

        // 2. recalculate, then MSD membership
        let report = self.recalculate(&members).await;
        self.push(BuildStage::Recalculate, report);
        let mut report = SyncReport::empty(EntityKind::Fabric);
        for msd in fabrics
            .iter()
            .filter(|f| f.fabric_type == FabricType::MultiSiteDomain)
        {
            report.absorb(
                FabricManager::new(self.loader, self.api)
                    .add_children(&msd.name)
                    .await?,
            );
        }
        self.push(BuildStage::MsdChildren, report);

        // 3. VRFs, 4. networks
        let vrfs = VrfManager::new(self.loader, self.api);
        let networks = NetworkManager::new(self.loader, self.api);
        let mut vrf_report = SyncReport::empty(EntityKind::Vrf);
        let mut vrf_attach = SyncReport::empty(EntityKind::VrfAttachment);
        for fabric in &segmented {
            vrf_report.absorb(vrfs.sync(&fabric.name).await?);
            for switch in self.loader.switches(&fabric.name)? {
                vrf_attach.absorb(vrfs.apply_to(&switch, true).await?);
            }
        }
        self.push(BuildStage::Vrfs, vrf_report);
        self.push(BuildStage::VrfAttachments, vrf_attach);

        let mut net_report = SyncReport::empty(EntityKind::Network);
        let mut net_attach = SyncReport::empty(EntityKind::NetworkAttachment);
        for fabric in &segmented {
            net_report.absorb(networks.sync(&fabric.name).await?);
            for switch in self.loader.switches(&fabric.name)? {
                net_attach.absorb(networks.apply_to(&switch, true).await?);
            }
        }
        self.push(BuildStage::Networks, net_report);
        self.push(BuildStage::NetworkAttachments, net_attach);

        // 5. interfaces, vPC pairs, switch freeform
        let mut if_report = SyncReport::empty(EntityKind::Interface);
        let mut vpc_report = SyncReport::empty(EntityKind::Vpc);
        let mut policy_report = SyncReport::empty(EntityKind::Policy);
        let interfaces = InterfaceManager::new(self.loader, self.api);
        let vpcs = VpcManager::new(self.loader, self.api);
        let policies = PolicyManager::new(self.loader, self.api);
        for fabric in &members {
            if_report.absorb(interfaces.update_all(&fabric.name).await?);
            vpc_report.absorb(vpcs.create_all(&fabric.name).await?);
            for switch in self.loader.switches(&fabric.name)? {
                if switch.freeform_config.is_none() {
                    continue;
                }
                let result = policies.create_for(&switch).await.map(|_| ());
                policy_report.record(&switch.name, Phase::Create, result);
            }
        }
        self.push(BuildStage::Interfaces, if_report);
        self.push(BuildStage::VpcPairs, vpc_report);
        self.push(BuildStage::Policies, policy_report);

        // 6. recalculate and leave the result for review
        let report = self.recalculate(&members).await;
        self.push(BuildStage::FinalRecalculate, report);
        let (pending_path, pending_lines) = self.write_pending(&members).await?;

        Ok(BuildSummary {
            stages: self.stages,
            pending_path,
            pending_lines,
        })
    }

    /// Every payload is built before the first create goes out.
    async fn create_fabrics(&mut self, fabrics: &[FabricRecord]) -> Result<(), CoreError> {
        let manager = FabricManager::new(self.loader, self.api);
        let payloads = fabrics
            .iter()
            .map(|f| manager.payload(&f.name))
            .collect::<Result<Vec<_>, _>>()?;
        let mut report = SyncReport::empty(EntityKind::Fabric);
        for payload in &payloads {
            let result = self.api.create_fabric(payload).await;
            report.record(&payload.name, Phase::Create, result);
        }
        self.push(BuildStage::Fabrics, report);
        Ok(())
    }

    async fn recalculate(&self, fabrics: &[&FabricRecord]) -> SyncReport {
        let mut report = SyncReport::empty(EntityKind::Fabric);
        for fabric in fabrics {
            let result = self.api.recalculate(&fabric.name).await;
            report.record(&fabric.name, Phase::Update, result);
        }
        report
    }

    /// One report for every member fabric. A fabric whose preview fails
    /// is missing from the file and counted as a failed pending stage.
    async fn write_pending(&mut self, fabrics: &[&FabricRecord]) -> Result<(PathBuf, usize), CoreError> {
        let mut all: Vec<PendingSwitchConfig> = Vec::new();
        let mut report = SyncReport::empty(EntityKind::Fabric);
        for fabric in fabrics {
            let result = match self.api.pending_config(&fabric.name).await {
                Ok(pending) => {
                    all.extend(pending);
                    Ok(())
                }
                Err(e) => {
                    warn!(fabric = %fabric.name, error = %e, "pending config missing from report");
                    Err(e)
                }
            };
            report.record(&fabric.name, Phase::Update, result);
        }
        let path = self.loader.layout().pending_report();
        pending::write(&path, &all)?;
        let lines = pending::line_count(&all);
        info!(path = %path.display(), lines, "pending config written, review before deploy");
        self.push(BuildStage::Pending, report);
        Ok((path, lines))
    }
}
