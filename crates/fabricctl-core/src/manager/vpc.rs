use tracing::info;

use crate::controller::{InterfaceApi, VpcApi};
use crate::error::CoreError;
use crate::loader::ConfigLoader;
use crate::model::{EntityKind, VpcPairRecord};
use crate::payload::{vpc_interface_ref, vpc_interface_request, vpc_pair_request};
use crate::reconcile::{Phase, SyncReport};

pub struct VpcManager<'a, C> {
    loader: &'a ConfigLoader,
    api: &'a C,
}

impl<'a, C: VpcApi + InterfaceApi> VpcManager<'a, C> {
    pub fn new(loader: &'a ConfigLoader, api: &'a C) -> Self {
        Self { loader, api }
    }

    /// Pair the peers, then create the vPC port-channel when declared.
    pub async fn create(&self, fabric: &str, stem: &str) -> Result<(), CoreError> {
        let record = self.loader.vpc_pair(fabric, stem)?;
        self.create_pair(&record).await
    }

    async fn create_pair(&self, record: &VpcPairRecord) -> Result<(), CoreError> {
        self.api.create_vpc_pair(&vpc_pair_request(record)).await?;
        if let Some(request) = vpc_interface_request(record) {
            self.api.create_interfaces(&request).await?;
        }
        info!(vpc = %record.name, peer1 = %record.peer1_serial, peer2 = %record.peer2_serial, "vPC pair created");
        Ok(())
    }

    pub async fn create_all(&self, fabric: &str) -> Result<SyncReport, CoreError> {
        let mut report = SyncReport::empty(EntityKind::Vpc);
        for record in self.loader.vpc_pairs(fabric)? {
            let result = self.create_pair(&record).await;
            report.record(&record.name, Phase::Create, result);
        }
        Ok(report)
    }

    /// Mark-delete the vPC interface, then unpair. Either peer's serial
    /// identifies the pair.
    pub async fn delete(&self, fabric: &str, stem: &str) -> Result<(), CoreError> {
        let record = self.loader.vpc_pair(fabric, stem)?;
        if record.policy.is_some() {
            self.api.mark_delete(&[vpc_interface_ref(&record)]).await?;
        }
        self.api.delete_vpc_pair(&record.peer1_serial).await?;
        info!(vpc = %record.name, "vPC pair deleted");
        Ok(())
    }

    /// Pairs declared under `3_node/{fabric}/vpc/`.
    pub fn list(&self, fabric: &str) -> Result<Vec<VpcPairRecord>, CoreError> {
        self.loader.vpc_pairs(fabric)
    }
}
