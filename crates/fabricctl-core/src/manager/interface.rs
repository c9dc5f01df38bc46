use fabricctl_api::types::InterfaceGroup;
use serde::Serialize;
use tracing::info;

use crate::controller::InterfaceApi;
use crate::error::CoreError;
use crate::loader::ConfigLoader;
use crate::model::{EntityKind, SwitchRecord};
use crate::payload::{admin_status_requests, default_closed_interfaces, interface_requests, shut_request};
use crate::reconcile::{Phase, SyncReport};

/// What one interface update pushed to a switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceUpdate {
    pub policy_requests: usize,
    pub admin_requests: usize,
    /// Undeclared Ethernet ports shut by default-closed.
    pub closed: Vec<String>,
}

pub struct InterfaceManager<'a, C> {
    loader: &'a ConfigLoader,
    api: &'a C,
}

impl<'a, C: InterfaceApi> InterfaceManager<'a, C> {
    pub fn new(loader: &'a ConfigLoader, api: &'a C) -> Self {
        Self { loader, api }
    }

    pub async fn update(&self, fabric: &str, role: &str, switch: &str) -> Result<InterfaceUpdate, CoreError> {
        let record = self.loader.switch(fabric, role, switch)?;
        self.update_switch(&record).await
    }

    /// Policies first, then admin state of policy-less ports, then
    /// default-closed against the controller's current interface list.
    pub(crate) async fn update_switch(&self, record: &SwitchRecord) -> Result<InterfaceUpdate, CoreError> {
        let mut summary = InterfaceUpdate::default();
        for request in interface_requests(record)? {
            self.api.update_interfaces(&request).await?;
            summary.policy_requests += 1;
        }
        for request in admin_status_requests(record) {
            self.api.set_admin_status(&request).await?;
            summary.admin_requests += 1;
        }

        let observed = self.api.list_interfaces(&record.serial_number).await?;
        let closed = default_closed_interfaces(record, &observed);
        summary.closed = closed.iter().map(|i| i.if_name.clone()).collect();
        if let Some(request) = shut_request(closed) {
            self.api.set_admin_status(&request).await?;
        }

        info!(
            switch = %record.name,
            policies = summary.policy_requests,
            closed = summary.closed.len(),
            "interfaces updated"
        );
        Ok(summary)
    }

    /// Every switch of the fabric; one failing switch does not stop the rest.
    pub async fn update_all(&self, fabric: &str) -> Result<SyncReport, CoreError> {
        let mut report = SyncReport::empty(EntityKind::Interface);
        for record in self.loader.switches(fabric)? {
            let result = self.update_switch(&record).await.map(|_| ());
            report.record(&record.name, Phase::Update, result);
        }
        Ok(report)
    }

    pub async fn list(&self, serial: &str) -> Result<Vec<InterfaceGroup>, CoreError> {
        self.api.list_interfaces(serial).await
    }
}
