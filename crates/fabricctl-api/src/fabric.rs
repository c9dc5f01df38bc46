// Fabric endpoints
//
// Fabric create/update are template-scoped: the template name is the last
// path segment and the body is the flat nvPairs map.

use serde_json::Value;
use tracing::debug;

use crate::client::NdfcClient;
use crate::error::Error;
use crate::types::{FabricSummary, MsdMembership, PendingSwitchConfig};

impl NdfcClient {
    /// `GET control/fabrics`
    pub async fn list_fabrics(&self) -> Result<Vec<FabricSummary>, Error> {
        self.get("control/fabrics").await
    }

    /// `GET control/fabrics/{fabric}`
    pub async fn get_fabric(&self, fabric: &str) -> Result<FabricSummary, Error> {
        self.get(&format!("control/fabrics/{fabric}")).await
    }

    /// `POST control/fabrics/{fabric}/{template}` with the flat nvPairs body.
    pub async fn create_fabric(&self, fabric: &str, template: &str, body: &Value) -> Result<(), Error> {
        debug!(fabric, template, "creating fabric");
        self.post_no_response(&format!("control/fabrics/{fabric}/{template}"), body)
            .await
    }

    /// `PUT control/fabrics/{fabric}/{template}` with the flat nvPairs body.
    pub async fn update_fabric(&self, fabric: &str, template: &str, body: &Value) -> Result<(), Error> {
        debug!(fabric, template, "updating fabric");
        self.put_no_response(&format!("control/fabrics/{fabric}/{template}"), body)
            .await
    }

    /// `DELETE control/fabrics/{fabric}`
    pub async fn delete_fabric(&self, fabric: &str) -> Result<(), Error> {
        self.delete(&format!("control/fabrics/{fabric}")).await
    }

    /// `POST control/fabrics/{fabric}/config-save` (recalculate and save)
    pub async fn recalculate_fabric(&self, fabric: &str) -> Result<(), Error> {
        self.post_empty(&format!("control/fabrics/{fabric}/config-save"))
            .await
    }

    /// `POST control/fabrics/{fabric}/config-deploy?forceShowRun=false`
    pub async fn deploy_fabric(&self, fabric: &str) -> Result<(), Error> {
        self.post_empty(&format!(
            "control/fabrics/{fabric}/config-deploy?forceShowRun=false"
        ))
        .await
    }

    /// `GET control/fabrics/{fabric}/config-preview`
    pub async fn fabric_pending_config(&self, fabric: &str) -> Result<Vec<PendingSwitchConfig>, Error> {
        self.get(&format!("control/fabrics/{fabric}/config-preview"))
            .await
    }

    /// `POST control/fabrics/msdAdd` with `{destFabric, sourceFabric}`
    pub async fn msd_add(&self, msd: &str, child: &str) -> Result<(), Error> {
        let body = MsdMembership {
            dest_fabric: msd.to_owned(),
            source_fabric: child.to_owned(),
        };
        self.post_no_response("control/fabrics/msdAdd", &body).await
    }

    /// `POST control/fabrics/msdExit` with `{destFabric, sourceFabric}`
    pub async fn msd_exit(&self, msd: &str, child: &str) -> Result<(), Error> {
        let body = MsdMembership {
            dest_fabric: msd.to_owned(),
            source_fabric: child.to_owned(),
        };
        self.post_no_response("control/fabrics/msdExit", &body).await
    }
}
