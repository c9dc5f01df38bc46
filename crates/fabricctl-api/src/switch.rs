// Switch inventory endpoints

use tracing::debug;

use crate::client::NdfcClient;
use crate::error::Error;
use crate::types::{DiscoveryIpChange, DiscoveryRequest, SwitchInventory, SwitchRoleAssignment};

impl NdfcClient {
    /// `GET control/fabrics/{fabric}/inventory/switchesByFabric`
    pub async fn list_switches(&self, fabric: &str) -> Result<Vec<SwitchInventory>, Error> {
        self.get(&format!("control/fabrics/{fabric}/inventory/switchesByFabric"))
            .await
    }

    /// `POST control/fabrics/{fabric}/inventory/discover`
    pub async fn discover_switches(&self, fabric: &str, body: &DiscoveryRequest) -> Result<(), Error> {
        debug!(fabric, seed = %body.seed_ip, "discovering switch");
        self.post_no_response(&format!("control/fabrics/{fabric}/inventory/discover"), body)
            .await
    }

    /// `DELETE control/fabrics/{fabric}/switches/{serial}`
    pub async fn delete_switch(&self, fabric: &str, serial: &str) -> Result<(), Error> {
        self.delete(&format!("control/fabrics/{fabric}/switches/{serial}"))
            .await
    }

    /// `POST control/switches/roles`
    pub async fn set_switch_roles(&self, body: &[SwitchRoleAssignment]) -> Result<(), Error> {
        self.post_no_response("control/switches/roles", &body).await
    }

    /// `PUT control/fabrics/{fabric}/inventory/discoveryIP`
    pub async fn change_discovery_ip(&self, fabric: &str, body: &DiscoveryIpChange) -> Result<(), Error> {
        self.put_no_response(&format!("control/fabrics/{fabric}/inventory/discoveryIP"), body)
            .await
    }

    /// `POST control/fabrics/{fabric}/inventory/rediscover/{serial}`
    pub async fn rediscover_switch(&self, fabric: &str, serial: &str) -> Result<(), Error> {
        self.post_empty(&format!(
            "control/fabrics/{fabric}/inventory/rediscover/{serial}"
        ))
        .await
    }

    /// `POST control/fabrics/{fabric}/config-deploy/{serial}`
    pub async fn deploy_switch(&self, fabric: &str, serial: &str) -> Result<(), Error> {
        self.post_empty(&format!(
            "control/fabrics/{fabric}/config-deploy/{serial}?forceShowRun=false"
        ))
        .await
    }
}
