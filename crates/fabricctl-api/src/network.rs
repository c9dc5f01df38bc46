// Network endpoints (top-down API)

use crate::client::NdfcClient;
use crate::error::Error;
use crate::types::{NetworkAttachRequest, NetworkAttachmentStatus, NetworkPayload};

impl NdfcClient {
    /// `GET top-down/fabrics/{fabric}/networks`
    pub async fn list_networks(&self, fabric: &str) -> Result<Vec<NetworkPayload>, Error> {
        self.get(&format!("top-down/fabrics/{fabric}/networks")).await
    }

    /// `POST top-down/fabrics/{fabric}/networks`
    pub async fn create_network(&self, payload: &NetworkPayload) -> Result<(), Error> {
        self.post_no_response(
            &format!("top-down/fabrics/{}/networks", payload.fabric),
            payload,
        )
        .await
    }

    /// `PUT top-down/fabrics/{fabric}/networks/{network}`
    pub async fn update_network(&self, payload: &NetworkPayload) -> Result<(), Error> {
        self.put_no_response(
            &format!(
                "top-down/fabrics/{}/networks/{}",
                payload.fabric, payload.network_name
            ),
            payload,
        )
        .await
    }

    /// `DELETE top-down/fabrics/{fabric}/networks/{network}`
    pub async fn delete_network(&self, fabric: &str, network: &str) -> Result<(), Error> {
        self.delete(&format!("top-down/fabrics/{fabric}/networks/{network}"))
            .await
    }

    /// `GET top-down/fabrics/{fabric}/networks/{network}/attachments`
    pub async fn network_attachments(
        &self,
        fabric: &str,
        network: &str,
    ) -> Result<Vec<NetworkAttachmentStatus>, Error> {
        self.get(&format!(
            "top-down/fabrics/{fabric}/networks/{network}/attachments"
        ))
        .await
    }

    /// `POST top-down/fabrics/{fabric}/networks/{network}/attachments`
    ///
    /// `switchPorts` attaches, `detachSwitchPorts` with `deployment: false` detaches.
    pub async fn post_network_attachment(&self, body: &NetworkAttachRequest) -> Result<(), Error> {
        self.post_no_response(
            &format!(
                "top-down/fabrics/{}/networks/{}/attachments",
                body.fabric, body.network_name
            ),
            body,
        )
        .await
    }
}
