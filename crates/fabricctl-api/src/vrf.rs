// VRF endpoints (top-down API)

use crate::client::NdfcClient;
use crate::error::Error;
use crate::types::{VrfAttachmentRequest, VrfAttachmentStatus, VrfPayload};

impl NdfcClient {
    /// `GET top-down/fabrics/{fabric}/vrfs`
    pub async fn list_vrfs(&self, fabric: &str) -> Result<Vec<VrfPayload>, Error> {
        self.get(&format!("top-down/fabrics/{fabric}/vrfs")).await
    }

    /// `POST top-down/fabrics/{fabric}/vrfs`
    pub async fn create_vrf(&self, payload: &VrfPayload) -> Result<(), Error> {
        self.post_no_response(&format!("top-down/fabrics/{}/vrfs", payload.fabric), payload)
            .await
    }

    /// `PUT top-down/fabrics/{fabric}/vrfs/{vrf}`
    pub async fn update_vrf(&self, payload: &VrfPayload) -> Result<(), Error> {
        self.put_no_response(
            &format!("top-down/fabrics/{}/vrfs/{}", payload.fabric, payload.vrf_name),
            payload,
        )
        .await
    }

    /// `DELETE top-down/fabrics/{fabric}/vrfs/{vrf}`
    pub async fn delete_vrf(&self, fabric: &str, vrf: &str) -> Result<(), Error> {
        self.delete(&format!("top-down/fabrics/{fabric}/vrfs/{vrf}"))
            .await
    }

    /// `GET top-down/fabrics/{fabric}/vrfs/attachments?vrf-names={vrf}`
    pub async fn vrf_attachments(&self, fabric: &str, vrf: &str) -> Result<Vec<VrfAttachmentStatus>, Error> {
        self.get_with_params(
            &format!("top-down/fabrics/{fabric}/vrfs/attachments"),
            &[("vrf-names", vrf.to_owned())],
        )
        .await
    }

    /// `POST top-down/fabrics/{fabric}/vrfs/attachments`
    ///
    /// Attach and detach share this call; `deployment: false` detaches.
    pub async fn post_vrf_attachments(&self, fabric: &str, body: &[VrfAttachmentRequest]) -> Result<(), Error> {
        self.post_no_response(&format!("top-down/fabrics/{fabric}/vrfs/attachments"), &body)
            .await
    }
}
