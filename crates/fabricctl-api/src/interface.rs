// Interface endpoints

use crate::client::NdfcClient;
use crate::error::Error;
use crate::types::{AdminStatusRequest, InterfaceGroup, InterfacePolicyRequest, InterfaceRef};

impl NdfcClient {
    /// `GET interface?serialNumber={serial}`, grouped by policy.
    pub async fn list_interfaces(&self, serial: &str) -> Result<Vec<InterfaceGroup>, Error> {
        self.get_with_params("interface", &[("serialNumber", serial.to_owned())])
            .await
    }

    /// `PUT interface`: update existing interfaces under one policy.
    pub async fn update_interfaces(&self, body: &InterfacePolicyRequest) -> Result<(), Error> {
        self.put_no_response("interface", body).await
    }

    /// `POST interface`: create logical interfaces (vPC, port-channel).
    pub async fn create_interfaces(&self, body: &InterfacePolicyRequest) -> Result<(), Error> {
        self.post_no_response("interface", body).await
    }

    /// `POST interface/adminstatus`
    pub async fn set_admin_status(&self, body: &AdminStatusRequest) -> Result<(), Error> {
        self.post_no_response("interface/adminstatus", body).await
    }

    /// `DELETE interface/markdelete`
    pub async fn mark_delete_interfaces(&self, body: &[InterfaceRef]) -> Result<(), Error> {
        self.delete_with_body("interface/markdelete", &body).await
    }
}
