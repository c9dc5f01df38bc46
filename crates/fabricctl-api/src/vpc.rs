// vPC pair endpoints

use crate::client::NdfcClient;
use crate::error::Error;
use crate::types::VpcPairRequest;

impl NdfcClient {
    /// `POST vpcpair`
    pub async fn create_vpc_pair(&self, body: &VpcPairRequest) -> Result<(), Error> {
        self.post_no_response("vpcpair", body).await
    }

    /// `DELETE vpcpair?serialNumber={serial}`, either peer's serial works.
    pub async fn delete_vpc_pair(&self, serial: &str) -> Result<(), Error> {
        self.delete_with_params("vpcpair", &[("serialNumber", serial.to_owned())])
            .await
    }
}
