// Policy endpoints

use crate::client::NdfcClient;
use crate::error::Error;
use crate::types::PolicyRecord;

impl NdfcClient {
    /// `GET control/policies/switches/{serial}`
    pub async fn switch_policies(&self, serial: &str) -> Result<Vec<PolicyRecord>, Error> {
        self.get(&format!("control/policies/switches/{serial}")).await
    }

    /// `POST control/policies`
    pub async fn create_policy(&self, policy: &PolicyRecord) -> Result<(), Error> {
        self.post_no_response("control/policies", policy).await
    }

    /// `PUT control/policies/{policyId}`
    pub async fn update_policy(&self, policy: &PolicyRecord) -> Result<(), Error> {
        self.put_no_response(&format!("control/policies/{}", policy.policy_id), policy)
            .await
    }

    /// `DELETE control/policies/{policyId}`
    pub async fn delete_policy(&self, policy_id: &str) -> Result<(), Error> {
        self.delete(&format!("control/policies/{policy_id}")).await
    }
}
