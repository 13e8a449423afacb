use async_trait::async_trait;

use super::{PollResult, PollerError, PollerType, PollingStatus, provisioning_state};
use crate::client::Client;
use crate::context::Context;

/// Re-reads the resource until its `provisioningState` is terminal.
#[derive(Debug, Clone)]
pub struct ProvisioningStatePoller {
    client: Client,
    url: String,
}

impl ProvisioningStatePoller {
    /// `url` is the full resource URL, including `api-version`.
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl PollerType for ProvisioningStatePoller {
    async fn poll(&self, ctx: &Context) -> Result<PollResult, PollerError> {
        let response = self
            .client
            .get_url(ctx, &self.url)
            .await
            .map_err(PollerError::from_client)?;

        if response.status != 200 {
            return Err(PollerError::UnexpectedStatus {
                status: response.status,
                body: response.body,
            });
        }

        let status = response
            .value()
            .and_then(|body| provisioning_state(&body))
            .map(|state| PollingStatus::from_status_str(state.as_str()))
            .unwrap_or(PollingStatus::Succeeded);
        Ok(PollResult::from_response(status, response))
    }
}
