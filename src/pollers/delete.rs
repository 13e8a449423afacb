use async_trait::async_trait;

use super::{PollResult, PollerError, PollerType, PollingStatus};
use crate::client::{Client, ClientError};
use crate::context::Context;

/// Polls a resource until it returns `404`. Used when a delete or purge
/// completes without handing back anything to poll on.
#[derive(Debug, Clone)]
pub struct DeletePoller {
    client: Client,
    url: String,
}

impl DeletePoller {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }

    pub fn for_resource(client: Client, path: &str, api_version: &str) -> Result<Self, ClientError> {
        let url = client.resource_url(path, api_version)?;
        Ok(Self::new(client, url))
    }
}

#[async_trait]
impl PollerType for DeletePoller {
    async fn poll(&self, ctx: &Context) -> Result<PollResult, PollerError> {
        let response = self
            .client
            .get_url(ctx, &self.url)
            .await
            .map_err(PollerError::from_client)?;

        match response.status {
            404 => Ok(PollResult::from_response(PollingStatus::Succeeded, response)),
            200 | 202 => Ok(PollResult::from_response(PollingStatus::InProgress, response)),
            status => Err(PollerError::UnexpectedStatus {
                status,
                body: response.body,
            }),
        }
    }
}
