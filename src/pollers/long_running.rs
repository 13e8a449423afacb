use async_trait::async_trait;

use super::{PollResult, PollerError, PollerType, PollingStatus, operation_status};
use crate::client::Client;
use crate::context::Context;

/// Follows the `Azure-AsyncOperation` or `Location` URL returned by the
/// initial request.
#[derive(Debug, Clone)]
pub struct LongRunningPoller {
    client: Client,
    url: String,
}

impl LongRunningPoller {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PollerType for LongRunningPoller {
    async fn poll(&self, ctx: &Context) -> Result<PollResult, PollerError> {
        let response = self
            .client
            .get_url(ctx, &self.url)
            .await
            .map_err(PollerError::from_client)?;

        match response.status {
            202 => Ok(PollResult::from_response(PollingStatus::InProgress, response)),
            // a Location poll without a body has finished
            200 | 201 | 204 => {
                let status = response
                    .value()
                    .and_then(|body| operation_status(&body))
                    .unwrap_or(PollingStatus::Succeeded);
                Ok(PollResult::from_response(status, response))
            }
            status => Err(PollerError::UnexpectedStatus {
                status,
                body: response.body,
            }),
        }
    }
}
