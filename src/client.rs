//! The Azure Resource Manager HTTP client.

mod error;
mod list;
mod resource_client;
mod response;

pub use error::ClientError;
pub use list::{Everything, GenericResourcePredicate, ListResult, Predicate};
pub use resource_client::ResourceClient;
pub use response::{HEADER_AZURE_ASYNC_OPERATION, HEADER_LOCATION, HEADER_RETRY_AFTER, Response};

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::context::Context;
use crate::pollers::{
    DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW, LongRunningPoller, Poller,
    ProvisioningStatePoller,
};

pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// A single request against the configured endpoint.
#[derive(Debug, Clone)]
pub struct RequestOptions<'a> {
    pub method: Method,
    pub path: &'a str,
    pub api_version: &'a str,
    pub body: Option<Value>,
    pub expected_status_codes: &'a [u16],
}

impl<'a> RequestOptions<'a> {
    pub fn new(method: Method, path: &'a str, api_version: &'a str) -> Self {
        Self {
            method,
            path,
            api_version,
            body: None,
            expected_status_codes: &[200],
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn expect_status_codes(mut self, status_codes: &'a [u16]) -> Self {
        self.expected_status_codes = status_codes;
        self
    }
}

#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    endpoint: String,
    poll_interval: Duration,
    dropped_connections_allowed: usize,
}

impl Client {
    pub fn new(token: String) -> Result<Self, ClientError> {
        Self::with_endpoint(token, DEFAULT_ENDPOINT.to_string())
    }

    /// NOTE: Also used for testing with mock servers.
    pub fn with_endpoint(token: String, endpoint: String) -> Result<Self, ClientError> {
        Self::create_client(token, endpoint)
    }

    fn create_client(token: String, endpoint: String) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", token);
        let header_value = HeaderValue::from_str(&auth_value).map_err(|_| ClientError::Auth {
            message: "Invalid token format".to_string(),
        })?;
        headers.insert(AUTHORIZATION, header_value);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("azurerm-rs/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            dropped_connections_allowed: DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_dropped_connections_allowed(mut self, count: usize) -> Self {
        self.dropped_connections_allowed = count;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn url_for(&self, path: &str, api_version: &str) -> Result<Url, ClientError> {
        let raw = format!("{}{}", self.endpoint, path);
        let mut url = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    /// The absolute URL of `path`, as accepted by [`Client::get_url`].
    pub fn resource_url(&self, path: &str, api_version: &str) -> Result<String, ClientError> {
        self.url_for(path, api_version).map(String::from)
    }

    /// Sends a request and checks the response status against the expected
    /// set. Unexpected statuses become [`ClientError::Api`].
    pub async fn send(
        &self,
        ctx: &Context,
        options: RequestOptions<'_>,
    ) -> Result<Response, ClientError> {
        let url = self.url_for(options.path, options.api_version)?;
        tracing::debug!(method = %options.method, url = %url, "sending request");

        let mut request = self.client.request(options.method.clone(), url);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = ctx.run(request.send()).await??;
        let response = Response::from_reqwest(options.method, response).await?;

        if !options.expected_status_codes.contains(&response.status) {
            return Err(response.into_error());
        }
        Ok(response)
    }

    /// GETs an absolute URL handed out by the API (polling URLs, next
    /// links). The status code is not checked.
    pub async fn get_url(&self, ctx: &Context, url: &str) -> Result<Response, ClientError> {
        let parsed = Url::parse(url).map_err(|e| ClientError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let response = ctx.run(self.client.get(parsed).send()).await??;
        Response::from_reqwest(Method::GET, response).await
    }

    /// Picks the poller matching a mutating response, or `None` when the
    /// response is already terminal.
    pub fn poller_for(&self, response: &Response) -> Option<Poller> {
        if matches!(response.status, 201 | 202) {
            let async_operation = response.header(HEADER_AZURE_ASYNC_OPERATION);
            let location = response.header(HEADER_LOCATION);
            if let Some(url) = async_operation.or(location) {
                let poller_type = LongRunningPoller::new(self.clone(), url.to_string());
                return Some(self.poller(poller_type, response.retry_after()));
            }
        }

        if matches!(response.method, Method::PUT | Method::PATCH)
            && matches!(response.status, 200 | 201)
        {
            let still_provisioning = response
                .value()
                .and_then(|body| crate::pollers::provisioning_state(&body))
                .is_some_and(|state| !state.is_terminal());
            if still_provisioning {
                let poller_type = ProvisioningStatePoller::new(self.clone(), response.url.clone());
                return Some(self.poller(poller_type, response.retry_after()));
            }
        }

        None
    }

    fn poller(
        &self,
        poller_type: impl crate::pollers::PollerType + 'static,
        initial_delay: Option<Duration>,
    ) -> Poller {
        Poller::new(
            poller_type,
            self.poll_interval,
            self.dropped_connections_allowed,
        )
        .with_initial_delay(initial_delay.unwrap_or(self.poll_interval))
    }

    /// Waits for the operation started by `response` to finish.
    pub async fn wait_for_completion(
        &self,
        ctx: &Context,
        response: &Response,
    ) -> Result<(), ClientError> {
        if let Some(poller) = self.poller_for(response) {
            poller.poll_until_done(ctx).await?;
        }
        Ok(())
    }

    pub async fn list_complete<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        path: &str,
        api_version: &str,
    ) -> Result<Vec<T>, ClientError> {
        self.list_complete_matching_predicate(ctx, path, api_version, Everything)
            .await
    }

    /// Follows `nextLink` until the last page, keeping the items the
    /// predicate accepts.
    pub async fn list_complete_matching_predicate<T, P>(
        &self,
        ctx: &Context,
        path: &str,
        api_version: &str,
        predicate: P,
    ) -> Result<Vec<T>, ClientError>
    where
        T: DeserializeOwned,
        P: Predicate<T>,
    {
        let mut all_results = Vec::new();
        let mut response = self
            .send(ctx, RequestOptions::new(Method::GET, path, api_version))
            .await?;

        loop {
            let page: ListResult<T> = response.model()?;
            let next_link = page.next().map(str::to_string);
            all_results.extend(page.value.into_iter().filter(|item| predicate.matches(item)));

            match next_link {
                Some(link) => {
                    tracing::debug!(next_link = %link, "fetching next page");
                    response = self.get_url(ctx, &link).await?;
                    if response.status != 200 {
                        return Err(response.into_error());
                    }
                }
                None => break,
            }
        }

        Ok(all_results)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
