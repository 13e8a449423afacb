use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::ClientError;

pub const HEADER_AZURE_ASYNC_OPERATION: &str = "Azure-AsyncOperation";
pub const HEADER_LOCATION: &str = "Location";
pub const HEADER_RETRY_AFTER: &str = "Retry-After";

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Response {
    pub(crate) async fn from_reqwest(
        method: Method,
        response: reqwest::Response,
    ) -> Result<Self, ClientError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(Self {
            status,
            method,
            url,
            headers,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn was_status_code(&self, status: u16) -> bool {
        self.status == status
    }

    pub fn was_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// `Retry-After` expressed in seconds. HTTP-date values are ignored.
    pub fn retry_after(&self) -> Option<Duration> {
        self.header(HEADER_RETRY_AFTER)
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// The body as JSON, or `None` when it is empty or not JSON.
    pub fn value(&self) -> Option<serde_json::Value> {
        if self.body.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&self.body).ok()
    }

    pub fn model<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_str(&self.body).map_err(|e| ClientError::Decode {
            url: self.url.clone(),
            message: e.to_string(),
        })
    }

    /// Turns a response with an unexpected status into [`ClientError::Api`],
    /// keeping Azure's error code and message.
    pub fn into_error(self) -> ClientError {
        let (code, message) = match serde_json::from_str::<ErrorResponse>(&self.body) {
            Ok(parsed) => {
                let detail = parsed.error.unwrap_or(ErrorDetail {
                    code: parsed.code,
                    message: parsed.message,
                });
                (
                    detail.code.unwrap_or_else(|| "Unknown".to_string()),
                    detail.message.unwrap_or_else(|| self.body.clone()),
                )
            }
            Err(_) => ("Unknown".to_string(), self.body.clone()),
        };

        ClientError::Api {
            status: self.status,
            code,
            message,
            response: Box::new(self),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}
