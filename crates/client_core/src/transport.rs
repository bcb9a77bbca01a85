//! Outbound HTTP: base URL + fixed path segments, with non-2xx
//! responses normalized into a single message-carrying error type.

use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    error::{status_fallback_message, ErrorBody},
    protocol::API_PREFIX,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Non-2xx response. `message` comes from the conventional
    /// `{"error": ...}` body when one parses, else from the status.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// No response received at all (DNS, refused connection, ...).
    #[error("{message}")]
    Network { message: String },
    #[error("invalid server URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// 2xx response whose body did not match the declared shape.
    #[error("unexpected response body: {reason}")]
    Decode { reason: String },
}

/// One client per base URL. Each call is a single attempt: no
/// retries, no timeout configuration, no caching.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let raw = base_url.into();
        let parsed = Url::parse(raw.trim()).map_err(|err| TransportError::InvalidBaseUrl {
            url: raw.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::InvalidBaseUrl {
                url: raw,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self {
            http: Client::new(),
            base_url: raw.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in API_PREFIX.iter().chain(segments) {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, TransportError> {
        let response = self.dispatch(self.http.get(self.endpoint(segments))).await?;
        decode_json(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, TransportError> {
        let request = self.http.post(self.endpoint(segments)).json(body);
        let response = self.dispatch(request).await?;
        decode_json(response).await
    }

    pub async fn get_text(&self, segments: &[&str]) -> Result<String, TransportError> {
        let response = self.dispatch(self.http.get(self.endpoint(segments))).await?;
        response
            .text()
            .await
            .map_err(|err| TransportError::Decode {
                reason: err.to_string(),
            })
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|err| TransportError::Network {
                message: err.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ErrorBody>(&body)
                .map(|parsed| parsed.error)
                .unwrap_or_else(|_| status_fallback_message(status.as_u16())),
            Err(_) => status_fallback_message(status.as_u16()),
        };
        debug!(status = status.as_u16(), %message, "request rejected by server");
        Err(TransportError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    response
        .json::<T>()
        .await
        .map_err(|err| TransportError::Decode {
            reason: err.to_string(),
        })
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
