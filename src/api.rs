use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by a [`Transport`] implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is not available")]
    Unavailable,

    #[error("request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {path} failed with status {status}: {body}")]
    Status {
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("request to {path} timed out after {elapsed:?}")]
    Timeout { path: String, elapsed: Duration },

    // Used by stub transports and anything that is not HTTP-shaped
    #[error("{0}")]
    Other(String),
}

// Trait defining the HTTP capability the gateway depends on.
// Paths are relative to a base address fixed when the transport is built.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, TransportError>;

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError>;
}

// --- reqwest implementation ---

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| TransportError::Request {
                path: String::new(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read_json(path: &str, response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<Failed to read error body>".to_string());
            log::error!("Request to {} failed with status {}: {}", path, status, body);
            return Err(TransportError::Status {
                path: path.to_string(),
                status,
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|source| TransportError::Request {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        log::debug!("GET {}", self.url(path));
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| TransportError::Request {
                path: path.to_string(),
                source,
            })?;
        Self::read_json(path, response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        log::debug!("POST {}", self.url(path));
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                path: path.to_string(),
                source,
            })?;
        Self::read_json(path, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:7999/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:7999");
        assert_eq!(transport.url("/models"), "http://localhost:7999/models");
        assert_eq!(transport.url("route"), "http://localhost:7999/route");
    }
}
