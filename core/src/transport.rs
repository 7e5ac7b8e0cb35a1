//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only seam where I/O happens. Implementations return
//! every HTTP response as data, including 4xx/5xx, and fail only when no
//! response was received at all. Status interpretation stays in
//! `RestClient`, so the parsing rules are identical for every transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Reqwest-backed transport.
///
/// Keeps a cookie store so the backend's login session survives between
/// calls made through the same transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` when the reqwest client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(map_transport_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::transport(format!("request timed out: {error}"))
    } else if error.is_connect() {
        ApiError::transport(format!("connection failed: {error}"))
    } else {
        ApiError::transport(error.to_string())
    }
}
