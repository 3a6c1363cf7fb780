//! HTTP transport for single JSON-RPC exchanges

use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use anyhow::Context;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Something that can deliver one request and hand back the decoded body.
///
/// Implementations report their own failures and return `None`, so callers
/// only ever branch on "got a response" or "did not".
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(
        &self,
        endpoint: &Url,
        token: &str,
        payload: &JsonRpcRequest,
    ) -> Option<JsonRpcResponse>;
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// Server answered with something other than 200.
    #[error("HTTP Error: {status}")]
    Status { status: StatusCode, body: String },

    /// Connection refused, DNS failure, timeout and the like.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid JSON in response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    /// Writes the diagnostic for this failure to stderr.
    pub fn report(&self) {
        match self {
            TransportError::Status { body, .. } => {
                eprintln!("{}", self);
                if !body.is_empty() {
                    eprintln!("{}", body);
                }
            }
            _ => eprintln!("Error sending request: {}", self),
        }
    }
}

/// reqwest-backed transport with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("build reqwest client")?;
        Ok(Self { http })
    }

    /// Sends `payload` and decodes the body, keeping the failure typed.
    pub async fn try_send(
        &self,
        endpoint: &Url,
        token: &str,
        payload: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, TransportError> {
        tracing::debug!(%endpoint, method = %payload.method, id = payload.id, "sending request");

        let response = self
            .http
            .post(endpoint.clone())
            .header(AUTHORIZATION, token)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        Ok(JsonRpcResponse::new(body))
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: &Url,
        token: &str,
        payload: &JsonRpcRequest,
    ) -> Option<JsonRpcResponse> {
        match self.try_send(endpoint, token, payload).await {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::debug!(%endpoint, error = %e, "request failed");
                e.report();
                None
            }
        }
    }
}
