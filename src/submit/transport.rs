//! HTTP seam for the diagnosis API.
//!
//! Text forms POST `{"text": …}` as JSON; the tongue form POSTs the raw
//! image as multipart under the `image` field. Both expect a JSON body
//! `{"response": non-empty string}`; anything else is a failure. Exactly one
//! request per call — no retries, no backoff.

use super::{SubmitError, SubmitResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Outbound call seam, mockable under test.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a text payload and returns the report text.
    async fn post_text(&self, text: &str) -> SubmitResult<String>;

    /// Sends an image and returns the report text.
    async fn post_image(&self, bytes: Vec<u8>, filename: &str, mime: &str)
        -> SubmitResult<String>;
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    response: Option<String>,
}

/// reqwest-backed transport bound to one endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> SubmitResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SubmitError::Config(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn read_reply(&self, response: reqwest::Response) -> SubmitResult<String> {
        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, %status, "submission rejected");
            return Err(SubmitError::Status(status.as_u16()));
        }
        let reply: ApiReply = response
            .json()
            .await
            .map_err(|_| SubmitError::MalformedBody)?;
        match reply.response {
            Some(text) if !text.is_empty() => {
                info!(endpoint = %self.endpoint, "report received");
                Ok(text)
            }
            _ => Err(SubmitError::MalformedBody),
        }
    }
}

fn map_send_error(e: reqwest::Error) -> SubmitError {
    if e.is_timeout() {
        SubmitError::Timeout
    } else if e.is_connect() {
        SubmitError::Connect
    } else {
        SubmitError::Network(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_text(&self, text: &str) -> SubmitResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(map_send_error)?;
        self.read_reply(response).await
    }

    async fn post_image(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        mime: &str,
    ) -> SubmitResult<String> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(|e| SubmitError::Config(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("image", part);
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;
        self.read_reply(response).await
    }
}
