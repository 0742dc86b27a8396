//! HTTP client for streamed chat completions.

use crate::aggregator::aggregate_lines;
use crate::provider::ChatCompletion;
use crate::{ChatRequest, ClientConfig, Error, Message};
use reqwest::{Client, Proxy};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Request body as sent on the wire.
#[derive(Debug, Serialize)]
pub(crate) struct WireRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f32,
    pub max_completion_tokens: u32,
    pub top_p: f32,
    pub stream: bool,
}

impl<'a> From<&'a ChatRequest> for WireRequest<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        let sampling = request.sampling();
        Self {
            model: request.model(),
            messages: request.messages(),
            temperature: sampling.temperature,
            max_completion_tokens: sampling.max_completion_tokens,
            top_p: sampling.top_p,
            stream: true,
        }
    }
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ChatClient {
    /// Create a client, checking the configuration before anything is sent.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        config.validate()?;

        let mut builder = Client::builder().timeout(config.timeout);

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| Error::config(format!("invalid proxy URL {proxy_url}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        if config.accept_invalid_certs {
            warn!(
                endpoint = %config.endpoint,
                "TLS certificate validation is disabled"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint,
            api_key: config.api_key,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChatCompletion for ChatClient {
    /// Send one streamed request and aggregate the answer.
    #[instrument(skip_all, fields(model = %request.model(), messages = request.messages().len()))]
    async fn complete(&self, request: &ChatRequest) -> Result<String, Error> {
        let body = WireRequest::from(request);

        debug!(endpoint = %self.endpoint, "sending chat completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            warn!(status = status.as_u16(), "chat completion request rejected");
            return Err(Error::status(status.as_u16(), error_text));
        }

        // The body is dropped with the stream when aggregation returns.
        aggregate_lines(response.bytes_stream()).await
    }
}
