//! LM Studio provider implementation using the Responses API.
//!
//! LM Studio v0.3.29+ serves /v1/responses with SSE streaming and
//! `text.format` structured output. No authentication is sent.

use async_trait::async_trait;
use log::info;
use tokio::sync::mpsc::Sender;

use crate::inference::responses::{self, ResponsesRequest};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError, StreamChunk};

pub const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";

pub struct LmStudioProvider {
    base_url: String,
    client: reqwest::Client,
}

impl LmStudioProvider {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for LmStudioProvider {
    fn name(&self) -> &str {
        "LM Studio"
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        let responses_request =
            ResponsesRequest::streaming(request.model, request.context, request.response_format);

        info!(
            "LM Studio request: model={}, {} messages, {} chars",
            request.model,
            responses_request.input.len(),
            request.context.char_count()
        );

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .json(&responses_request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = responses::error_for_status(self.name(), response).await?;
        responses::read_stream(self.name(), response, sender).await
    }
}
