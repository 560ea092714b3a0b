//! OpenRouter provider implementation using the Responses API.

use async_trait::async_trait;
use log::info;
use tokio::sync::mpsc::Sender;

use crate::inference::responses::{self, ResponsesRequest};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError, StreamChunk};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenRouter API provider using Responses API
pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Creates a new OpenRouter provider.
    ///
    /// # Arguments
    /// * `api_key` - OpenRouter API key
    /// * `base_url` - Optional custom base URL (defaults to OpenRouter's API)
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    /// Sends a request to the Responses endpoint and returns the response.
    async fn send_request(
        &self,
        request: &ResponsesRequest,
    ) -> Result<reqwest::Response, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Config(
                "OPENROUTER_API_KEY is not set".to_string(),
            ));
        }

        let json_body = serde_json::to_string(request)
            .map_err(|e| ProviderError::Parse(format!("Request serialization failed: {e}")))?;
        info!("Raw OpenRouter Request: {}", json_body);

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(json_body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        responses::error_for_status("OpenRouter", response).await
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "OpenRouter"
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        // The Responses API is stateless, so the full context goes out on
        // every request.
        let responses_request =
            ResponsesRequest::streaming(request.model, request.context, request.response_format);

        info!(
            "OpenRouter Responses API request: model={}, input_count={}, structured={}",
            request.model,
            responses_request.input.len(),
            request.response_format.is_some(),
        );

        let response = self.send_request(&responses_request).await?;
        responses::read_stream(self.name(), response, sender).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::Context;
    use tokio::sync::mpsc;

    #[test]
    fn test_default_base_url() {
        let provider = OpenRouterProvider::new("key".to_string(), None);
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        let custom = OpenRouterProvider::new("key".to_string(), Some("http://x".to_string()));
        assert_eq!(custom.base_url, "http://x");
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error_without_network() {
        // Unroutable base URL: reaching the network would surface as Network.
        let provider =
            OpenRouterProvider::new(String::new(), Some("http://127.0.0.1:9".to_string()));
        let context = Context::new("sys");
        let (tx, _rx) = mpsc::channel(1);
        let result = provider
            .stream_completion(
                CompletionRequest {
                    context: &context,
                    model: "m",
                    response_format: None,
                },
                tx,
            )
            .await;
        assert!(matches!(result, Err(ProviderError::Config(_))));
    }
}
