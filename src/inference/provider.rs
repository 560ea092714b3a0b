use std::fmt;

use async_trait::async_trait;
use log::debug;
use tokio::sync::mpsc::{self, Sender};

use super::types::{Context, ResponseFormat, StreamChunk};

/// Errors that can occur during provider operations.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// The provider reported a failure inside an otherwise healthy stream.
    Provider(String),
    /// Failed to parse the provider's response.
    Parse(String),
    /// The mpsc channel was closed (receiver dropped).
    ChannelClosed,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Provider(msg) => write!(f, "provider error: {msg}"),
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to fulfill a completion request.
pub struct CompletionRequest<'a> {
    pub context: &'a Context,
    pub model: &'a str,
    /// When set, the answer must be JSON matching this schema.
    pub response_format: Option<&'a ResponseFormat>,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Streams a completion based on the given request, sending chunks to the provided channel.
    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError>;
}

/// Runs a streaming completion to the end and returns the concatenated text.
pub async fn complete_text(
    provider: &dyn CompletionProvider,
    request: CompletionRequest<'_>,
) -> Result<String, ProviderError> {
    let (tx, mut rx) = mpsc::channel::<StreamChunk>(100);

    let collect = async move {
        let mut text = String::new();
        while let Some(chunk) = rx.recv().await {
            match chunk {
                StreamChunk::Content(delta) => text.push_str(&delta),
                StreamChunk::Completed => break,
            }
        }
        text
    };

    let (result, text) = tokio::join!(provider.stream_completion(request, tx), collect);
    result?;
    debug!("{} completion collected: {} bytes", provider.name(), text.len());
    Ok(text)
}
