//! Wire types and stream handling shared by every Responses-API provider.
//!
//! This module uses OpenAI Responses API terminology:
//! - "input" (array of messages, not "context")
//! - "role" (not "source")
//! - "text.format" for structured (JSON schema) output
//! - SSE events: response.output_text.delta, response.completed, response.failed

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Sender;

use crate::inference::{Context, ProviderError, ResponseFormat, Source, StreamChunk};

// ============================================================================
// Request Types
// ============================================================================

/// Role in an input message (OpenAI terminology)
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the input array
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename = "message")]
pub(crate) struct InputMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Serialize, Debug)]
pub(crate) struct TextFormat {
    #[serde(rename = "type")]
    pub format_type: &'static str, // always "json_schema"
    pub name: String,
    pub schema: serde_json::Value,
    pub strict: bool,
}

#[derive(Serialize, Debug)]
pub(crate) struct TextConfig {
    pub format: TextFormat,
}

/// The request body for the Responses API
#[derive(Serialize, Debug)]
pub(crate) struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig>,
}

impl ResponsesRequest {
    pub fn streaming(model: &str, context: &Context, format: Option<&ResponseFormat>) -> Self {
        Self {
            model: model.to_string(),
            input: context_to_input(context),
            stream: Some(true),
            text: format.map(|f| TextConfig {
                format: TextFormat {
                    format_type: "json_schema",
                    name: f.name.clone(),
                    schema: f.schema.clone(),
                    strict: true,
                },
            }),
        }
    }
}

/// Converts our Context into Responses API input format.
pub(crate) fn context_to_input(context: &Context) -> Vec<InputMessage> {
    context
        .items
        .iter()
        .map(|seg| InputMessage {
            role: match seg.source {
                Source::Directive => Role::System,
                Source::User => Role::User,
                Source::Model => Role::Assistant,
            },
            content: seg.content.clone(),
        })
        .collect()
}

// ============================================================================
// Stream Types
// ============================================================================

/// Generic SSE payload. Some servers put the event type only in the JSON
/// `type` field, not in an `event:` line.
#[derive(Deserialize, Debug)]
struct SseEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    delta: String,
}

/// Payload of `response.failed` / `error` events.
#[derive(Deserialize, Debug, Default)]
struct FailureEvent {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    response: Option<FailedResponse>,
}

#[derive(Deserialize, Debug, Default)]
struct FailedResponse {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

fn failure_message(data: &str) -> String {
    let event: FailureEvent = serde_json::from_str(data).unwrap_or_default();
    event
        .message
        .or_else(|| event.response.and_then(|r| r.error).map(|e| e.message))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "request failed".to_string())
}

/// One `data:` line and the event type in effect for it.
#[derive(Debug, PartialEq)]
pub(crate) struct SseFrame {
    pub event_type: Option<String>,
    pub data: String,
}

/// Splits a byte stream into SSE frames. Partial lines stay buffered as raw
/// bytes until the rest arrives, so a UTF-8 character split across network
/// chunks is decoded whole.
#[derive(Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    current_event_type: Option<String>,
}

impl SseDecoder {
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim();

            if let Some(event_type) = line.strip_prefix("event: ") {
                self.current_event_type = Some(event_type.to_string());
                continue;
            }
            if let Some(data) = line.strip_prefix("data: ") {
                frames.push(SseFrame {
                    event_type: self.current_event_type.take(),
                    data: data.to_string(),
                });
            }
        }
        frames
    }
}

/// Reads an SSE response to the end, forwarding text deltas to `sender`.
pub(crate) async fn read_stream(
    provider_name: &str,
    mut response: reqwest::Response,
    sender: Sender<StreamChunk>,
) -> Result<(), ProviderError> {
    let mut decoder = SseDecoder::default();
    let mut total_content_len = 0usize;
    let mut chunk_count = 0usize;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?
    {
        debug!("Raw chunk received: {} bytes", chunk.len());
        for frame in decoder.feed(&chunk) {
            if frame.data == "[DONE]" {
                debug!("Received [DONE] marker");
                continue;
            }

            let event_type = frame.event_type.or_else(|| {
                serde_json::from_str::<SseEvent>(&frame.data)
                    .ok()
                    .map(|e| e.event_type)
            });

            match event_type.as_deref() {
                Some("response.output_text.delta") => {
                    if let Ok(event) = serde_json::from_str::<SseEvent>(&frame.data)
                        && !event.delta.is_empty()
                    {
                        chunk_count += 1;
                        total_content_len += event.delta.len();
                        if sender.send(StreamChunk::Content(event.delta)).await.is_err() {
                            warn!("Content chunk send failed: receiver dropped");
                            return Err(ProviderError::ChannelClosed);
                        }
                    }
                }
                Some("response.completed") => {
                    info!(
                        "{} stream complete: {} chunks, {} content bytes",
                        provider_name, chunk_count, total_content_len
                    );
                    if sender.send(StreamChunk::Completed).await.is_err() {
                        warn!("Completed send failed: receiver dropped");
                        return Err(ProviderError::ChannelClosed);
                    }
                    return Ok(());
                }
                Some("response.failed") | Some("error") => {
                    let message = failure_message(&frame.data);
                    warn!("{} reported failure: {}", provider_name, message);
                    return Err(ProviderError::Provider(message));
                }
                Some(other) => {
                    // response.created, response.in_progress, reasoning deltas, ...
                    debug!("Ignoring event type '{}': {} bytes", other, frame.data.len());
                }
                None => {
                    debug!("Could not parse event type from data: {}", frame.data);
                }
            }
        }
    }

    warn!(
        "{} stream ended without response.completed: {} chunks, {} content bytes",
        provider_name, chunk_count, total_content_len
    );
    Err(ProviderError::Provider(
        "stream ended before response.completed".to_string(),
    ))
}

/// Turns a non-success HTTP response into `ProviderError::Api`.
pub(crate) async fn error_for_status(
    provider_name: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    debug!("{} response status: {}", provider_name, response.status());
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let err_body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!("{} API error: {} - {}", provider_name, status, err_body);
    Err(ProviderError::Api {
        status,
        message: err_body,
    })
}
