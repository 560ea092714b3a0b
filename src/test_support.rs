//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::state::App;
use crate::core::storage::MemoryStore;
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError, StreamChunk};
use crate::scripture::{DailyMessage, ScriptureError, ScriptureProvider, SearchResult};

/// A scripture source for tests that never run the effects.
pub struct NoopScripture;

#[async_trait]
impl ScriptureProvider for NoopScripture {
    async fn fetch_chapter_text(&self, _book: &str, _chapter: u32) -> Result<String, ScriptureError> {
        Ok(String::new())
    }

    async fn fetch_daily_message(&self) -> Result<DailyMessage, ScriptureError> {
        Err(ScriptureError::Malformed("noop".to_string()))
    }

    async fn search_bible(&self, _query: &str) -> Result<Vec<SearchResult>, ScriptureError> {
        Ok(Vec::new())
    }
}

/// Creates a test App with a NoopScripture and an empty in-memory store.
pub fn test_app() -> App {
    test_app_with_store(MemoryStore::new())
}

pub fn test_app_with_store(store: MemoryStore) -> App {
    App::new(Arc::new(NoopScripture), Box::new(store))
}

/// A completion provider that replays canned chunks and records the last
/// request it saw.
pub struct ScriptedProvider {
    chunks: Vec<String>,
    failure: Mutex<Option<ProviderError>>,
    pub last_prompt: Mutex<Option<String>>,
    pub last_format: Mutex<Option<String>>,
}

impl ScriptedProvider {
    pub fn answering(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            failure: Mutex::new(None),
            last_prompt: Mutex::new(None),
            last_format: Mutex::new(None),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            failure: Mutex::new(Some(error)),
            ..Self::answering(&[])
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        *self.last_prompt.lock().unwrap() =
            request.context.items.last().map(|s| s.content.clone());
        *self.last_format.lock().unwrap() = request.response_format.map(|f| f.name.clone());

        if let Some(error) = self.failure.lock().unwrap().take() {
            return Err(error);
        }
        for chunk in &self.chunks {
            sender
                .send(StreamChunk::Content(chunk.clone()))
                .await
                .map_err(|_| ProviderError::ChannelClosed)?;
        }
        sender
            .send(StreamChunk::Completed)
            .await
            .map_err(|_| ProviderError::ChannelClosed)?;
        Ok(())
    }
}
