//! # Scripture Content
//!
//! Everything the reader shows (chapter text, the daily verse, search hits)
//! comes from a [`ScriptureProvider`]. The production implementation,
//! [`ModelScripture`], prompts a language model through a
//! [`CompletionProvider`](crate::inference::CompletionProvider); tests swap
//! in stubs.

pub mod error;
pub mod model;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use error::{FailureKind, ScriptureError};
pub use model::ModelScripture;

/// The verse shown on the Início panel.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct DailyMessage {
    /// A referência do versículo, por exemplo, 'João 3:16'
    pub reference: String,
    /// O texto completo do versículo.
    pub text: String,
}

/// One verse matching a search query.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// O nome do livro da Bíblia.
    pub book: String,
    /// O número do capítulo.
    pub chapter: u32,
    /// O número do versículo.
    pub verse: u32,
    /// O texto completo do versículo.
    pub text: String,
}

#[async_trait]
pub trait ScriptureProvider: Send + Sync {
    /// Raw chapter text, one `N. text` verse per line by convention only.
    async fn fetch_chapter_text(&self, book: &str, chapter: u32) -> Result<String, ScriptureError>;

    /// Fails unless both fields come back non-empty.
    async fn fetch_daily_message(&self) -> Result<DailyMessage, ScriptureError>;

    /// An empty list means no matches, not an error.
    async fn search_bible(&self, query: &str) -> Result<Vec<SearchResult>, ScriptureError>;
}
