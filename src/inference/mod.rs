pub mod provider;
pub mod providers;
pub(crate) mod responses;
pub mod types;

pub use provider::{CompletionProvider, CompletionRequest, ProviderError, complete_text};
pub use providers::{LmStudioProvider, OpenRouterProvider};
pub use types::{Context, ContextSegment, ResponseFormat, Source, StreamChunk};
