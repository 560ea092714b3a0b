pub mod lmstudio;
pub mod openrouter;

pub use lmstudio::LmStudioProvider;
pub use openrouter::OpenRouterProvider;
