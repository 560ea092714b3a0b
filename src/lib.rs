//! Biblia library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod inference;
pub mod scripture;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// The LLM backend that answers scripture requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    #[default]
    OpenRouter,
    LmStudio,
}
