//! # Core Application Logic
//!
//! This module contains the reader's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. Effects out.    │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                    ┌───────────▼─────────────┐
//!                    │      TUI Adapter        │
//!                    │  (ratatui + tokio)      │
//!                    └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`books`]: The 66-book canon and chapter counts
//! - [`verses`]: Splits chapter text into verse and text units
//! - [`navigation`]: Active view, book and chapter with persistence
//! - [`highlights`]: Per-chapter highlighted verses
//! - [`jump`]: Pending "go to verse" requests and the pulse
//! - [`fetch`]: Request-id bookkeeping for async loads
//! - [`storage`]: Key-value persistence
//! - [`config`]: `~/.biblia/config.toml`, env vars and CLI flags

pub mod action;
pub mod books;
pub mod config;
pub mod fetch;
pub mod highlights;
pub mod jump;
pub mod navigation;
pub mod state;
pub mod storage;
pub mod verses;
