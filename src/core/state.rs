//! # Application State
//!
//! Core business state for the reader. This module contains domain logic
//! only, no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── scripture: Arc<dyn ScriptureProvider>  // content source
//! ├── store: Box<dyn KeyValueStore>          // persisted state
//! ├── navigation: NavigationState            // view, book, chapter
//! ├── highlights: HighlightMap               // highlighted verses
//! ├── jump: JumpController                   // pending jump-to-verse
//! ├── chapter: FetchState<LoadedChapter>     // Bíblia panel
//! ├── daily: FetchState<DailyMessage>        // Início panel
//! ├── search: FetchState<Vec<SearchResult>>  // Pesquisa panel
//! ├── last_query: Option<String>             // query of the latest search
//! └── status_message: String                 // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use log::warn;

use crate::core::fetch::FetchState;
use crate::core::highlights::HighlightMap;
use crate::core::jump::JumpController;
use crate::core::navigation::NavigationState;
use crate::core::storage::{KEY_HIGHLIGHTS, KeyValueStore};
use crate::scripture::{DailyMessage, ScriptureProvider, SearchResult};

/// Chapter text together with the selection it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedChapter {
    pub book: String,
    pub chapter: u32,
    pub text: String,
}

pub struct App {
    pub scripture: Arc<dyn ScriptureProvider>,
    pub store: Box<dyn KeyValueStore>,
    pub navigation: NavigationState,
    pub highlights: HighlightMap,
    pub jump: JumpController,
    pub chapter: FetchState<LoadedChapter>,
    pub daily: FetchState<DailyMessage>,
    pub search: FetchState<Vec<SearchResult>>,
    pub last_query: Option<String>,
    pub status_message: String,
}

impl App {
    /// Builds the app, restoring navigation and highlights from `store`.
    pub fn new(scripture: Arc<dyn ScriptureProvider>, store: Box<dyn KeyValueStore>) -> Self {
        let navigation = NavigationState::restore(store.as_ref());
        let highlights = HighlightMap::load(store.as_ref());
        Self {
            scripture,
            store,
            navigation,
            highlights,
            jump: JumpController::new(),
            chapter: FetchState::new(),
            daily: FetchState::new(),
            search: FetchState::new(),
            last_query: None,
            status_message: String::from("Bem-vindo à Bíblia Sagrada!"),
        }
    }

    /// The loaded chapter, if it belongs to the current selection.
    pub fn current_chapter(&self) -> Option<&LoadedChapter> {
        self.chapter.data.as_ref().filter(|loaded| {
            loaded.book == self.navigation.selected_book
                && loaded.chapter == self.navigation.selected_chapter
        })
    }

    /// Highlighted verses of the current chapter, ascending.
    pub fn current_highlights(&self) -> Vec<u32> {
        self.highlights.get(
            &self.navigation.selected_book,
            self.navigation.selected_chapter,
        )
    }

    pub(crate) fn persist_navigation(&mut self) {
        if let Err(e) = self.navigation.persist(self.store.as_mut()) {
            warn!("Failed to persist navigation: {}", e);
        }
    }

    pub(crate) fn persist_highlights(&mut self) {
        let json = match self.highlights.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize highlights: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(KEY_HIGHLIGHTS, json) {
            warn!("Failed to persist highlights: {}", e);
        }
    }
}
