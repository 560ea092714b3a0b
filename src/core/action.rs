//! # Actions
//!
//! Everything that can happen in the reader becomes an `Action`.
//! User presses →? That's `Action::NextChapter`.
//! The provider answers? That's `Action::ChapterLoaded { .. }`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state and returns an [`Effect`] for the adapter to carry out.
//! No I/O here besides persisting to the injected store.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Provider requests are tagged with a [`RequestId`]; a completion whose id
//! (or, for chapters, whose book and chapter) no longer matches the state is
//! dropped, so a slow answer never overwrites a newer one.

use log::{debug, info, warn};

use crate::core::books;
use crate::core::fetch::RequestId;
use crate::core::navigation::{ActiveView, NavigationState};
use crate::core::state::{App, LoadedChapter};
use crate::scripture::error::{DAILY_FAILURE_MESSAGE, SEARCH_FAILURE_MESSAGE};
use crate::scripture::{DailyMessage, ScriptureError, SearchResult};

#[derive(Debug)]
pub enum Action {
    SwitchView(ActiveView),
    ChangeBook(String),
    ChangeChapter(u32),
    /// Commit of the free-typed chapter field; `None` if nothing parseable was typed.
    ChapterInputBlur(Option<i64>),
    PreviousChapter,
    NextChapter,
    ToggleHighlight(u32),
    ClearHighlights,
    RequestJump(u32),
    ChapterLoaded {
        id: RequestId,
        book: String,
        chapter: u32,
        result: Result<String, ScriptureError>,
    },
    DailyMessageLoaded {
        id: RequestId,
        result: Result<DailyMessage, ScriptureError>,
    },
    RetryDailyMessage,
    SubmitSearch(String),
    SearchCompleted {
        id: RequestId,
        result: Result<Vec<SearchResult>, ScriptureError>,
    },
    Quit,
}

/// Work the adapter must do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    FetchChapter {
        id: RequestId,
        book: String,
        chapter: u32,
    },
    FetchDailyMessage {
        id: RequestId,
    },
    Search {
        id: RequestId,
        query: String,
    },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::SwitchView(view) => {
            if !app.navigation.switch_view(view) {
                return Effect::None;
            }
            app.persist_navigation();
            enter_view(app)
        }
        Action::ChangeBook(book) => {
            // Stricter than `NavigationState::change_book`, which would accept
            // an unknown name with a single chapter: only canon books get in.
            if books::find(&book).is_none() {
                warn!("Ignoring unknown book '{}'", book);
                return Effect::None;
            }
            navigate(app, |nav| nav.change_book(&book))
        }
        Action::ChangeChapter(chapter) => navigate(app, |nav| nav.change_chapter(chapter)),
        Action::ChapterInputBlur(chapter) => {
            navigate(app, |nav| nav.chapter_input_blur(chapter))
        }
        Action::PreviousChapter => navigate(app, NavigationState::previous),
        Action::NextChapter => navigate(app, NavigationState::next),
        Action::ToggleHighlight(verse) => {
            if verse == 0 {
                return Effect::None;
            }
            let nav = &app.navigation;
            app.highlights =
                app.highlights
                    .toggle(&nav.selected_book, nav.selected_chapter, verse);
            app.persist_highlights();
            Effect::None
        }
        Action::ClearHighlights => {
            let nav = &app.navigation;
            if !app.highlights.has_any(&nav.selected_book, nav.selected_chapter) {
                return Effect::None;
            }
            app.highlights = app
                .highlights
                .clear(&nav.selected_book, nav.selected_chapter);
            app.persist_highlights();
            app.status_message = String::from("Destaques do capítulo removidos");
            Effect::None
        }
        Action::RequestJump(verse) => {
            if !app.jump.request(verse) {
                debug!("Rejected jump to verse {}", verse);
            }
            Effect::None
        }
        Action::ChapterLoaded {
            id,
            book,
            chapter,
            result,
        } => {
            // Both the request id and the selection it was issued for must
            // still be current.
            let nav = &app.navigation;
            let is_current = app.chapter.pending() == Some(id)
                && book == nav.selected_book
                && chapter == nav.selected_chapter;
            if !is_current {
                debug!("Dropping stale chapter {} {} (request {})", book, chapter, id);
                return Effect::None;
            }
            let result = match result {
                Ok(text) => {
                    info!("Loaded {} {}: {} bytes", book, chapter, text.len());
                    Ok(LoadedChapter {
                        book,
                        chapter,
                        text,
                    })
                }
                Err(e) => {
                    warn!("Chapter fetch failed: {}", e);
                    Err(e.user_message().to_string())
                }
            };
            app.chapter.complete(id, result);
            Effect::None
        }
        Action::DailyMessageLoaded { id, result } => {
            let result = result.map_err(|e| {
                warn!("Daily message fetch failed: {}", e);
                DAILY_FAILURE_MESSAGE.to_string()
            });
            if !app.daily.complete(id, result) {
                debug!("Dropping stale daily message (request {})", id);
            }
            Effect::None
        }
        Action::RetryDailyMessage => {
            if app.daily.pending().is_some() {
                return Effect::None;
            }
            Effect::FetchDailyMessage {
                id: app.daily.begin(),
            }
        }
        Action::SubmitSearch(query) => {
            let query = query.trim();
            if query.is_empty() {
                return Effect::None;
            }
            app.last_query = Some(query.to_string());
            Effect::Search {
                id: app.search.restart(),
                query: query.to_string(),
            }
        }
        Action::SearchCompleted { id, result } => {
            let result = result.map_err(|e| {
                warn!("Search failed: {}", e);
                SEARCH_FAILURE_MESSAGE.to_string()
            });
            if !app.search.complete(id, result) {
                debug!("Dropping stale search results (request {})", id);
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// The effect of arriving at the restored view on startup.
pub fn initial_effect(app: &mut App) -> Effect {
    enter_view(app)
}

/// Applies a navigation change; persists it and refetches the chapter when
/// the Bíblia panel is showing.
fn navigate(app: &mut App, change: impl FnOnce(&mut NavigationState) -> bool) -> Effect {
    if !change(&mut app.navigation) {
        return Effect::None;
    }
    app.persist_navigation();
    if app.navigation.active_view == ActiveView::Bible {
        fetch_chapter(app)
    } else {
        Effect::None
    }
}

fn enter_view(app: &mut App) -> Effect {
    match app.navigation.active_view {
        ActiveView::Bible => fetch_chapter(app),
        ActiveView::Home if app.daily.data.is_none() && app.daily.pending().is_none() => {
            Effect::FetchDailyMessage {
                id: app.daily.begin(),
            }
        }
        ActiveView::Home | ActiveView::Search | ActiveView::Doctrine => Effect::None,
    }
}

fn fetch_chapter(app: &mut App) -> Effect {
    let book = app.navigation.selected_book.clone();
    let chapter = app.navigation.selected_chapter;
    let id = app.chapter.begin();
    Effect::FetchChapter { id, book, chapter }
}
