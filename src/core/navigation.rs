//! # Navigation State
//!
//! Which view is active and which chapter is open.
//!
//! ```text
//!            previous()                      next()
//! Êxodo 1 ──────────────► Gênesis 50   Gênesis 50 ──────────► Êxodo 1
//! Gênesis 1 ─────────────► (no-op)     Apocalipse 22 ───────► (no-op)
//! ```
//!
//! `selected_chapter` always lies in `1..=chapter_count(selected_book)`.
//! Every transition returns `true` when it changed something so the caller
//! knows to persist and refetch.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::core::books;
use crate::core::storage::{KEY_BOOK, KEY_CHAPTER, KEY_VIEW, KeyValueStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    Home,
    #[default]
    Bible,
    Search,
    Doctrine,
}

impl ActiveView {
    pub const ALL: [ActiveView; 4] = [
        ActiveView::Home,
        ActiveView::Bible,
        ActiveView::Search,
        ActiveView::Doctrine,
    ];

    /// Name used in persisted state.
    pub fn as_str(self) -> &'static str {
        match self {
            ActiveView::Home => "home",
            ActiveView::Bible => "bible",
            ActiveView::Search => "search",
            ActiveView::Doctrine => "doctrine",
        }
    }

    /// Tab label shown to the reader.
    pub fn label(self) -> &'static str {
        match self {
            ActiveView::Home => "Início",
            ActiveView::Bible => "Bíblia",
            ActiveView::Search => "Pesquisa",
            ActiveView::Doctrine => "Pontos de Doutrina",
        }
    }

    /// Cycles to the next tab (wraps around)
    pub fn next(self) -> ActiveView {
        match self {
            ActiveView::Home => ActiveView::Bible,
            ActiveView::Bible => ActiveView::Search,
            ActiveView::Search => ActiveView::Doctrine,
            ActiveView::Doctrine => ActiveView::Home,
        }
    }

    /// Cycles to the previous tab (wraps around)
    pub fn previous(self) -> ActiveView {
        match self {
            ActiveView::Home => ActiveView::Doctrine,
            ActiveView::Bible => ActiveView::Home,
            ActiveView::Search => ActiveView::Bible,
            ActiveView::Doctrine => ActiveView::Search,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownView(pub String);

impl fmt::Display for UnknownView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown view: {:?}", self.0)
    }
}

impl std::error::Error for UnknownView {}

impl FromStr for ActiveView {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(ActiveView::Home),
            "bible" => Ok(ActiveView::Bible),
            "search" => Ok(ActiveView::Search),
            "doctrine" => Ok(ActiveView::Doctrine),
            other => Err(UnknownView(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub active_view: ActiveView,
    pub selected_book: String,
    pub selected_chapter: u32,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            active_view: ActiveView::default(),
            selected_book: books::first_book().name.to_string(),
            selected_chapter: 1,
        }
    }
}

impl NavigationState {
    /// Restores the last session's position.
    ///
    /// An unknown view falls back to the Bible reader, an unknown book to
    /// Gênesis, and the chapter is clamped into the restored book's range.
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        let defaults = NavigationState::default();

        let active_view = store
            .get(KEY_VIEW)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.active_view);

        let selected_book = store
            .get(KEY_BOOK)
            .filter(|b| books::find(b).is_some())
            .unwrap_or(defaults.selected_book);

        let max = books::chapter_count(&selected_book);
        let selected_chapter = store
            .get(KEY_CHAPTER)
            .and_then(|c| c.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .clamp(1, max);

        let restored = Self {
            active_view,
            selected_book,
            selected_chapter,
        };
        debug!("Restored navigation: {:?}", restored);
        restored
    }

    /// Writes view, book and chapter to the store.
    pub fn persist(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(KEY_VIEW, self.active_view.as_str().to_string())?;
        store.set(KEY_BOOK, self.selected_book.clone())?;
        store.set(KEY_CHAPTER, self.selected_chapter.to_string())?;
        Ok(())
    }

    pub fn chapter_count(&self) -> u32 {
        books::chapter_count(&self.selected_book)
    }

    pub fn switch_view(&mut self, view: ActiveView) -> bool {
        if self.active_view == view {
            return false;
        }
        self.active_view = view;
        true
    }

    /// Selects `book` and resets to chapter 1.
    pub fn change_book(&mut self, book: &str) -> bool {
        if self.selected_book == book && self.selected_chapter == 1 {
            return false;
        }
        self.selected_book = book.to_string();
        self.selected_chapter = 1;
        true
    }

    /// Jumps to `chapter` if it exists in the current book. Out-of-range
    /// requests are ignored.
    pub fn change_chapter(&mut self, chapter: u32) -> bool {
        if chapter < 1 || chapter > self.chapter_count() || chapter == self.selected_chapter {
            return false;
        }
        self.selected_chapter = chapter;
        true
    }

    /// Commits a typed chapter number, clamping it into range instead of
    /// rejecting it. `None` (nothing parseable typed) becomes chapter 1.
    pub fn chapter_input_blur(&mut self, chapter: Option<i64>) -> bool {
        let max = i64::from(self.chapter_count());
        let clamped = chapter.unwrap_or(1).clamp(1, max);
        // `clamped` lies in 1..=max, which came from a u32
        let clamped = u32::try_from(clamped).unwrap_or(1);
        if clamped == self.selected_chapter {
            return false;
        }
        self.selected_chapter = clamped;
        true
    }

    /// Steps back one chapter, crossing into the previous book's last chapter.
    pub fn previous(&mut self) -> bool {
        if self.selected_chapter > 1 {
            self.selected_chapter -= 1;
            return true;
        }
        match books::previous_book(&self.selected_book) {
            Some(prev) => {
                self.selected_book = prev.name.to_string();
                self.selected_chapter = prev.chapter_count;
                true
            }
            None => false,
        }
    }

    /// Steps forward one chapter, crossing into the next book's first chapter.
    pub fn next(&mut self) -> bool {
        if self.selected_chapter < self.chapter_count() {
            self.selected_chapter += 1;
            return true;
        }
        match books::next_book(&self.selected_book) {
            Some(next) => {
                self.selected_book = next.name.to_string();
                self.selected_chapter = 1;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::books::BIBLE_BOOKS;
    use crate::core::storage::MemoryStore;

    fn at(book: &str, chapter: u32) -> NavigationState {
        NavigationState {
            active_view: ActiveView::Bible,
            selected_book: book.to_string(),
            selected_chapter: chapter,
        }
    }

    #[test]
    fn test_change_chapter_accepted_iff_in_range() {
        for book in BIBLE_BOOKS.iter() {
            for n in [0, 1, book.chapter_count, book.chapter_count + 1] {
                let mut nav = at(book.name, 1);
                nav.selected_chapter = if n == 1 && book.chapter_count > 1 { 2 } else { 1 };
                let before = nav.selected_chapter;
                nav.change_chapter(n);
                let in_range = (1..=book.chapter_count).contains(&n);
                if in_range {
                    assert_eq!(nav.selected_chapter, n, "{} {}", book.name, n);
                } else {
                    assert_eq!(nav.selected_chapter, before, "{} {}", book.name, n);
                }
            }
        }
    }

    #[test]
    fn test_change_book_resets_chapter() {
        let mut nav = at("Salmos", 119);
        assert!(nav.change_book("Provérbios"));
        assert_eq!(nav.selected_book, "Provérbios");
        assert_eq!(nav.selected_chapter, 1);
    }

    #[test]
    fn test_unknown_book_has_one_chapter() {
        let mut nav = at("Gênesis", 5);
        nav.change_book("Enoque");
        assert_eq!(nav.chapter_count(), 1);
        assert!(!nav.change_chapter(2));
        assert!(!nav.next());
        assert!(!nav.previous());
    }

    #[test]
    fn test_blur_clamps_instead_of_rejecting() {
        let mut nav = at("Rute", 2);
        assert!(nav.chapter_input_blur(Some(99)));
        assert_eq!(nav.selected_chapter, 4);
        assert!(nav.chapter_input_blur(Some(-3)));
        assert_eq!(nav.selected_chapter, 1);
        nav.selected_chapter = 3;
        assert!(nav.chapter_input_blur(None));
        assert_eq!(nav.selected_chapter, 1);
        assert!(!nav.chapter_input_blur(Some(0)));
    }

    #[test]
    fn test_previous_at_canon_start_is_noop() {
        let mut nav = at("Gênesis", 1);
        assert!(!nav.previous());
        assert_eq!(nav, at("Gênesis", 1));
    }

    #[test]
    fn test_next_at_canon_end_is_noop() {
        let mut nav = at("Apocalipse", 22);
        assert!(!nav.next());
        assert_eq!(nav, at("Apocalipse", 22));
    }

    #[test]
    fn test_next_crosses_into_following_book() {
        let mut nav = at("Gênesis", 50);
        assert!(nav.next());
        assert_eq!(nav, at("Êxodo", 1));
    }

    #[test]
    fn test_previous_crosses_into_last_chapter_of_prior_book() {
        let mut nav = at("Mateus", 1);
        assert!(nav.previous());
        assert_eq!(nav, at("Malaquias", 4));
    }

    #[test]
    fn test_within_book_steps() {
        let mut nav = at("Marcos", 8);
        nav.next();
        assert_eq!(nav.selected_chapter, 9);
        nav.previous();
        nav.previous();
        assert_eq!(nav.selected_chapter, 7);
    }

    #[test]
    fn test_restore_valid_state() {
        let store = MemoryStore::with_entries([
            (KEY_VIEW, "search"),
            (KEY_BOOK, "Isaías"),
            (KEY_CHAPTER, "53"),
        ]);
        let nav = NavigationState::restore(&store);
        assert_eq!(nav.active_view, ActiveView::Search);
        assert_eq!(nav.selected_book, "Isaías");
        assert_eq!(nav.selected_chapter, 53);
    }

    #[test]
    fn test_restore_defaults_on_garbage() {
        let store = MemoryStore::with_entries([
            (KEY_VIEW, "settings"),
            (KEY_BOOK, "Enoque"),
            (KEY_CHAPTER, "abc"),
        ]);
        assert_eq!(NavigationState::restore(&store), NavigationState::default());
        assert_eq!(
            NavigationState::restore(&MemoryStore::new()),
            NavigationState::default()
        );
    }

    #[test]
    fn test_restore_clamps_chapter() {
        let store = MemoryStore::with_entries([(KEY_BOOK, "Judas"), (KEY_CHAPTER, "7")]);
        assert_eq!(NavigationState::restore(&store).selected_chapter, 1);
        let store = MemoryStore::with_entries([(KEY_BOOK, "Judas"), (KEY_CHAPTER, "0")]);
        assert_eq!(NavigationState::restore(&store).selected_chapter, 1);
    }

    #[test]
    fn test_persist_then_restore() {
        let mut store = MemoryStore::new();
        let mut nav = at("Romanos", 8);
        nav.switch_view(ActiveView::Home);
        nav.persist(&mut store).unwrap();
        assert_eq!(store.get(KEY_CHAPTER).as_deref(), Some("8"));
        assert_eq!(NavigationState::restore(&store), nav);
    }

    #[test]
    fn test_view_names_round_trip() {
        for view in ActiveView::ALL {
            assert_eq!(view.as_str().parse::<ActiveView>(), Ok(view));
            assert_eq!(view.next().previous(), view);
        }
        assert!("Bible".parse::<ActiveView>().is_err());
    }
}
