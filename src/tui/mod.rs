//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into core `Action`s and carries out the
//! `Effect`s the reducer returns by spawning provider requests on tokio.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop redraws only when something changed: an input event, a
//! provider answer, or a jump pulse that is still running (or just ended).
//! While a request is in flight the poll timeout is short so answers show up
//! promptly; when idle it sleeps up to 500ms.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::Provider;
use crate::core::action::{Action, Effect, initial_effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::jump::parse_verse_input;
use crate::core::navigation::ActiveView;
use crate::core::state::App;
use crate::core::storage::FileStore;
use crate::core::verses::parse_chapter;
use crate::inference::{CompletionProvider, LmStudioProvider, OpenRouterProvider};
use crate::scripture::ModelScripture;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    BookPickerEvent, BookPickerState, ChapterViewEvent, ChapterViewState, FieldEvent, FieldKind,
    SearchEvent, SearchPanelState, TextField,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Poll timeout while a request is in flight or a pulse is running.
const BUSY_POLL: Duration = Duration::from_millis(80);
/// Poll timeout when nothing is happening.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Which number the small input next to the navigation bar edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavInputKind {
    Chapter,
    Verse,
}

pub struct NavInput {
    pub kind: NavInputKind,
    pub field: TextField,
}

impl NavInput {
    fn chapter(current: u32) -> Self {
        let mut field = TextField::new(" Capítulo ", "número", FieldKind::Number);
        field.set_text(&current.to_string());
        field.focused = true;
        Self {
            kind: NavInputKind::Chapter,
            field,
        }
    }

    fn verse() -> Self {
        let mut field = TextField::new(" Ir para versículo ", "número", FieldKind::Number);
        field.focused = true;
        Self {
            kind: NavInputKind::Verse,
            field,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub model_name: String,
    // Persistent component states
    pub chapter_view: ChapterViewState,
    pub search: SearchPanelState,
    // Overlays (None = hidden)
    pub book_picker: Option<BookPickerState>,
    pub nav_input: Option<NavInput>,
}

impl TuiState {
    pub fn new(model_name: String) -> Self {
        Self {
            model_name,
            chapter_view: ChapterViewState::new(),
            search: SearchPanelState::new(),
            book_picker: None,
            nav_input: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // The Kitty keyboard protocol is harmlessly ignored by terminals
        // that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Build a provider from a resolved config's provider and credentials.
///
/// A missing OpenRouter key is not fatal here: the provider reports it on
/// every request and the panels show the authentication message.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn CompletionProvider> {
    match config.provider {
        Provider::LmStudio => Arc::new(LmStudioProvider::new(Some(
            config.lmstudio_base_url.clone(),
        ))),
        Provider::OpenRouter => {
            let api_key = config.openrouter_api_key.clone().unwrap_or_else(|| {
                warn!("No OpenRouter API key configured; requests will fail");
                String::new()
            });
            Arc::new(OpenRouterProvider::new(
                api_key,
                Some(config.openrouter_base_url.clone()),
            ))
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config);
    info!(
        "Using {} with model {} ({})",
        provider.name(),
        config.model_name,
        config.translation
    );
    let scripture = Arc::new(ModelScripture::new(
        provider,
        config.model_name.clone(),
        config.translation.clone(),
    ));
    let store = FileStore::open(config.state_file.clone());
    let mut app = App::new(scripture, Box::new(store));
    let mut tui = TuiState::new(config.model_name.clone());

    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new();
    if let Err(e) = &terminal_mode_guard {
        warn!("Could not enable terminal modes: {}", e);
    }

    let result = event_loop(&mut terminal, &mut app, &mut tui);

    drop(terminal_mode_guard);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
) -> std::io::Result<()> {
    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let effect = initial_effect(app);
    dispatch(effect, app, &tx);

    let mut needs_redraw = true; // Force first frame

    loop {
        let now = Instant::now();
        if consume_jump(app, tui, now) || tui.chapter_view.expire_pulse(now) {
            needs_redraw = true;
        }
        let animating = tui.chapter_view.is_pulsing(now);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, tui, now))?;
            needs_redraw = false;
        }

        let busy = animating || app.chapter.loading || app.daily.loading || app.search.loading;
        let first_event = poll_event_timeout(if busy { BUSY_POLL } else { IDLE_POLL });

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = route_event(app, tui, &event) else {
                continue;
            };
            let effect = update(app, action);
            if dispatch(effect, app, &tx) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (provider answers)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            let effect = update(app, action);
            dispatch(effect, app, &tx);
        }
    }

    info!("Leaving the reader");
    Ok(())
}

/// Reads the chapter field the way a number input commits on blur: empty
/// means nothing typed; digits too large for i64 saturate (and get clamped).
fn parse_chapter_input(text: &str) -> Option<i64> {
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse::<i64>().unwrap_or(i64::MAX))
}

/// Maps one input event to an action, updating presentation state on the
/// way. Overlays and open inputs take the event first.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::Resize => return None,
        _ => {}
    }

    if let Some(picker) = tui.book_picker.as_mut() {
        return match picker.handle_event(event)? {
            BookPickerEvent::Select(book) => {
                tui.book_picker = None;
                Some(Action::ChangeBook(book.to_string()))
            }
            BookPickerEvent::Dismiss => {
                tui.book_picker = None;
                None
            }
        };
    }

    if let Some(input) = tui.nav_input.as_mut() {
        let kind = input.kind;
        return match input.field.handle_event(event)? {
            FieldEvent::Submit(text) => {
                tui.nav_input = None;
                match kind {
                    NavInputKind::Chapter => {
                        Some(Action::ChapterInputBlur(parse_chapter_input(&text)))
                    }
                    NavInputKind::Verse => parse_verse_input(&text).map(Action::RequestJump),
                }
            }
            FieldEvent::Cancel => {
                tui.nav_input = None;
                None
            }
            FieldEvent::Changed => None,
        };
    }

    let view = app.navigation.active_view;
    match event {
        TuiEvent::NextTab => return Some(Action::SwitchView(view.next())),
        TuiEvent::PreviousTab => return Some(Action::SwitchView(view.previous())),
        TuiEvent::Escape => return Some(Action::Quit),
        _ => {}
    }

    if view == ActiveView::Search {
        return match tui.search.handle_event(event)? {
            SearchEvent::Submit(query) => Some(Action::SubmitSearch(query)),
        };
    }

    if let TuiEvent::InputChar(c @ '1'..='4') = event {
        let index = (*c as u8 - b'1') as usize;
        return Some(Action::SwitchView(ActiveView::ALL[index]));
    }

    match view {
        ActiveView::Home => {
            matches!(event, TuiEvent::InputChar('r')).then_some(Action::RetryDailyMessage)
        }
        ActiveView::Bible => route_bible_event(app, tui, event),
        ActiveView::Search | ActiveView::Doctrine => None,
    }
}

fn route_bible_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::CursorLeft => Some(Action::PreviousChapter),
        TuiEvent::CursorRight => Some(Action::NextChapter),
        TuiEvent::InputChar('b') => {
            tui.book_picker = Some(BookPickerState::new(&app.navigation.selected_book));
            None
        }
        TuiEvent::InputChar('c') => {
            tui.nav_input = Some(NavInput::chapter(app.navigation.selected_chapter));
            None
        }
        TuiEvent::InputChar('v') => {
            tui.nav_input = Some(NavInput::verse());
            None
        }
        TuiEvent::InputChar('x') => Some(Action::ClearHighlights),
        _ => match tui.chapter_view.handle_event(event)? {
            ChapterViewEvent::ToggleHighlight(verse) => Some(Action::ToggleHighlight(verse)),
        },
    }
}

/// Consumes a pending jump once the chapter it targets is on screen.
/// Returns true when the view changed.
fn consume_jump(app: &mut App, tui: &mut TuiState, now: Instant) -> bool {
    if app.jump.pending().is_none() || app.chapter.loading {
        return false;
    }
    let Some(text) = app.current_chapter().map(|c| c.text.clone()) else {
        // Nothing rendered to jump into
        app.jump.take();
        return false;
    };
    tui.chapter_view.sync(app.current_chapter());
    match app.jump.consume(parse_chapter(&text), now) {
        Some(target) => {
            tui.chapter_view.focus(target);
            true
        }
        None => false,
    }
}

/// Carries out an effect. Returns true if the app should quit.
fn dispatch(effect: Effect, app: &App, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::FetchChapter { id, book, chapter } => {
            info!("Spawning chapter request {} for {} {}", id, book, chapter);
            let scripture = app.scripture.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = scripture.fetch_chapter_text(&book, chapter).await;
                if tx
                    .send(Action::ChapterLoaded {
                        id,
                        book,
                        chapter,
                        result,
                    })
                    .is_err()
                {
                    warn!("Failed to deliver chapter {}: receiver dropped", id);
                }
            });
        }
        Effect::FetchDailyMessage { id } => {
            info!("Spawning daily message request {}", id);
            let scripture = app.scripture.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = scripture.fetch_daily_message().await;
                if tx.send(Action::DailyMessageLoaded { id, result }).is_err() {
                    warn!("Failed to deliver daily message {}: receiver dropped", id);
                }
            });
        }
        Effect::Search { id, query } => {
            info!("Spawning search request {} for {:?}", id, query);
            let scripture = app.scripture.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = scripture.search_bible(&query).await;
                debug!("Search {} finished", id);
                if tx.send(Action::SearchCompleted { id, result }).is_err() {
                    warn!("Failed to deliver search {}: receiver dropped", id);
                }
            });
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::{KEY_VIEW, MemoryStore};
    use crate::test_support::{test_app, test_app_with_store};

    fn load_chapter(app: &mut App, text: &str) {
        let Effect::FetchChapter { id, book, chapter } = initial_effect(app) else {
            panic!("expected a chapter fetch");
        };
        update(
            app,
            Action::ChapterLoaded {
                id,
                book,
                chapter,
                result: Ok(text.to_string()),
            },
        );
    }

    fn type_keys(app: &App, tui: &mut TuiState, keys: &str) -> Vec<Action> {
        keys.chars()
            .filter_map(|c| route_event(app, tui, &TuiEvent::InputChar(c)))
            .collect()
    }

    #[test]
    fn test_parse_chapter_input() {
        assert_eq!(parse_chapter_input(""), None);
        assert_eq!(parse_chapter_input(" 12 "), Some(12));
        assert_eq!(parse_chapter_input("0"), Some(0));
        assert_eq!(
            parse_chapter_input("99999999999999999999999"),
            Some(i64::MAX)
        );
    }

    #[test]
    fn test_escape_and_ctrl_c_quit() {
        let app = test_app();
        let mut tui = TuiState::new("m".to_string());
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::Escape),
            Some(Action::Quit)
        ));
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::ForceQuit),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_number_keys_and_tab_switch_views() {
        let app = test_app();
        let mut tui = TuiState::new("m".to_string());
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('3')),
            Some(Action::SwitchView(ActiveView::Search))
        ));
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::NextTab),
            Some(Action::SwitchView(ActiveView::Search))
        ));
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::PreviousTab),
            Some(Action::SwitchView(ActiveView::Home))
        ));
    }

    #[test]
    fn test_search_view_takes_typing() {
        let mut app = test_app();
        update(&mut app, Action::SwitchView(ActiveView::Search));
        let mut tui = TuiState::new("m".to_string());

        assert!(type_keys(&app, &mut tui, "salmo 23").is_empty());
        assert_eq!(tui.search.field.buffer, "salmo 23");
        match route_event(&app, &mut tui, &TuiEvent::Submit) {
            Some(Action::SubmitSearch(query)) => assert_eq!(query, "salmo 23"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_chapter_input_commits_with_blur_semantics() {
        let app = test_app();
        let mut tui = TuiState::new("m".to_string());

        assert!(type_keys(&app, &mut tui, "c").is_empty());
        let input = tui.nav_input.as_ref().unwrap();
        assert_eq!(input.kind, NavInputKind::Chapter);
        assert_eq!(input.field.buffer, "1");

        route_event(&app, &mut tui, &TuiEvent::Backspace);
        type_keys(&app, &mut tui, "75");
        match route_event(&app, &mut tui, &TuiEvent::Submit) {
            Some(Action::ChapterInputBlur(Some(75))) => {}
            other => panic!("unexpected {other:?}"),
        }
        assert!(tui.nav_input.is_none());
    }

    #[test]
    fn test_escape_closes_input_before_quitting() {
        let app = test_app();
        let mut tui = TuiState::new("m".to_string());
        type_keys(&app, &mut tui, "v");
        assert!(route_event(&app, &mut tui, &TuiEvent::Escape).is_none());
        assert!(tui.nav_input.is_none());
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::Escape),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_verse_input_rejects_zero() {
        let app = test_app();
        let mut tui = TuiState::new("m".to_string());
        type_keys(&app, &mut tui, "v0");
        assert!(route_event(&app, &mut tui, &TuiEvent::Submit).is_none());

        type_keys(&app, &mut tui, "v12");
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::Submit),
            Some(Action::RequestJump(12))
        ));
    }

    #[test]
    fn test_book_picker_selection_changes_book() {
        let app = test_app();
        let mut tui = TuiState::new("m".to_string());
        type_keys(&app, &mut tui, "b");
        assert!(tui.book_picker.is_some());
        // While the picker is open, letters move its cursor instead of acting
        assert!(type_keys(&app, &mut tui, "x").is_empty());
        route_event(&app, &mut tui, &TuiEvent::CursorHome);
        route_event(&app, &mut tui, &TuiEvent::CursorDown);
        match route_event(&app, &mut tui, &TuiEvent::Submit) {
            Some(Action::ChangeBook(book)) => assert_eq!(book, "Êxodo"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(tui.book_picker.is_none());
    }

    #[test]
    fn test_bible_keys() {
        let mut app = test_app();
        load_chapter(&mut app, "1. No princípio");
        let mut tui = TuiState::new("m".to_string());
        tui.chapter_view.sync(app.current_chapter());

        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::CursorRight),
            Some(Action::NextChapter)
        ));
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::CursorLeft),
            Some(Action::PreviousChapter)
        ));
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('x')),
            Some(Action::ClearHighlights)
        ));
        route_event(&app, &mut tui, &TuiEvent::CursorDown);
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::InputChar(' ')),
            Some(Action::ToggleHighlight(1))
        ));
    }

    #[test]
    fn test_retry_key_on_home() {
        let store = MemoryStore::with_entries([(KEY_VIEW, "home")]);
        let app = test_app_with_store(store);
        let mut tui = TuiState::new("m".to_string());
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('r')),
            Some(Action::RetryDailyMessage)
        ));
    }

    #[test]
    fn test_jump_focuses_loaded_verse() {
        let mut app = test_app();
        load_chapter(&mut app, "1. Um\n2. Dois\n3. Três");
        let mut tui = TuiState::new("m".to_string());
        update(&mut app, Action::RequestJump(3));

        let now = Instant::now();
        assert!(consume_jump(&mut app, &mut tui, now));
        assert_eq!(tui.chapter_view.selected_verse(), Some(3));
        assert!(tui.chapter_view.is_pulsing(now));
        assert_eq!(app.jump.pending(), None);
    }

    #[test]
    fn test_jump_to_missing_verse_only_clears_request() {
        let mut app = test_app();
        load_chapter(&mut app, "1. Um\n2. Dois");
        let mut tui = TuiState::new("m".to_string());
        tui.chapter_view.sync(app.current_chapter());
        update(&mut app, Action::RequestJump(9));

        assert!(!consume_jump(&mut app, &mut tui, Instant::now()));
        assert_eq!(app.jump.pending(), None);
        assert_eq!(tui.chapter_view.selected, None);
        assert_eq!(tui.chapter_view.pulse, None);
    }

    #[test]
    fn test_jump_waits_for_chapter_to_load() {
        let mut app = test_app();
        initial_effect(&mut app);
        let mut tui = TuiState::new("m".to_string());
        update(&mut app, Action::RequestJump(2));

        assert!(!consume_jump(&mut app, &mut tui, Instant::now()));
        assert_eq!(app.jump.pending(), Some(2));
    }

    #[test]
    fn test_build_provider_follows_config() {
        let mut config = crate::core::config::resolve_with_env(
            &crate::core::config::BibliaConfig::default(),
            crate::core::config::CliOverrides::default(),
            |_| None,
        );
        assert_eq!(build_provider(&config).name(), "OpenRouter");
        config.provider = Provider::LmStudio;
        assert_eq!(build_provider(&config).name(), "LM Studio");
    }
}
