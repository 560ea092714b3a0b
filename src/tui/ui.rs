//! Frame layout: title line, active panel, status line, overlays.
//!
//! ```text
//! ┌ title bar (1) ─────────────────────────────┐
//! │ panel (Início | Bíblia | Pesquisa | ...)   │
//! └ status bar (1) ────────────────────────────┘
//! ```

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::navigation::ActiveView;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::text_field::FIELD_HEIGHT;
use crate::tui::components::{
    BookPicker, ChapterView, DoctrinePanel, HomePanel, NavigationBar, SearchPanel, StatusBar,
    TitleBar,
};

/// Width of the chapter/verse input next to the navigation bar.
const NAV_INPUT_WIDTH: u16 = 26;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, now: Instant) {
    use Constraint::{Length, Min};
    let [title_area, body_area, status_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());

    let view = app.navigation.active_view;
    TitleBar::new(view, &tui.model_name).render(frame, title_area);

    match view {
        ActiveView::Home => HomePanel::new(&app.daily).render(frame, body_area),
        ActiveView::Bible => draw_bible(frame, body_area, app, tui, now),
        ActiveView::Search => {
            SearchPanel::new(&mut tui.search, &app.search, app.last_query.as_deref())
                .render(frame, body_area)
        }
        ActiveView::Doctrine => DoctrinePanel.render(frame, body_area),
    }

    StatusBar::new(view, &app.status_message).render(frame, status_area);

    if let Some(picker) = tui.book_picker.as_mut() {
        BookPicker::new(picker, &app.navigation.selected_book).render(frame, frame.area());
    }
}

fn draw_bible(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState, now: Instant) {
    use Constraint::{Length, Min};
    let [nav_area, chapter_area] = Layout::vertical([Length(FIELD_HEIGHT), Min(0)]).areas(area);

    let highlights = app.current_highlights();
    let mut navigation = NavigationBar::new(
        &app.navigation.selected_book,
        app.navigation.selected_chapter,
        highlights.len(),
    );
    match tui.nav_input.as_mut() {
        Some(input) => {
            let [bar_area, input_area] =
                Layout::horizontal([Min(0), Length(NAV_INPUT_WIDTH)]).areas(nav_area);
            navigation.render(frame, bar_area);
            input.field.render(frame, input_area);
        }
        None => navigation.render(frame, nav_area),
    }

    ChapterView::new(
        &mut tui.chapter_view,
        app.current_chapter(),
        app.chapter.loading,
        app.chapter.error.as_deref(),
        &highlights,
        now,
    )
    .render(frame, chapter_area);
}
