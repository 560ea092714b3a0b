//! # Book Picker Component
//!
//! Centered overlay listing the 66 books. Opened with `b` on the Bíblia
//! panel.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `BookPickerState` lives in `TuiState` while the overlay is open
//! - `BookPicker` is created each frame with borrowed state
//!
//! Typing a letter jumps to the next book starting with it, so "j" cycles
//! through Josué, Juízes, Jó, Jeremias...

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding};

use crate::core::books::{self, BIBLE_BOOKS};
use crate::tui::event::TuiEvent;

/// Rows moved by PageUp/PageDown.
const PAGE: usize = 10;

/// Persistent state for the book picker overlay.
pub struct BookPickerState {
    pub selected: usize,
    pub list_state: ListState,
}

/// Events emitted by the book picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookPickerEvent {
    Select(&'static str),
    Dismiss,
}

impl BookPickerState {
    /// Opens the picker with `current_book` under the cursor.
    pub fn new(current_book: &str) -> Self {
        let selected = books::index_of(current_book).unwrap_or(0);
        let mut list_state = ListState::default();
        list_state.select(Some(selected));
        Self {
            selected,
            list_state,
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(BIBLE_BOOKS.len() - 1);
        self.list_state.select(Some(self.selected));
    }

    /// Next book after the cursor whose name starts with `c`, wrapping.
    fn find_by_initial(&self, c: char) -> Option<usize> {
        let wanted: String = c.to_lowercase().collect();
        (1..=BIBLE_BOOKS.len())
            .map(|step| (self.selected + step) % BIBLE_BOOKS.len())
            .find(|&i| BIBLE_BOOKS[i].name.to_lowercase().starts_with(&wanted))
    }

    /// Handle a key event, returning a BookPickerEvent if the overlay should act.
    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<BookPickerEvent> {
        match event {
            TuiEvent::Escape => Some(BookPickerEvent::Dismiss),
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                self.select(self.selected.saturating_sub(1));
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                self.select(self.selected + 1);
                None
            }
            TuiEvent::ScrollPageUp => {
                self.select(self.selected.saturating_sub(PAGE));
                None
            }
            TuiEvent::ScrollPageDown => {
                self.select(self.selected + PAGE);
                None
            }
            TuiEvent::CursorHome => {
                self.select(0);
                None
            }
            TuiEvent::CursorEnd => {
                self.select(BIBLE_BOOKS.len() - 1);
                None
            }
            TuiEvent::InputChar(c) if !c.is_whitespace() => {
                if let Some(index) = self.find_by_initial(*c) {
                    self.select(index);
                }
                None
            }
            TuiEvent::Submit => Some(BookPickerEvent::Select(BIBLE_BOOKS[self.selected].name)),
            _ => None,
        }
    }
}

/// Transient render wrapper for the book picker overlay.
pub struct BookPicker<'a> {
    state: &'a mut BookPickerState,
    current_book: &'a str,
}

impl<'a> BookPicker<'a> {
    pub fn new(state: &'a mut BookPickerState, current_book: &'a str) -> Self {
        Self {
            state,
            current_book,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(50, 70, area);

        // Clear underlying content
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Livros ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Enter Selecionar  Esc Voltar ").centered())
            .padding(Padding::horizontal(1));

        let items: Vec<ListItem> = BIBLE_BOOKS
            .iter()
            .enumerate()
            .map(|(i, book)| {
                let is_current = book.name == self.current_book;
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if is_current {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let marker = if is_current { " *" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{}{}", book.name, marker), style),
                    Span::styled(
                        format!("  ({} cap.)", book.chapter_count),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_opens_on_current_book() {
        let state = BookPickerState::new("Salmos");
        assert_eq!(BIBLE_BOOKS[state.selected].name, "Salmos");
        assert_eq!(BookPickerState::new("Desconhecido").selected, 0);
    }

    #[test]
    fn test_navigation_is_bounded() {
        let mut picker = BookPickerState::new("Gênesis");
        picker.handle_event(&TuiEvent::CursorUp);
        assert_eq!(picker.selected, 0);
        picker.handle_event(&TuiEvent::CursorEnd);
        picker.handle_event(&TuiEvent::CursorDown);
        assert_eq!(picker.selected, 65);
        picker.handle_event(&TuiEvent::ScrollPageUp);
        assert_eq!(picker.selected, 55);
    }

    #[test]
    fn test_initial_letter_cycles_matching_books() {
        let mut picker = BookPickerState::new("Gênesis");
        picker.handle_event(&TuiEvent::InputChar('j'));
        assert_eq!(BIBLE_BOOKS[picker.selected].name, "Josué");
        picker.handle_event(&TuiEvent::InputChar('J'));
        assert_eq!(BIBLE_BOOKS[picker.selected].name, "Juízes");
        // No book starts with 'w': cursor stays put
        picker.handle_event(&TuiEvent::InputChar('w'));
        assert_eq!(BIBLE_BOOKS[picker.selected].name, "Juízes");
    }

    #[test]
    fn test_submit_and_escape() {
        let mut picker = BookPickerState::new("Rute");
        assert_eq!(
            picker.handle_event(&TuiEvent::Submit),
            Some(BookPickerEvent::Select("Rute"))
        );
        assert_eq!(
            picker.handle_event(&TuiEvent::Escape),
            Some(BookPickerEvent::Dismiss)
        );
    }

    #[test]
    fn test_render_lists_books() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut state = BookPickerState::new("Gênesis");
        terminal
            .draw(|f| BookPicker::new(&mut state, "Gênesis").render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Livros"));
        assert!(text.contains("Gênesis *"));
        assert!(text.contains("(50 cap.)"));
    }
}
