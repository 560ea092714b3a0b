//! # NavigationBar Component
//!
//! Header of the Bíblia panel: previous/next arrows around the current book
//! and chapter, and how many verses of the chapter are highlighted. The
//! arrows dim at the ends of the canon where ←/→ do nothing.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::books;
use crate::tui::component::Component;

pub struct NavigationBar<'a> {
    pub book: &'a str,
    pub chapter: u32,
    pub highlighted: usize,
}

impl<'a> NavigationBar<'a> {
    pub fn new(book: &'a str, chapter: u32, highlighted: usize) -> Self {
        Self {
            book,
            chapter,
            highlighted,
        }
    }

    fn has_previous(&self) -> bool {
        self.chapter > 1 || books::previous_book(self.book).is_some()
    }

    fn has_next(&self) -> bool {
        self.chapter < books::chapter_count(self.book) || books::next_book(self.book).is_some()
    }
}

fn arrow(symbol: &'static str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(symbol, style)
}

impl Component for NavigationBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            arrow("◀ ", self.has_previous()),
            Span::styled(
                self.book,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                " · Capítulo {} de {} ",
                self.chapter,
                books::chapter_count(self.book)
            )),
            arrow("▶", self.has_next()),
        ];
        if self.highlighted > 0 {
            spans.push(Span::styled(
                format!("   {} destacado(s)", self.highlighted),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ));
        }

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(ratatui::widgets::Padding::horizontal(1));
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }
}
