//! # TextField Component
//!
//! Single-line text input used for the search query, the chapter number and
//! the jump-to-verse number.
//!
//! The buffer and cursor are internal state. Title, placeholder and focus are
//! props set by the parent. The field never clears itself on submit; the
//! parent decides (the search panel keeps the query, number fields reset).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Offset from area edge to content (border + padding)
const CONTENT_OFFSET: u16 = 2;
/// Height of the bordered field
pub const FIELD_HEIGHT: u16 = 3;

/// High-level events emitted by the TextField
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// Enter pressed; carries the whole buffer
    Submit(String),
    /// Esc pressed
    Cancel,
    /// Buffer or cursor changed
    Changed,
}

/// Which characters the field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

pub struct TextField {
    pub buffer: String,
    pub title: String,
    pub placeholder: String,
    pub focused: bool,
    kind: FieldKind,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl TextField {
    pub fn new(title: &str, placeholder: &str, kind: FieldKind) -> Self {
        Self {
            buffer: String::new(),
            title: title.to_string(),
            placeholder: placeholder.to_string(),
            focused: false,
            kind,
            cursor: 0,
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            FieldKind::Text => !c.is_control(),
            FieldKind::Number => c.is_ascii_digit(),
        }
    }

    fn insert_str(&mut self, text: &str) -> bool {
        let filtered: String = text.chars().filter(|c| self.accepts(*c)).collect();
        if filtered.is_empty() {
            return false;
        }
        self.buffer.insert_str(self.cursor, &filtered);
        self.cursor += filtered.len();
        true
    }

    /// Display column of the cursor relative to the start of the buffer.
    fn cursor_column(&self) -> u16 {
        self.buffer[..self.cursor].width() as u16
    }

    /// Columns scrolled off the left edge so the cursor stays visible.
    fn horizontal_scroll(&self, inner_width: u16) -> u16 {
        if inner_width == 0 {
            return 0;
        }
        self.cursor_column()
            .saturating_sub(inner_width.saturating_sub(1))
    }

    /// The part of the buffer visible after skipping `skip` columns.
    fn visible_text(&self, skip: u16) -> String {
        let mut skipped = 0u16;
        self.buffer
            .chars()
            .skip_while(|c| {
                if skipped >= skip {
                    return false;
                }
                skipped += c.width().unwrap_or(0) as u16;
                true
            })
            .collect()
    }
}

impl Component for TextField {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        let scroll = self.horizontal_scroll(inner_width);

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title.as_str())
            .padding(ratatui::widgets::Padding::horizontal(1));

        let line = if self.buffer.is_empty() {
            Line::from(Span::styled(
                self.placeholder.as_str(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            Line::from(self.visible_text(scroll))
        };

        frame.render_widget(Paragraph::new(line).block(block), area);

        if self.focused {
            let x = area.x + CONTENT_OFFSET + self.cursor_column() - scroll;
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y + 1));
        }
    }
}

impl EventHandler for TextField {
    type Event = FieldEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut tmp))
                    .then_some(FieldEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                // Single line: newlines become spaces
                let flattened = text.replace(['\r', '\n'], " ");
                self.insert_str(&flattened).then_some(FieldEvent::Changed)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                FieldEvent::Changed
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                FieldEvent::Changed
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                FieldEvent::Changed
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                FieldEvent::Changed
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                FieldEvent::Changed
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                FieldEvent::Changed
            }),
            TuiEvent::Submit => Some(FieldEvent::Submit(self.buffer.clone())),
            TuiEvent::Escape => Some(FieldEvent::Cancel),
            _ => None,
        }
    }
}
