//! # ChapterView Component
//!
//! Scrollable view of one chapter, one paragraph per display unit.
//!
//! ## Responsibilities
//!
//! - Render verses with their number, highlight and pulse styling
//! - Keep a verse cursor (↑/↓) for highlighting from the keyboard
//! - Scroll a jumped-to verse into the middle of the viewport
//! - Cache paragraph heights so only the visible slice is rendered
//!
//! ## Architecture
//!
//! `ChapterView` is a transient component (created each frame) wrapping
//! `&'a mut ChapterViewState` (persistent state) plus the chapter and
//! highlights as props. Heights are predicted with `textwrap` using the same
//! options the `Paragraph` wrap uses, so the scroll canvas is sized without
//! rendering anything off screen.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::jump::{JumpTarget, VersePulse};
use crate::core::state::LoadedChapter;
use crate::core::verses::{DisplayUnit, parse_chapter};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Columns reserved left of the text for the cursor marker.
const GUTTER_WIDTH: u16 = 2;
const CURSOR_MARKER: &str = "▶ ";

/// Events emitted by the chapter view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterViewEvent {
    ToggleHighlight(u32),
}

/// Layout and cursor state for the chapter view.
/// Must be persisted in the parent TuiState.
pub struct ChapterViewState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// Index of the display unit under the cursor
    pub selected: Option<usize>,
    /// Emphasis left by the last jump
    pub pulse: Option<VersePulse>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Verse number of every display unit of the shown chapter
    verse_numbers: Vec<Option<u32>>,
    shown: Option<LoadedChapter>,
    center_pending: bool,
}

impl Default for ChapterViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterViewState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            selected: None,
            pulse: None,
            viewport_height: 0,
            verse_numbers: Vec::new(),
            shown: None,
            center_pending: false,
        }
    }

    /// Follows the chapter being displayed. A different chapter (or new text
    /// for the same one) resets scroll, cursor and pulse.
    pub fn sync(&mut self, chapter: Option<&LoadedChapter>) {
        if self.shown.as_ref() == chapter {
            return;
        }
        self.scroll_state.scroll_to_top();
        self.layout.invalidate();
        self.selected = None;
        self.pulse = None;
        self.center_pending = false;
        self.verse_numbers = chapter
            .map(|c| parse_chapter(&c.text).map(|u| u.verse_number()).collect())
            .unwrap_or_default();
        self.shown = chapter.cloned();
    }

    /// Moves the cursor onto a consumed jump target and starts its pulse.
    /// The scroll happens on the next render, once heights are known.
    pub fn focus(&mut self, target: JumpTarget) {
        self.selected = Some(target.unit_index);
        self.pulse = Some(target.pulse);
        self.center_pending = true;
    }

    pub fn selected_verse(&self) -> Option<u32> {
        self.selected
            .and_then(|idx| self.verse_numbers.get(idx).copied().flatten())
    }

    pub fn is_pulsing(&self, now: Instant) -> bool {
        self.pulse.is_some_and(|p| p.is_active(now))
    }

    /// Drops a finished pulse. Returns true if one was dropped (the verse
    /// needs one more redraw without it).
    pub fn expire_pulse(&mut self, now: Instant) -> bool {
        if self.pulse.is_some() && !self.is_pulsing(now) {
            self.pulse = None;
            return true;
        }
        false
    }

    /// First verse unit whose paragraph reaches into the viewport.
    fn first_visible_verse(&self) -> Option<usize> {
        let offset = self.scroll_state.offset().y;
        let start = self
            .layout
            .prefix_heights
            .partition_point(|&end| end <= offset);
        self.verse_numbers
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, n)| n.is_some())
            .or_else(|| self.verse_numbers.iter().enumerate().find(|(_, n)| n.is_some()))
            .map(|(i, _)| i)
    }

    pub fn select_next(&mut self) {
        let next = match self.selected {
            Some(idx) => self
                .verse_numbers
                .iter()
                .enumerate()
                .skip(idx + 1)
                .find(|(_, n)| n.is_some())
                .map(|(i, _)| i),
            None => self.first_visible_verse(),
        };
        if next.is_some() {
            self.selected = next;
            self.scroll_to_selected();
        }
    }

    pub fn select_previous(&mut self) {
        let previous = match self.selected {
            Some(idx) => self.verse_numbers[..idx.min(self.verse_numbers.len())]
                .iter()
                .rposition(|n| n.is_some()),
            None => self.first_visible_verse(),
        };
        if previous.is_some() {
            self.selected = previous;
            self.scroll_to_selected();
        }
    }

    fn max_scroll(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected unit is fully visible.
    /// If the unit is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some((item_top, item_bottom)) = self.selected.and_then(|i| self.layout.bounds(i))
        else {
            return;
        };
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
        } else if item_bottom > offset_y + self.viewport_height {
            let new_y = item_bottom
                .saturating_sub(self.viewport_height)
                .min(item_top);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
        }
    }

    /// Put the selected unit in the middle of the viewport.
    fn center_selected(&mut self) {
        let Some((item_top, item_bottom)) = self.selected.and_then(|i| self.layout.bounds(i))
        else {
            return;
        };
        let height = item_bottom - item_top;
        let y = item_top
            .saturating_sub(self.viewport_height.saturating_sub(height) / 2)
            .min(self.max_scroll());
        self.scroll_state.set_offset(Position { x: 0, y });
    }
}

/// Scrollable chapter view component.
/// Created fresh each frame with references to state and data.
pub struct ChapterView<'a> {
    pub state: &'a mut ChapterViewState,
    pub chapter: Option<&'a LoadedChapter>,
    pub loading: bool,
    pub error: Option<&'a str>,
    /// Highlighted verses of the shown chapter, ascending
    pub highlights: &'a [u32],
    pub now: Instant,
}

impl<'a> ChapterView<'a> {
    pub fn new(
        state: &'a mut ChapterViewState,
        chapter: Option<&'a LoadedChapter>,
        loading: bool,
        error: Option<&'a str>,
        highlights: &'a [u32],
        now: Instant,
    ) -> Self {
        Self {
            state,
            chapter,
            loading,
            error,
            highlights,
            now,
        }
    }

    fn render_placeholder(&self, frame: &mut Frame, area: Rect) {
        let lines = if let Some(error) = self.error {
            vec![
                Line::from(Span::styled(error, Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(Span::styled(
                    "Escolha outro capítulo ou volte ao painel para tentar novamente.",
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        } else if self.loading {
            vec![Line::from(Span::styled(
                "Carregando capítulo...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))]
        } else {
            Vec::new()
        };

        let top_pad = area.height.saturating_sub(lines.len() as u16) / 2;
        let centered = Rect {
            y: area.y + top_pad,
            height: area.height.saturating_sub(top_pad),
            ..area
        };
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            centered,
        );
    }

    fn unit_style(&self, verse: Option<u32>) -> Style {
        let Some(verse) = verse else {
            return Style::default().fg(Color::Gray);
        };
        if self.state.pulse.is_some_and(|p| p.applies_to(verse, self.now)) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if self.highlights.binary_search(&verse).is_ok() {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        }
    }
}

/// The text a unit renders as; also what its height is measured on.
fn unit_text(unit: &DisplayUnit<'_>) -> (Option<String>, String) {
    match unit {
        DisplayUnit::Verse(v) => (Some(v.number.to_string()), v.content.trim_end().to_string()),
        DisplayUnit::Text(line) => (None, line.trim_end().to_string()),
    }
}

/// Predicts the wrapped height of one unit at `width` columns.
pub fn unit_height(unit: &DisplayUnit<'_>, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    let (number, content) = unit_text(unit);
    let text = match number {
        Some(n) => format!("{n} {content}"),
        None => content,
    };
    if text.trim().is_empty() {
        return 1;
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    (textwrap::wrap(&text, options).len() as u16).max(1)
}

impl Component for ChapterView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync(self.chapter);
        let Some(chapter) = self.chapter else {
            self.render_placeholder(frame, area);
            return;
        };

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let text_width = content_width.saturating_sub(GUTTER_WIDTH);

        // 1. Update layout cache
        if !self.state.layout.is_valid_for(text_width) {
            self.state.layout.rebuild(parse_chapter(&chapter.text), text_width);
        }
        let total_height = self.state.layout.total_height();

        // 2. Scroll bookkeeping
        self.state.viewport_height = area.height;
        if self.state.center_pending {
            self.state.center_selected();
            self.state.center_pending = false;
        }
        self.state.clamp_scroll();

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible units into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for (i, unit) in parse_chapter(&chapter.text)
            .enumerate()
            .skip(visible.start)
            .take(visible.len())
        {
            let Some((top, bottom)) = self.state.layout.bounds(i) else {
                break;
            };
            let height = bottom - top;

            if self.state.selected == Some(i) {
                scroll_view.render_widget(
                    Span::styled(CURSOR_MARKER, Style::default().fg(Color::Cyan)),
                    Rect::new(0, top, GUTTER_WIDTH, 1),
                );
            }

            let style = self.unit_style(unit.verse_number());
            let (number, content) = unit_text(&unit);
            let mut spans = Vec::with_capacity(2);
            if let Some(number) = number {
                // Numbers keep the paragraph colors on highlighted verses
                let number_style = if style.bg.is_some() {
                    style.add_modifier(Modifier::BOLD)
                } else {
                    style.fg(Color::Yellow).add_modifier(Modifier::BOLD)
                };
                spans.push(Span::styled(format!("{number} "), number_style));
            }
            spans.push(Span::styled(content, style));

            let paragraph = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: false });
            scroll_view.render_widget(paragraph, Rect::new(GUTTER_WIDTH, top, text_width, height));
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler lives on the state: the transient view is rebuilt each frame.
impl EventHandler for ChapterViewState {
    type Event = ChapterViewEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.clamp_scroll();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.clamp_scroll();
                None
            }
            TuiEvent::CursorUp => {
                self.select_previous();
                None
            }
            TuiEvent::CursorDown => {
                self.select_next();
                None
            }
            TuiEvent::InputChar(' ') | TuiEvent::Submit => self
                .selected_verse()
                .map(ChapterViewEvent::ToggleHighlight),
            _ => None,
        }
    }
}

/// Cached paragraph heights for the shown chapter.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    width: Option<u16>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            width: None,
        }
    }

    pub fn invalidate(&mut self) {
        self.heights.clear();
        self.prefix_heights.clear();
        self.width = None;
    }

    pub fn is_valid_for(&self, width: u16) -> bool {
        self.width == Some(width)
    }

    pub fn rebuild<'t>(&mut self, units: impl Iterator<Item = DisplayUnit<'t>>, width: u16) {
        self.heights = units.map(|unit| unit_height(&unit, width)).collect();
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
        self.width = Some(width);
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Top (inclusive) and bottom (exclusive) rows of unit `index`.
    pub fn bounds(&self, index: usize) -> Option<(u16, u16)> {
        let bottom = *self.prefix_heights.get(index)?;
        let top = if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        };
        Some((top, bottom))
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let start = self
            .prefix_heights
            .partition_point(|&end| end <= scroll_offset);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < scroll_offset.saturating_add(viewport_height))
            .saturating_add(1)
            .min(self.prefix_heights.len());
        start..end.max(start)
    }
}
