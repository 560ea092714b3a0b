//! # Search Panel
//!
//! The Pesquisa tab: a query field over a scrollable list of results.
//! Occurrences of the query inside each verse are emphasized,
//! case-insensitively.

use log::warn;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use regex::RegexBuilder;

use crate::core::fetch::{FetchState, FetchStatus};
use crate::scripture::SearchResult;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::{FIELD_HEIGHT, FieldEvent, FieldKind, TextField};
use crate::tui::event::TuiEvent;

/// Events emitted by the search panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Submit(String),
}

pub struct SearchPanelState {
    pub field: TextField,
    pub scroll: u16,
    /// Rendered line count of the results (for scroll clamping between frames)
    content_lines: u16,
    viewport_height: u16,
}

impl Default for SearchPanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchPanelState {
    pub fn new() -> Self {
        let mut field = TextField::new(
            " Pesquisa ",
            "Digite uma palavra ou frase e pressione Enter",
            FieldKind::Text,
        );
        field.focused = true;
        Self {
            field,
            scroll: 0,
            content_lines: 0,
            viewport_height: 0,
        }
    }

    fn max_scroll(&self) -> u16 {
        self.content_lines.saturating_sub(self.viewport_height)
    }

    fn scroll_by(&mut self, delta: i32) {
        let target = (self.scroll as i32 + delta).clamp(0, self.max_scroll() as i32);
        self.scroll = target as u16;
    }
}

impl EventHandler for SearchPanelState {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let page = self.viewport_height.max(1) as i32;
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll_by(-1);
                None
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll_by(1);
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_by(-page);
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_by(page);
                None
            }
            _ => match self.field.handle_event(event)? {
                FieldEvent::Submit(query) => {
                    self.scroll = 0;
                    Some(SearchEvent::Submit(query))
                }
                FieldEvent::Cancel | FieldEvent::Changed => None,
            },
        }
    }
}

/// Splits `text` into spans with every case-insensitive occurrence of
/// `query` emphasized.
pub fn emphasize<'t>(text: &'t str, query: &str) -> Vec<Span<'t>> {
    let query = query.trim();
    if query.is_empty() {
        return vec![Span::raw(text)];
    }
    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!("Cannot build emphasis pattern for {:?}: {}", query, e);
            return vec![Span::raw(text)];
        }
    };

    let mark = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            spans.push(Span::raw(&text[last..found.start()]));
        }
        spans.push(Span::styled(found.as_str(), mark));
        last = found.end();
    }
    if last < text.len() {
        spans.push(Span::raw(&text[last..]));
    }
    spans
}

fn summary_line(results: &[SearchResult], query: &str) -> Line<'static> {
    let text = if results.is_empty() {
        format!("Nenhum resultado encontrado para \"{query}\".")
    } else {
        format!("{} resultado(s) para \"{query}\"", results.len())
    };
    Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
}

pub struct SearchPanel<'a> {
    pub state: &'a mut SearchPanelState,
    pub results: &'a FetchState<Vec<SearchResult>>,
    pub last_query: Option<&'a str>,
}

impl<'a> SearchPanel<'a> {
    pub fn new(
        state: &'a mut SearchPanelState,
        results: &'a FetchState<Vec<SearchResult>>,
        last_query: Option<&'a str>,
    ) -> Self {
        Self {
            state,
            results,
            last_query,
        }
    }

    fn body_lines(&self) -> Vec<Line<'a>> {
        let dim = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        let results = self.results;
        match results.status() {
            FetchStatus::Idle => vec![Line::from(Span::styled(
                "Pesquise por uma palavra-chave em toda a Bíblia.",
                dim,
            ))],
            FetchStatus::Loading => vec![Line::from(Span::styled("Pesquisando...", dim))],
            FetchStatus::Failed => results
                .error
                .iter()
                .map(|e| Line::from(Span::styled(e.as_str(), Style::default().fg(Color::Red))))
                .collect(),
            FetchStatus::Success => {
                let found = results.data.as_deref().unwrap_or_default();
                let query = self.last_query.unwrap_or_default();
                let mut lines = vec![summary_line(found, query), Line::from("")];
                for result in found {
                    lines.push(Line::from(Span::styled(
                        format!("{} {}:{}", result.book, result.chapter, result.verse),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(emphasize(&result.text, query)));
                    lines.push(Line::from(""));
                }
                lines
            }
        }
    }
}

impl Component for SearchPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [field_area, body_area] =
            Layout::vertical([Constraint::Length(FIELD_HEIGHT), Constraint::Min(0)]).areas(area);
        self.state.field.render(frame, field_area);

        let body_area = Rect {
            x: body_area.x + 1,
            width: body_area.width.saturating_sub(2),
            ..body_area
        };
        let paragraph = Paragraph::new(self.body_lines()).wrap(Wrap { trim: false });

        self.state.content_lines = paragraph.line_count(body_area.width) as u16;
        self.state.viewport_height = body_area.height;
        self.state.scroll = self.state.scroll.min(self.state.max_scroll());

        frame.render_widget(paragraph.scroll((self.state.scroll, 0)), body_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn result(book: &str, chapter: u32, verse: u32, text: &str) -> SearchResult {
        SearchResult {
            book: book.to_string(),
            chapter,
            verse,
            text: text.to_string(),
        }
    }

    fn finished(results: Vec<SearchResult>) -> FetchState<Vec<SearchResult>> {
        let mut state = FetchState::new();
        let id = state.restart();
        state.complete(id, Ok(results));
        state
    }

    fn render(
        state: &mut SearchPanelState,
        results: &FetchState<Vec<SearchResult>>,
        query: Option<&str>,
    ) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        terminal
            .draw(|f| SearchPanel::new(state, results, query).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_emphasize_is_case_insensitive() {
        let spans = emphasize("O amor é paciente; AMOR tudo sofre", "Amor");
        let marked: Vec<_> = spans
            .iter()
            .filter(|s| s.style.bg == Some(Color::Yellow))
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(marked, vec!["amor", "AMOR"]);
        let joined: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(joined, "O amor é paciente; AMOR tudo sofre");
    }

    #[test]
    fn test_emphasize_escapes_regex_characters() {
        let spans = emphasize("quem? (Jesus)", "(jesus)");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].content, "(Jesus)");
        assert_eq!(emphasize("texto", "  ").len(), 1);
    }

    #[test]
    fn test_submit_emits_query_and_keeps_text() {
        let mut state = SearchPanelState::new();
        for c in "fé".chars() {
            state.handle_event(&TuiEvent::InputChar(c));
        }
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(SearchEvent::Submit("fé".to_string()))
        );
        assert_eq!(state.field.buffer, "fé");
        assert_eq!(state.handle_event(&TuiEvent::Escape), None);
    }

    #[test]
    fn test_result_count_and_reference() {
        let results = finished(vec![
            result("João", 3, 16, "Porque Deus amou o mundo"),
            result("1 Coríntios", 13, 4, "O amor é sofredor"),
        ]);
        let text = render(&mut SearchPanelState::new(), &results, Some("amor"));
        assert!(text.contains("2 resultado(s) para \"amor\""));
        assert!(text.contains("João 3:16"));
        assert!(text.contains("1 Coríntios 13:4"));
    }

    #[test]
    fn test_empty_results_message() {
        let results = finished(Vec::new());
        let text = render(&mut SearchPanelState::new(), &results, Some("xyz"));
        assert!(text.contains("Nenhum resultado encontrado para \"xyz\"."));
    }

    #[test]
    fn test_loading_and_failure() {
        let mut results: FetchState<Vec<SearchResult>> = FetchState::new();
        let id = results.restart();
        assert!(render(&mut SearchPanelState::new(), &results, Some("a")).contains("Pesquisando..."));
        results.complete(id, Err("Falha na pesquisa".to_string()));
        assert!(render(&mut SearchPanelState::new(), &results, Some("a")).contains("Falha na pesquisa"));
    }

    #[test]
    fn test_scroll_is_clamped_to_results() {
        let many = (1..=20)
            .map(|v| result("Salmos", 119, v, "Lâmpada para os meus pés"))
            .collect();
        let results = finished(many);
        let mut state = SearchPanelState::new();
        render(&mut state, &results, Some("pés"));

        state.handle_event(&TuiEvent::ScrollPageDown);
        assert!(state.scroll > 0);
        for _ in 0..100 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        assert_eq!(state.scroll, state.max_scroll());
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.scroll, state.max_scroll() - 1);
    }
}
