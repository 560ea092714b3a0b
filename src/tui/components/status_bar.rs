//! # StatusBar Component
//!
//! Bottom line: the latest status message on the left, key hints for the
//! active panel on the right.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::core::navigation::ActiveView;
use crate::tui::component::Component;

pub struct StatusBar<'a> {
    pub active_view: ActiveView,
    pub status_message: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(active_view: ActiveView, status_message: &'a str) -> Self {
        Self {
            active_view,
            status_message,
        }
    }
}

/// Key hints shown for each panel.
pub fn key_hints(view: ActiveView) -> &'static str {
    match view {
        ActiveView::Home => "r tentar novamente · Tab painel · Esc sair",
        ActiveView::Bible => {
            "←/→ capítulo · ↑/↓ versículo · Espaço destacar · b livro · c capítulo · v ir para · x limpar · Esc sair"
        }
        ActiveView::Search => "Enter pesquisar · ↑/↓ rolar · Tab painel · Esc sair",
        ActiveView::Doctrine => "Tab painel · Esc sair",
    }
}

impl Component for StatusBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let hints = key_hints(self.active_view);
        let [status_area, hints_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(hints.width() as u16 + 1),
        ])
        .areas(area);

        frame.render_widget(
            Span::styled(
                format!(" {}", self.status_message),
                Style::default().fg(Color::Green),
            ),
            status_area,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray)))
                .right_aligned(),
            hints_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_status_bar_shows_message_and_hints() {
        let backend = TestBackend::new(160, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut bar = StatusBar::new(ActiveView::Home, "Destaques do capítulo removidos");
        terminal.draw(|f| bar.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Destaques do capítulo removidos"));
        assert!(text.contains("r tentar novamente"));
    }

    #[test]
    fn test_bible_hints_mention_every_reader_key() {
        let hints = key_hints(ActiveView::Bible);
        for key in ["b livro", "c capítulo", "v ir para", "x limpar"] {
            assert!(hints.contains(key), "missing {key}");
        }
    }
}
