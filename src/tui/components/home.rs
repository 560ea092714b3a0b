//! # Home Panel
//!
//! The Início tab: greeting plus the message of the day, with its loading
//! and failure states. Stateless; the fetch state comes in as a prop.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::core::fetch::{FetchState, FetchStatus};
use crate::scripture::DailyMessage;
use crate::tui::component::Component;

pub struct HomePanel<'a> {
    pub daily: &'a FetchState<DailyMessage>,
}

impl<'a> HomePanel<'a> {
    pub fn new(daily: &'a FetchState<DailyMessage>) -> Self {
        Self { daily }
    }

    fn message_lines(&self) -> Vec<Line<'a>> {
        let dim = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        let daily = self.daily;
        match (daily.status(), &daily.data, &daily.error) {
            (FetchStatus::Loading, _, _) | (FetchStatus::Idle, _, _) => {
                vec![Line::from(Span::styled("Carregando mensagem do dia...", dim))]
            }
            (_, _, Some(error)) => vec![
                Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(Span::styled("Pressione r para tentar novamente.", dim)),
            ],
            (_, Some(message), None) => vec![
                Line::from(Span::styled(
                    format!("“{}”", message.text),
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    message.reference.as_str(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
            ],
            (_, None, None) => Vec::new(),
        }
    }
}

impl Component for HomePanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [greeting_area, message_area] =
            Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

        let greeting = Paragraph::new(vec![
            Line::from(Span::styled(
                "Bem-vindo à Bíblia Sagrada",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Leia, destaque e pesquise as Escrituras.",
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::top(1)));
        frame.render_widget(greeting, greeting_area);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Mensagem do Dia ")
            .padding(Padding::uniform(1));
        let message = Paragraph::new(self.message_lines())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(message, message_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(daily: &FetchState<DailyMessage>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 14)).unwrap();
        terminal
            .draw(|f| HomePanel::new(daily).render(f, f.area()))
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
    fn test_loading_state() {
        let mut daily = FetchState::new();
        daily.begin();
        assert!(render(&daily).contains("Carregando mensagem do dia..."));
    }

    #[test]
    fn test_message_is_quoted_with_reference() {
        let mut daily = FetchState::new();
        let id = daily.begin();
        daily.complete(
            id,
            Ok(DailyMessage {
                reference: "Salmos 46:1".to_string(),
                text: "Deus é o nosso refúgio".to_string(),
            }),
        );
        let text = render(&daily);
        assert!(text.contains("“Deus é o nosso refúgio”"));
        assert!(text.contains("Salmos 46:1"));
    }

    #[test]
    fn test_failure_shows_retry_hint() {
        let mut daily: FetchState<DailyMessage> = FetchState::new();
        let id = daily.begin();
        daily.complete(id, Err("Não foi possível carregar".to_string()));
        let text = render(&daily);
        assert!(text.contains("Não foi possível carregar"));
        assert!(text.contains("Pressione r para tentar novamente."));
    }
}
