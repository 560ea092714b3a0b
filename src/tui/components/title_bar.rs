//! # TitleBar Component
//!
//! Top line of the screen: application name, the four tabs and the model
//! that answers requests.
//!
//! ## Design Decisions
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state, so it is trivial to test:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(ActiveView::Bible, "google/gemini-2.5-flash");
//! title_bar.render(frame, area);
//! ```
//!
//! The model name is right-aligned and gets only the room it needs; on a
//! narrow terminal the tabs win and the model name is cut.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use unicode_width::UnicodeWidthStr;

use crate::core::navigation::ActiveView;
use crate::tui::component::Component;

const APP_NAME: &str = " Bíblia Sagrada ";

pub struct TitleBar<'a> {
    pub active_view: ActiveView,
    pub model_name: &'a str,
}

impl<'a> TitleBar<'a> {
    pub fn new(active_view: ActiveView, model_name: &'a str) -> Self {
        Self {
            active_view,
            model_name,
        }
    }

    fn model_label(&self) -> String {
        format!("modelo: {} ", self.model_name)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let model_label = self.model_label();
        let [name_area, tabs_area, model_area] = Layout::horizontal([
            Constraint::Length(APP_NAME.width() as u16),
            Constraint::Min(0),
            Constraint::Length(model_label.width() as u16),
        ])
        .areas(area);

        frame.render_widget(
            Span::styled(
                APP_NAME,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            name_area,
        );

        let labels = ActiveView::ALL.iter().enumerate().map(|(i, view)| {
            Line::from(format!("{} {}", i + 1, view.label()))
        });
        let selected = ActiveView::ALL
            .iter()
            .position(|view| *view == self.active_view);
        let tabs = Tabs::new(labels)
            .select(selected)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
            .divider("|");
        frame.render_widget(tabs, tabs_area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                model_label,
                Style::default().fg(Color::DarkGray),
            ))
            .right_aligned(),
            model_area,
        );
    }
}
