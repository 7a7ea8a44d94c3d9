//! # TitleBar Component
//!
//! One-line header: app title, conversation id, status message, backend
//! health, and a "↓ New" marker when unseen content sits below the
//! viewport. Purely presentational; every field is a prop.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub const APP_TITLE: &str = "AI Customer Support";

pub struct TitleBar {
    pub conversation_id: String,
    pub status_message: String,
    /// `None` until the health probe answers.
    pub backend_online: Option<bool>,
    pub has_unseen_content: bool,
}

impl TitleBar {
    fn line(&self) -> Line<'static> {
        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![
            Span::styled(APP_TITLE, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" ({})", self.conversation_id),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        if !self.status_message.is_empty() {
            spans.push(sep());
            spans.push(Span::raw(self.status_message.clone()));
        }

        let health = match self.backend_online {
            Some(true) => Some(Span::styled("backend: online", Style::default().fg(Color::Green))),
            Some(false) => Some(Span::styled("backend: offline", Style::default().fg(Color::Red))),
            None => None,
        };
        if let Some(health) = health {
            spans.push(sep());
            spans.push(health);
        }

        if self.has_unseen_content {
            spans.push(sep());
            spans.push(Span::styled(
                "↓ New",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}
