//! # AgentStatus Component
//!
//! The "agent is working" row shown under the transcript while a reply
//! streams and the backend has announced an active agent.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::agents::{AgentDirectory, AgentProfile};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Name line + description line + borders.
pub const AGENT_STATUS_HEIGHT: u16 = 4;

/// Accent color for an agent. Names ratatui can't parse render gray.
pub fn agent_color(profile: &AgentProfile) -> Color {
    profile.color.parse().unwrap_or(Color::Gray)
}

#[derive(Clone, Copy)]
pub struct AgentStatus<'a> {
    pub agent: &'a str,
    pub agents: &'a AgentDirectory,
    pub spinner_frame: usize,
}

impl Widget for AgentStatus<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let profile = self.agents.profile(self.agent);
        let color = agent_color(&profile);
        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];

        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{spinner} "), Style::default().fg(color)),
                Span::styled(
                    format!("[{}] ", profile.badge),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(profile.name, Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::styled(
                format!("  {}", profile.description),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color).add_modifier(Modifier::DIM))
                    .padding(Padding::horizontal(1)),
            )
            .render(area, buf);
    }
}
