use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::agents::AgentDirectory;
use crate::core::transcript::{AgentEvent, AgentEventKind, Message, Role};
use crate::tui::components::agent_status::agent_color;
use crate::tui::markdown;

/// Borders (2) + horizontal padding (2).
const HORIZONTAL_OVERHEAD: u16 = 4;
const VERTICAL_OVERHEAD: u16 = 2;

/// Pulse value above which a streaming border turns bold.
const PULSE_BOLD_THRESHOLD: f32 = 0.5;

/// One transcript entry drawn as a bordered card.
///
/// Transient: built each frame from a `&Message` plus presentation flags
/// owned by `MessageListState`. The card body is the markdown-rendered
/// content, followed by an agent-activity disclosure when the message
/// carries agent events. The timestamp sits in the bottom border.
#[derive(Clone, Copy)]
pub struct MessageCard<'a> {
    pub message: &'a Message,
    pub agents: &'a AgentDirectory,
    pub is_selected: bool,
    pub is_hovered: bool,
    /// Activity panel open.
    pub is_expanded: bool,
    /// This is the placeholder currently being streamed into.
    pub is_streaming: bool,
    pub pulse: f32,
}

impl<'a> MessageCard<'a> {
    pub fn new(message: &'a Message, agents: &'a AgentDirectory) -> Self {
        Self {
            message,
            agents,
            is_selected: false,
            is_hovered: false,
            is_expanded: false,
            is_streaming: false,
            pulse: 0.0,
        }
    }

    /// Rendered height at `width`, borders included.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if inner == 0 {
            return 1;
        }
        let lines = Paragraph::new(self.body())
            .wrap(Wrap { trim: false })
            .line_count(inner);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn accent(&self) -> Color {
        match (self.message.role, self.message.is_error) {
            (_, true) => Color::Red,
            (Role::User, false) => Color::Cyan,
            (Role::Assistant, false) => Color::Green,
        }
    }

    fn title(&self) -> &'static str {
        match (self.message.role, self.message.is_error) {
            (Role::User, _) => " You ",
            (Role::Assistant, true) => " Support · error ",
            (Role::Assistant, false) => " Support ",
        }
    }

    fn border_style(&self) -> Style {
        let accent = Style::default().fg(self.accent());
        if self.is_selected {
            return accent.add_modifier(Modifier::BOLD);
        }
        if self.is_streaming && self.pulse > PULSE_BOLD_THRESHOLD {
            return accent.add_modifier(Modifier::BOLD);
        }
        if self.is_hovered || self.is_streaming {
            accent
        } else {
            accent.add_modifier(Modifier::DIM)
        }
    }

    fn body(&self) -> Text<'static> {
        let text_style = if self.message.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };

        let mut text = if self.message.content.trim().is_empty() {
            let filler = if self.is_streaming { "…" } else { "" };
            Text::from(Line::styled(
                filler,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            markdown::render(&self.message.content, text_style)
        };

        if self.message.has_activity() {
            text.lines.push(Line::default());
            text.lines.push(self.disclosure_line());
            if self.is_expanded {
                for event in self.message.agent_events.iter().flatten() {
                    text.lines.extend(self.event_lines(event));
                }
            }
        }
        text
    }

    fn disclosure_line(&self) -> Line<'static> {
        let arrow = if self.is_expanded { "▾" } else { "▸" };
        Line::styled(
            format!(
                "{arrow} View agent activity ({} events)",
                self.message.activity_len()
            ),
            Style::default().fg(Color::DarkGray),
        )
    }

    fn event_lines(&self, event: &AgentEvent) -> Vec<Line<'static>> {
        let profile = self.agents.profile(&event.agent);
        let badge = Span::styled(
            format!("  [{}] ", profile.badge),
            Style::default().fg(agent_color(&profile)),
        );
        let bold = Style::default().add_modifier(Modifier::BOLD);

        match event.kind {
            AgentEventKind::Start => vec![Line::from(vec![
                badge,
                Span::styled(profile.name, bold),
                Span::raw(" started processing"),
            ])],
            AgentEventKind::End => vec![Line::from(vec![
                badge,
                Span::styled(profile.name, bold),
                Span::raw(" finished"),
            ])],
            AgentEventKind::Tool => {
                let tool = event.tool.clone().unwrap_or_default();
                let mut lines = vec![Line::from(vec![
                    Span::styled("  ⚙ ", Style::default().fg(Color::Blue)),
                    Span::styled(tool, bold),
                ])];
                if let Some(input) = &event.input {
                    let json = serde_json::Value::Object(input.clone());
                    if let Ok(pretty) = serde_json::to_string_pretty(&json) {
                        lines.extend(pretty.lines().map(|l| {
                            Line::styled(format!("      {l}"), Style::default().fg(Color::Gray))
                        }));
                    }
                }
                lines
            }
        }
    }
}

impl<'a> Widget for MessageCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = self.border_style();
        let stamp = format!(" {} ", self.message.timestamp.format("%H:%M"));

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Line::styled(self.title(), border))
            .title_bottom(Line::styled(stamp, Style::default().fg(Color::DarkGray)).right_aligned())
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        let body = if self.is_selected {
            Paragraph::new(self.body()).style(Style::default().bg(Color::Black))
        } else {
            Paragraph::new(self.body())
        };
        body.wrap(Wrap { trim: false }).render(inner, buf);
    }
}
