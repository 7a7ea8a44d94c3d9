//! # Landing View
//!
//! Shown in place of the transcript while it is empty: a welcome blurb,
//! numbered quick prompts, and the agent legend. Choosing a prompt sends
//! it exactly as if it had been typed.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::agents::AgentDirectory;
use crate::core::prompts::QuickPrompt;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::agent_status::agent_color;
use crate::tui::event::TuiEvent;

const TITLE: &str = "Welcome to AI Customer Support";
const BLURB: &str = "I'm here to help with product questions, order status, returns, and more. \
Our agents work together to give you the best answer.";
const HINT: &str = "↑/↓ select · Enter or 1-9 to ask · or just type";
/// Widest the landing content gets, in columns.
const MAX_WIDTH: u16 = 72;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandingEvent {
    /// Index into the prompt list.
    Choose(usize),
}

/// Highlighted prompt. Persisted in `TuiState`.
#[derive(Debug, Default)]
pub struct LandingState {
    pub selected: usize,
    /// Number of prompts on offer, refreshed by the event loop.
    pub count: usize,
}

impl LandingState {
    pub fn new(count: usize) -> Self {
        Self { selected: 0, count }
    }
}

impl EventHandler for LandingState {
    type Event = LandingEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<LandingEvent> {
        if self.count == 0 {
            return None;
        }
        match event {
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                self.selected = (self.selected + 1).min(self.count - 1);
                None
            }
            TuiEvent::Submit => Some(LandingEvent::Choose(self.selected.min(self.count - 1))),
            TuiEvent::InputChar(c) => {
                let n = c.to_digit(10)? as usize;
                (1..=self.count).contains(&n).then(|| {
                    self.selected = n - 1;
                    LandingEvent::Choose(n - 1)
                })
            }
            _ => None,
        }
    }
}

pub struct LandingView<'a> {
    pub state: &'a LandingState,
    pub prompts: &'a [QuickPrompt],
    pub agents: &'a AgentDirectory,
}

impl LandingView<'_> {
    fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let wrap_width = width.saturating_sub(4).max(10) as usize;
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = vec![
            Line::styled(
                TITLE,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::default(),
        ];
        lines.extend(
            textwrap::wrap(BLURB, wrap_width)
                .into_iter()
                .map(|l| Line::styled(l.into_owned(), Style::default().fg(Color::Gray))),
        );
        lines.push(Line::default());

        for (i, prompt) in self.prompts.iter().enumerate() {
            let selected = i == self.state.selected;
            let (marker, label_style) = if selected {
                (
                    "▶ ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().add_modifier(Modifier::BOLD))
            };
            lines.push(Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{}. ", i + 1), dim),
                Span::styled(prompt.label.clone(), label_style),
            ]));
            for part in textwrap::wrap(&prompt.prompt, wrap_width.saturating_sub(5).max(10)) {
                lines.push(Line::styled(format!("     {part}"), dim));
            }
        }

        lines.push(Line::default());
        let mut legend = Vec::new();
        for (_, profile) in self.agents.legend() {
            if !legend.is_empty() {
                legend.push(Span::raw("   "));
            }
            legend.push(Span::styled("● ", Style::default().fg(agent_color(profile))));
            legend.push(Span::styled(profile.name.clone(), dim));
        }
        lines.push(Line::from(legend));
        lines.push(Line::default());
        lines.push(Line::styled(HINT, dim.add_modifier(Modifier::ITALIC)));
        lines
    }
}

impl Component for LandingView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.min(MAX_WIDTH);
        let lines = self.lines(width);
        let height = (lines.len() as u16).min(area.height);

        let [column] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [block] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(column);

        let paragraph = Paragraph::new(lines).alignment(Alignment::Left);
        frame.render_widget(paragraph, block);
    }
}
