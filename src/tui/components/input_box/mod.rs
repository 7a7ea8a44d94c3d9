//! # InputBox Component
//!
//! Multi-line message editor under the transcript.
//!
//! - Enter submits the trimmed buffer (if non-blank) and clears it
//! - Shift+Enter / Ctrl+J insert a newline
//! - Grows to `MAX_VISIBLE_LINES` rows, then scrolls internally
//! - While `disabled` (a reply is streaming) every edit is inert
//!
//! The buffer is internal state; `disabled` and `dimmed` are props set by
//! the event loop each frame.

mod cursor;
mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
pub use layout::MAX_VISIBLE_LINES;

const PLACEHOLDER: &str = "Type your message...";
const HINT: &str = " Enter send · Shift+Enter newline ";

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Trimmed, non-empty text to send.
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// A turn is in flight; input is locked.
    pub disabled: bool,
    /// Focus is on the transcript (cursor mode).
    pub dimmed: bool,
    cursor: CursorState,
    /// Area width from the last render, for row-based movement.
    last_width: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            dimmed: false,
            cursor: CursorState::new(),
            last_width: 80,
        }
    }

    pub fn calculate_height(&self, area_width: u16) -> u16 {
        layout::box_height(&self.buffer, area_width)
    }

    fn text_width(&self) -> usize {
        layout::text_width(self.last_width)
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
        Some(InputEvent::ContentChanged)
    }

    fn visible_lines(&self, area_width: u16) -> Vec<Line<'static>> {
        layout::rows(&self.buffer, layout::text_width(area_width))
            .into_iter()
            .skip(self.cursor.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(|row| Line::raw(self.buffer[row.start..row.end].to_string()))
            .collect()
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let total = layout::rows(&self.buffer, layout::text_width(area.width)).len();
        let overflow = total.saturating_sub(MAX_VISIBLE_LINES as usize);
        if overflow == 0 {
            return;
        }
        let mut state = ScrollbarState::new(overflow).position(self.cursor.scroll_offset as usize);
        let track = Rect {
            x: area.right().saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            track,
            &mut state,
        );
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        self.cursor.follow(&self.buffer, layout::text_width(area.width));

        let (title, border) = if self.disabled {
            (" Waiting for reply... ", Style::default().fg(Color::DarkGray))
        } else if self.dimmed {
            (" Message ", Style::default().add_modifier(Modifier::DIM))
        } else {
            (" Message ", Style::default().fg(Color::Cyan))
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(title)
            .title_bottom(Line::from(HINT).right_aligned())
            .padding(Padding::horizontal(1));

        let body = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
        } else {
            let style = if self.disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Paragraph::new(self.visible_lines(area.width)).style(style)
        };

        frame.render_widget(body.block(block), area);
        self.render_scrollbar(frame, area);

        if !self.disabled && !self.dimmed {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        let width = self.text_width();
        let changed = |moved: bool| moved.then_some(InputEvent::ContentChanged);

        match event {
            TuiEvent::InputChar(c) => {
                let mut utf8 = [0; 4];
                self.insert(c.encode_utf8(&mut utf8))
            }
            TuiEvent::Paste(text) => {
                // Normalize CRLF so pasted Windows text doesn't leave stray \r
                let text = text.replace("\r\n", "\n");
                self.insert(&text)
            }
            TuiEvent::Backspace => {
                let range = self.cursor.char_before(&self.buffer)?;
                self.cursor.pos = range.start;
                self.buffer.replace_range(range, "");
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                let range = self.cursor.char_at(&self.buffer)?;
                self.buffer.replace_range(range, "");
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => changed(self.cursor.left(&self.buffer)),
            TuiEvent::CursorRight => changed(self.cursor.right(&self.buffer)),
            TuiEvent::CursorUp => changed(self.cursor.vertical(&self.buffer, width, -1)),
            TuiEvent::CursorDown => changed(self.cursor.vertical(&self.buffer, width, 1)),
            TuiEvent::CursorHome => changed(self.cursor.row_edge(&self.buffer, width, false)),
            TuiEvent::CursorEnd => changed(self.cursor.row_edge(&self.buffer, width, true)),
            TuiEvent::Submit => {
                let text = self.buffer.trim();
                if text.is_empty() {
                    return None;
                }
                let text = text.to_string();
                self.buffer.clear();
                self.cursor.reset();
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(input: &mut InputBox, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = InputBox::new();
        type_text(&mut input, "héllo");
        assert_eq!(input.buffer, "héllo");

        assert_eq!(
            input.handle_event(&TuiEvent::Backspace),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "héll");
    }

    #[test]
    fn test_submit_trims_and_clears() {
        let mut input = InputBox::new();
        type_text(&mut input, "  where is my order?  ");

        let res = input.handle_event(&TuiEvent::Submit);
        assert_eq!(res, Some(InputEvent::Submit("where is my order?".into())));
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn test_blank_submit_keeps_buffer() {
        let mut input = InputBox::new();
        type_text(&mut input, " \n ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, " \n ");
    }

    #[test]
    fn test_newline_then_submit_keeps_inner_newline() {
        let mut input = InputBox::new();
        type_text(&mut input, "line one");
        input.handle_event(&TuiEvent::InputChar('\n'));
        type_text(&mut input, "line two");

        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("line one\nline two".into()))
        );
    }

    #[test]
    fn test_disabled_ignores_everything() {
        let mut input = InputBox::new();
        type_text(&mut input, "draft");
        input.disabled = true;

        assert_eq!(input.handle_event(&TuiEvent::InputChar('x')), None);
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "draft");
    }

    #[test]
    fn test_insert_in_middle_and_delete() {
        let mut input = InputBox::new();
        type_text(&mut input, "ac");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.buffer, "abc");

        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "bc");
        assert_eq!(input.handle_event(&TuiEvent::CursorLeft), None);
    }

    #[test]
    fn test_paste_normalizes_crlf() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("a\r\nb".into()));
        assert_eq!(input.buffer, "a\nb");
    }

    #[test]
    fn test_height_grows_then_caps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(40), 3);
        type_text(&mut input, "1\n2\n3");
        assert_eq!(input.calculate_height(40), 5);
        type_text(&mut input, "\n4\n5\n6\n7\n8");
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES + 2);
    }

    #[test]
    fn test_render_placeholder_and_disabled_title() {
        let mut terminal = Terminal::new(TestBackend::new(50, 3)).unwrap();
        let mut input = InputBox::new();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        assert!(screen_text(&terminal).contains("Type your message..."));

        input.disabled = true;
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        assert!(screen_text(&terminal).contains("Waiting for reply"));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let mut terminal = Terminal::new(TestBackend::new(40, 7)).unwrap();
        let mut input = InputBox::new();
        type_text(&mut input, "one\ntwo\nthree\nfour\nfive\nsix\nseven");
        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("seven"));
        assert!(!text.contains("one"));
    }
}
