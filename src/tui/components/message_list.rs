//! # MessageList Component
//!
//! Scrollable transcript: one `MessageCard` per message plus the live
//! agent indicator at the bottom while a reply streams.
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).
//! Rendering updates the layout cache and scroll state in place.
//!
//! Expansion of activity panels is keyed by `MessageId`, so it survives
//! new messages being appended.

use std::collections::HashSet;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::agents::AgentDirectory;
use crate::core::transcript::{Message, MessageId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::agent_status::{AGENT_STATUS_HEIGHT, AgentStatus};
use crate::tui::components::message::MessageCard;
use crate::tui::event::TuiEvent;

/// Trailing messages re-measured every frame (streaming reply, appended error).
const VOLATILE_TAIL: usize = 2;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Message picked with the keyboard in cursor mode.
    pub selected_index: Option<usize>,
    /// Message under the mouse pointer.
    pub hovered_index: Option<usize>,
    /// Messages whose activity panel is open.
    pub expanded: HashSet<MessageId>,
    /// Screen area from the last render (for hit testing).
    pub area: Rect,
    /// Content below the viewport hasn't been seen.
    pub has_unseen_content: bool,
    /// Messages plus live indicator, from the last render.
    canvas_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            selected_index: None,
            hovered_index: None,
            expanded: HashSet::new(),
            area: Rect::default(),
            has_unseen_content: false,
            canvas_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.canvas_height.saturating_sub(self.area.height)
    }

    /// Re-engage auto-scroll once the user scrolls back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        if self.scroll_state.offset().y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }

    /// Opens or closes the activity panel of `id`.
    pub fn toggle(&mut self, id: MessageId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: MessageId) -> bool {
        self.expanded.contains(&id)
    }

    /// Message index at screen row `y`, if the row is inside a message.
    pub fn message_at(&self, y: u16) -> Option<usize> {
        if y < self.area.y || y >= self.area.bottom() {
            return None;
        }
        let content_y = (y - self.area.y).saturating_add(self.scroll_state.offset().y);
        let idx = self.layout.prefix_heights.partition_point(|&end| end <= content_y);
        (idx < self.layout.prefix_heights.len()).then_some(idx)
    }

    pub fn select_previous(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(i) => i.saturating_sub(1).min(count - 1),
            None => count - 1,
        });
        self.scroll_to_selected();
    }

    pub fn select_next(&mut self, count: usize) {
        if let Some(i) = self.selected_index
            && i + 1 < count
        {
            self.selected_index = Some(i + 1);
            self.scroll_to_selected();
        }
    }

    /// Scroll so the selected message is fully visible (top edge wins if it's too tall).
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        let Some(&bottom) = self.layout.prefix_heights.get(idx) else {
            return;
        };
        let top = bottom.saturating_sub(self.layout.heights[idx]);
        let offset = self.scroll_state.offset().y;
        let viewport = self.area.height;

        if top < offset {
            self.scroll_state.set_offset(Position { x: 0, y: top });
            self.stick_to_bottom = false;
        } else if bottom > offset.saturating_add(viewport) {
            let y = bottom.saturating_sub(viewport);
            self.scroll_state.set_offset(Position { x: 0, y });
            self.stick_to_bottom = y >= self.max_offset();
        }
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                self.scroll_state.scroll_to_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub agents: &'a AgentDirectory,
    /// Placeholder being streamed into, if any.
    pub streaming: Option<MessageId>,
    /// Agent shown in the live indicator.
    pub working_agent: Option<&'a str>,
    pub pulse: f32,
    pub spinner_frame: usize,
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(1); // scrollbar column
        let agents = self.agents;
        let streaming = self.streaming;

        let MessageListState { layout, expanded, .. } = &mut *self.state;
        let expanded = &*expanded;
        layout.refresh(self.messages, width, expanded, |msg| MessageCard {
            is_expanded: expanded.contains(&msg.id),
            is_streaming: streaming == Some(msg.id),
            ..MessageCard::new(msg, agents)
        }
        .calculate_height(width));

        let messages_height = self.state.layout.total();
        let canvas_height = canvas_height(messages_height, self.working_agent.is_some());

        self.state.area = area;
        self.state.canvas_height = canvas_height;
        if !self.state.stick_to_bottom {
            let max_y = canvas_height.saturating_sub(area.height);
            let offset = self.state.scroll_state.offset();
            if offset.y > max_y {
                self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
            }
        }

        let mut scroll_view = ScrollView::new(Size::new(width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let offset = self.state.scroll_state.offset().y;
        for i in self.state.layout.visible_range(offset, area.height) {
            let msg = &self.messages[i];
            let height = self.state.layout.heights[i];
            let top = self.state.layout.prefix_heights[i].saturating_sub(height);
            let card = MessageCard {
                is_selected: self.state.selected_index == Some(i),
                is_hovered: self.state.hovered_index == Some(i),
                is_expanded: self.state.expanded.contains(&msg.id),
                is_streaming: self.streaming == Some(msg.id),
                pulse: self.pulse,
                ..MessageCard::new(msg, self.agents)
            };
            scroll_view.render_widget(card, Rect::new(0, top, width, height));
        }

        if let Some(agent) = self.working_agent {
            let status = AgentStatus {
                agent,
                agents: self.agents,
                spinner_frame: self.spinner_frame,
            };
            scroll_view.render_widget(
                status,
                Rect::new(0, messages_height, width, AGENT_STATUS_HEIGHT),
            );
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let max_y = canvas_height.saturating_sub(area.height);
        self.state.has_unseen_content =
            !self.state.stick_to_bottom && self.state.scroll_state.offset().y < max_y;
    }
}

/// Scrollable height: every message plus the live indicator row. Clamped to `u16::MAX`.
fn canvas_height(messages_height: u16, has_indicator: bool) -> u16 {
    if has_indicator {
        messages_height.saturating_add(AGENT_STATUS_HEIGHT)
    } else {
        messages_height
    }
}

/// Cached per-message heights.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    /// Running sum of `heights`: entry `i` is the bottom edge of message `i`.
    pub prefix_heights: Vec<u16>,
    ids: Vec<MessageId>,
    width: u16,
    expanded: HashSet<MessageId>,
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
            ids: Vec::new(),
            width: 0,
            expanded: HashSet::new(),
        }
    }

    pub fn total(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Number of leading cached heights still valid for `messages`.
    pub fn reusable_count(
        &self,
        messages: &[Message],
        width: u16,
        expanded: &HashSet<MessageId>,
    ) -> usize {
        if width != self.width {
            return 0;
        }
        // Prefix of messages we measured before, by identity
        let mut reusable = self
            .ids
            .iter()
            .zip(messages)
            .take_while(|(cached, msg)| **cached == msg.id)
            .count();

        if let Some(first_toggled) = messages
            .iter()
            .position(|m| expanded.contains(&m.id) != self.expanded.contains(&m.id))
        {
            reusable = reusable.min(first_toggled);
        }

        // The tail may have grown since it was measured
        reusable.min(self.ids.len().saturating_sub(VOLATILE_TAIL))
    }

    pub fn refresh(
        &mut self,
        messages: &[Message],
        width: u16,
        expanded: &HashSet<MessageId>,
        measure: impl Fn(&Message) -> u16,
    ) {
        let keep = self.reusable_count(messages, width, expanded);
        self.heights.truncate(keep);
        self.ids.truncate(keep);
        for msg in &messages[keep..] {
            self.heights.push(measure(msg));
            self.ids.push(msg.id);
        }
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
        self.width = width;
        self.expanded = expanded.clone();
    }

    /// Indices of messages intersecting the viewport, with half a screen of margin.
    pub fn visible_range(&self, offset: u16, viewport: u16) -> std::ops::Range<usize> {
        let margin = viewport / 2;
        let from = offset.saturating_sub(margin);
        let to = offset.saturating_add(viewport).saturating_add(margin);
        let start = self.prefix_heights.partition_point(|&end| end <= from);
        let end = self.prefix_heights.partition_point(|&end| end < to) + 1;
        start..end.min(self.prefix_heights.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::AgentEvent;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn measure_lines(msg: &Message) -> u16 {
        msg.content.lines().count().max(1) as u16
    }

    fn transcript(n: usize) -> Vec<Message> {
        (0..n).map(|i| Message::user(format!("message {i}"))).collect()
    }

    fn draw(state: &mut MessageListState, messages: &[Message], agent: Option<&str>) -> String {
        let agents = AgentDirectory::builtin();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| {
                MessageList {
                    state,
                    messages,
                    agents: &agents,
                    streaming: messages.last().map(|m| m.id),
                    working_agent: agent,
                    pulse: 0.0,
                    spinner_frame: 0,
                }
                .render(f, f.area());
            })
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
    fn test_cache_reuses_stable_prefix() {
        let messages = transcript(5);
        let none = HashSet::new();
        let mut cache = LayoutCache::new();
        cache.refresh(&messages, 80, &none, measure_lines);
        assert_eq!(cache.total(), 5);

        assert_eq!(cache.reusable_count(&messages, 80, &none), 5 - VOLATILE_TAIL);
        assert_eq!(cache.reusable_count(&messages, 40, &none), 0);
    }

    #[test]
    fn test_cache_remeasures_grown_tail() {
        let mut messages = transcript(3);
        let none = HashSet::new();
        let mut cache = LayoutCache::new();
        cache.refresh(&messages, 80, &none, measure_lines);

        messages[2].content.push_str("\nmore\nlines");
        cache.refresh(&messages, 80, &none, measure_lines);
        assert_eq!(cache.heights, vec![1, 1, 3]);
        assert_eq!(cache.prefix_heights, vec![1, 2, 5]);
    }

    #[test]
    fn test_cache_invalidates_from_toggled_message() {
        let messages = transcript(6);
        let mut cache = LayoutCache::new();
        cache.refresh(&messages, 80, &HashSet::new(), measure_lines);

        let expanded: HashSet<MessageId> = [messages[1].id].into();
        assert_eq!(cache.reusable_count(&messages, 80, &expanded), 1);
    }

    #[test]
    fn test_message_at_maps_rows_to_indices() {
        let messages = transcript(3);
        let mut state = MessageListState::new();
        state.layout.refresh(&messages, 80, &HashSet::new(), |_| 3);
        state.area = Rect::new(0, 1, 80, 20);

        assert_eq!(state.message_at(0), None); // title bar row
        assert_eq!(state.message_at(1), Some(0));
        assert_eq!(state.message_at(3), Some(0));
        assert_eq!(state.message_at(4), Some(1));
        assert_eq!(state.message_at(9), Some(2));
        assert_eq!(state.message_at(10), None); // below content
    }

    #[test]
    fn test_selection_walks_and_clamps() {
        let mut state = MessageListState::new();
        state.select_next(3);
        assert_eq!(state.selected_index, None);

        state.select_previous(3);
        assert_eq!(state.selected_index, Some(2));
        state.select_previous(3);
        state.select_previous(3);
        state.select_previous(3);
        assert_eq!(state.selected_index, Some(0));
        state.select_next(3);
        assert_eq!(state.selected_index, Some(1));
    }

    #[test]
    fn test_toggle_is_keyed_by_id() {
        let msg = Message::placeholder();
        let mut state = MessageListState::new();
        state.toggle(msg.id);
        assert!(state.is_expanded(msg.id));
        state.toggle(msg.id);
        assert!(!state.is_expanded(msg.id));
    }

    #[test]
    fn test_scroll_up_unpins_and_scroll_to_bottom_repins() {
        let mut state = MessageListState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_render_sticks_to_newest_message() {
        let messages = transcript(10);
        let mut state = MessageListState::new();
        let text = draw(&mut state, &messages, None);
        assert!(text.contains("message 9"));
        assert!(!text.contains("message 0"));
        assert!(!state.has_unseen_content);
    }

    #[test]
    fn test_render_shows_live_indicator_below_messages() {
        let mut messages = transcript(1);
        messages.push(Message::placeholder());
        let mut state = MessageListState::new();
        let text = draw(&mut state, &messages, Some("order_support"));
        assert!(text.contains("Order Support"));
        assert!(text.contains("Looking up order details..."));
    }

    #[test]
    fn test_expanded_panel_renders_events() {
        let mut reply = Message::placeholder();
        reply.content = "Done".into();
        reply.agent_events = Some(vec![AgentEvent::start("triage_agent")]);
        let messages = vec![reply];
        let mut state = MessageListState::new();

        let text = draw(&mut state, &messages, None);
        assert!(text.contains("View agent activity (1 events)"));
        assert!(!text.contains("started processing"));

        state.toggle(messages[0].id);
        let text = draw(&mut state, &messages, None);
        assert!(text.contains("Triage Agent started processing"));
    }

    #[test]
    fn test_unseen_content_after_scrolling_up() {
        let messages = transcript(10);
        let mut state = MessageListState::new();
        draw(&mut state, &messages, None);

        state.handle_event(&TuiEvent::ScrollUp);
        state.handle_event(&TuiEvent::ScrollUp);
        draw(&mut state, &messages, None);
        assert!(state.has_unseen_content);
    }

    #[test]
    fn test_canvas_height_saturates() {
        assert_eq!(canvas_height(10, false), 10);
        assert_eq!(canvas_height(10, true), 10 + AGENT_STATUS_HEIGHT);
        assert_eq!(canvas_height(u16::MAX - 1, true), u16::MAX);
    }

    #[test]
    fn test_saturated_layout_still_selects_and_hit_tests() {
        let messages = transcript(3);
        let mut state = MessageListState::new();
        state
            .layout
            .refresh(&messages, 60, &HashSet::new(), |_| u16::MAX / 2);
        assert_eq!(state.layout.total(), u16::MAX);
        state.area = Rect::new(0, 0, 60, 12);

        state.selected_index = Some(2);
        state.scroll_to_selected();
        assert_eq!(state.scroll_state.offset().y, u16::MAX - 12);
        assert_eq!(state.message_at(11), Some(2));
    }
}
