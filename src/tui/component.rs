use ratatui::Frame;
use ratatui::layout::Rect;

/// Something that draws itself into a region of the frame.
///
/// Components are built fresh each frame from props; anything that must
/// survive between frames lives in a separate state struct the component
/// borrows. `render` takes `&mut self` so that borrowed state (layout
/// caches, scroll offsets) can be updated during the draw.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Turns raw `TuiEvent`s into component-level events.
pub trait EventHandler {
    type Event;

    /// Returns `None` when the event was ignored or produced nothing to report.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
