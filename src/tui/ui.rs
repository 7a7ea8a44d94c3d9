use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::landing::LandingView;
use crate::tui::components::{MessageList, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    // Landing view until the first message exists
    if app.transcript.is_empty() {
        LandingView {
            state: &tui.landing,
            prompts: &app.prompts,
            agents: &app.agents,
        }
        .render(frame, main_area);
        tui.message_list.has_unseen_content = false;
    } else {
        MessageList {
            state: &mut tui.message_list,
            messages: app.transcript.messages(),
            agents: &app.agents,
            streaming: app.pending_reply,
            working_agent: app.working_agent(),
            pulse: tui.pulse_value,
            spinner_frame,
        }
        .render(frame, main_area);
    }

    TitleBar {
        conversation_id: app.conversation_id.clone(),
        status_message: app.status_message.clone(),
        backend_online: app.backend_online,
        has_unseen_content: tui.message_list.has_unseen_content,
    }
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}
