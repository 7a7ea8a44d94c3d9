//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard and mouse events into core::Action values, and
//! performs the effects `update()` asks for (spawning chat turns).
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Streaming** (a turn is in flight): draws every ~80ms so the spinner
//!   and the pulsing border animate.
//! - **Idle**: sleeps up to 500ms, only redraws on events, incoming
//!   actions, or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tokio::task::JoinHandle;

use crate::chat::{ChatBackend, ChatRequest, HttpBackend, StreamRecord};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, LandingEvent, LandingState, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigate messages with arrow keys. Typing auto-switches to Input.
    Cursor,
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub landing: LandingState,
    pub input_mode: InputMode,
    pub pulse_value: f32,
}

impl TuiState {
    pub fn new(prompt_count: usize) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            landing: LandingState::new(prompt_count),
            input_mode: InputMode::Input, // User expects to type immediately
            pulse_value: 0.0,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter; terminals
        // without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn ChatBackend> =
        Arc::new(HttpBackend::new(config.base_url.clone(), config.chat_path.clone()));
    info!(
        "Using {} backend at {}{} (conversation {})",
        backend.name(),
        config.base_url,
        config.chat_path,
        config.conversation_id
    );
    let mut app = App::from_config(backend, &config);
    let mut tui = TuiState::new(app.prompts.len());

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    spawn_health_check(app.backend.clone(), tx.clone());

    let mut terminal = ratatui::init();
    let guard = TerminalModeGuard::new();
    if let Err(e) = &guard {
        warn!("Failed to enable terminal modes: {}", e);
    }

    let result = event_loop(&mut terminal, &mut app, &mut tui, &tx, &rx);

    drop(guard);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
    tx: &mpsc::Sender<Action>,
    rx: &mpsc::Receiver<Action>,
) -> std::io::Result<()> {
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Sync component props with App/TUI state
        tui.input_box.disabled = app.is_loading;
        tui.input_box.dimmed = matches!(tui.input_mode, InputMode::Cursor);
        tui.landing.count = app.prompts.len();

        let animating = app.is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            let spinner_frame = (elapsed * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, app, tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain everything pending before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(app, tui, event, tx) {
                return Ok(());
            }
        }

        // Records and turn results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(app, action, tx) {
                return Ok(());
            }
        }
    }
}

/// Applies one terminal event. Returns true when the app should quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        // Resize just needs a redraw (already flagged)
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => return dispatch(app, Action::Quit, tx),
        TuiEvent::MouseMove(_col, row) => {
            tui.message_list.hovered_index = tui.message_list.message_at(row);
            return false;
        }
        TuiEvent::MouseClick(_col, row) => {
            if let Some(idx) = tui.message_list.message_at(row) {
                toggle_activity(app, tui, idx);
            }
            return false;
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            return false;
        }
        _ => {}
    }

    // Quick prompts: only while nothing has been said or typed yet
    let on_landing = app.transcript.is_empty()
        && tui.input_box.buffer.is_empty()
        && tui.input_mode == InputMode::Input;
    let landing_key = match &event {
        TuiEvent::CursorUp | TuiEvent::CursorDown | TuiEvent::Submit => true,
        TuiEvent::InputChar(c) => c.is_ascii_digit(),
        _ => false,
    };
    if on_landing && landing_key {
        match tui.landing.handle_event(&event) {
            Some(LandingEvent::Choose(i)) => {
                let Some(prompt) = app.prompts.get(i).map(|p| p.prompt.clone()) else {
                    return false;
                };
                info!("Quick prompt {} chosen", i + 1);
                return submit(app, tui, prompt, tx);
            }
            // Digits with no matching prompt are ordinary text
            None if matches!(event, TuiEvent::InputChar(_)) => {}
            None => return false,
        }
    }

    match tui.input_mode {
        InputMode::Input => {
            if matches!(event, TuiEvent::Escape) {
                if !app.transcript.is_empty() {
                    tui.input_mode = InputMode::Cursor;
                    tui.message_list.selected_index = Some(app.transcript.len() - 1);
                    tui.message_list.scroll_to_selected();
                }
                return false;
            }
            if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                return submit(app, tui, text, tx);
            }
        }
        InputMode::Cursor => match event {
            TuiEvent::InputChar(' ') | TuiEvent::Submit => {
                if let Some(idx) = tui.message_list.selected_index {
                    toggle_activity(app, tui, idx);
                }
            }
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                tui.input_mode = InputMode::Input;
                tui.message_list.selected_index = None;
                tui.input_box.handle_event(&event);
            }
            TuiEvent::CursorUp => tui.message_list.select_previous(app.transcript.len()),
            TuiEvent::CursorDown => tui.message_list.select_next(app.transcript.len()),
            _ => {}
        },
    }
    false
}

fn submit(app: &mut App, tui: &mut TuiState, text: String, tx: &mpsc::Sender<Action>) -> bool {
    tui.message_list.stick_to_bottom = true;
    dispatch(app, Action::Submit(text), tx)
}

/// Opens or closes the activity panel of message `idx`, if it has one.
fn toggle_activity(app: &App, tui: &mut TuiState, idx: usize) {
    if let Some(message) = app.transcript.messages().get(idx)
        && message.has_activity()
    {
        tui.message_list.toggle(message.id);
    }
}

/// Runs `update()` and performs the resulting effect. Returns true on quit.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::SpawnRequest(request) => {
            spawn_turn(app.backend.clone(), request, tx.clone());
            false
        }
        Effect::Quit => true,
    }
}

/// Runs one chat turn on the runtime.
///
/// Every record is forwarded as `Action::Record` in arrival order; the
/// turn's outcome (`TurnFinished` or `TurnFailed`) is sent only after the
/// last record.
pub fn spawn_turn(
    backend: Arc<dyn ChatBackend>,
    request: ChatRequest,
    tx: mpsc::Sender<Action>,
) -> JoinHandle<()> {
    info!("Spawning chat turn ({} bytes)", request.message.len());

    tokio::spawn(async move {
        let (record_tx, record_rx) = tokio::sync::mpsc::channel::<StreamRecord>(100);
        let request_start = Instant::now();

        let forward = async {
            let mut record_rx = record_rx;
            let mut forwarded = 0usize;
            while let Some(record) = record_rx.recv().await {
                forwarded += 1;
                debug!("Forwarding record #{}: {}", forwarded, record.kind());
                if tx.send(Action::Record(record)).is_err() {
                    warn!("Failed to forward record: receiver dropped");
                    break;
                }
            }
            forwarded
        };

        let (result, forwarded) = tokio::join!(backend.stream_chat(&request, record_tx), forward);

        let outcome = match result {
            Ok(()) => {
                info!(
                    "Turn finished: {} records in {}ms",
                    forwarded,
                    request_start.elapsed().as_millis()
                );
                Action::TurnFinished
            }
            Err(e) => {
                warn!("Turn failed after {} records: {}", forwarded, e);
                Action::TurnFailed(e.to_string())
            }
        };
        if tx.send(outcome).is_err() {
            warn!("Failed to send turn outcome: receiver dropped");
        }
    })
}

/// Probes the backend once and reports the result as `Action::HealthChecked`.
pub fn spawn_health_check(
    backend: Arc<dyn ChatBackend>,
    tx: mpsc::Sender<Action>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let online = match backend.check_health().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        };
        info!("Backend {}", if online { "online" } else { "offline" });
        if tx.send(Action::HealthChecked(online)).is_err() {
            warn!("Failed to send health result: receiver dropped");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::{AgentEvent, Message, Role};
    use crate::test_support::{ScriptedBackend, test_app};

    fn tx() -> (mpsc::Sender<Action>, mpsc::Receiver<Action>) {
        mpsc::channel()
    }

    fn type_text(app: &mut App, tui: &mut TuiState, text: &str, tx: &mpsc::Sender<Action>) {
        for c in text.chars() {
            handle_event(app, tui, TuiEvent::InputChar(c), tx);
        }
    }

    #[tokio::test]
    async fn test_turn_forwards_records_then_finishes() {
        let records = vec![
            StreamRecord::AgentStart {
                agent: "triage_agent".into(),
            },
            StreamRecord::Content {
                content: "Hello".into(),
            },
            StreamRecord::Done,
        ];
        let (tx, rx) = tx();
        let request = ChatRequest {
            message: "hi".into(),
            conversation_id: "test-session".into(),
        };
        spawn_turn(Arc::new(ScriptedBackend::replaying(records.clone())), request, tx)
            .await
            .unwrap();

        let actions: Vec<Action> = rx.try_iter().collect();
        let mut expected: Vec<Action> = records.into_iter().map(Action::Record).collect();
        expected.push(Action::TurnFinished);
        assert_eq!(actions, expected);
    }

    #[tokio::test]
    async fn test_turn_failure_comes_after_partial_records() {
        let backend = ScriptedBackend {
            records: vec![StreamRecord::Content {
                content: "partial".into(),
            }],
            failure: Some("connection reset".into()),
        };
        let (tx, rx) = tx();
        let request = ChatRequest {
            message: "hi".into(),
            conversation_id: "test-session".into(),
        };
        spawn_turn(Arc::new(backend), request, tx).await.unwrap();

        let actions: Vec<Action> = rx.try_iter().collect();
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::Record(StreamRecord::Content { .. })));
        assert!(matches!(
            &actions[1],
            Action::TurnFailed(reason) if reason.contains("connection reset")
        ));
    }

    #[tokio::test]
    async fn test_health_check_reports_online() {
        let (tx, rx) = tx();
        spawn_health_check(Arc::new(ScriptedBackend::replaying(vec![])), tx)
            .await
            .unwrap();
        assert_eq!(rx.try_recv().unwrap(), Action::HealthChecked(true));
    }

    #[tokio::test]
    async fn test_typed_submit_starts_turn() {
        let mut app = test_app();
        let mut tui = TuiState::new(app.prompts.len());
        let (tx, _rx) = tx();

        type_text(&mut app, &mut tui, "Hello there", &tx);
        assert!(!handle_event(&mut app, &mut tui, TuiEvent::Submit, &tx));

        assert!(app.is_loading);
        assert_eq!(app.transcript.messages()[0].content, "Hello there");
        assert!(tui.input_box.buffer.is_empty());
    }

    #[tokio::test]
    async fn test_digit_on_landing_submits_quick_prompt() {
        let mut app = test_app();
        let mut tui = TuiState::new(app.prompts.len());
        let (tx, _rx) = tx();

        handle_event(&mut app, &mut tui, TuiEvent::InputChar('2'), &tx);

        let first = &app.transcript.messages()[0];
        assert_eq!(first.role, Role::User);
        assert_eq!(first.content, app.prompts[1].prompt);
        assert!(app.is_loading);
    }

    #[tokio::test]
    async fn test_digit_after_typing_is_text() {
        let mut app = test_app();
        let mut tui = TuiState::new(app.prompts.len());
        let (tx, _rx) = tx();

        type_text(&mut app, &mut tui, "ORD-2", &tx);
        assert!(app.transcript.is_empty());
        assert_eq!(tui.input_box.buffer, "ORD-2");
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = test_app();
        let mut tui = TuiState::new(app.prompts.len());
        let (tx, _rx) = tx();
        assert!(handle_event(&mut app, &mut tui, TuiEvent::ForceQuit, &tx));
    }

    #[test]
    fn test_cursor_mode_toggles_activity_panel() {
        let mut app = test_app();
        let mut tui = TuiState::new(app.prompts.len());
        let (tx, _rx) = tx();

        app.transcript.push(Message::user("hi"));
        let mut reply = Message::placeholder();
        reply.content = "Hello".into();
        reply.agent_events = Some(vec![AgentEvent::start("triage_agent")]);
        let reply_id = app.transcript.push(reply);
        let before = app.transcript.clone();

        handle_event(&mut app, &mut tui, TuiEvent::Escape, &tx);
        assert_eq!(tui.input_mode, InputMode::Cursor);
        assert_eq!(tui.message_list.selected_index, Some(1));

        handle_event(&mut app, &mut tui, TuiEvent::InputChar(' '), &tx);
        assert!(tui.message_list.is_expanded(reply_id));
        handle_event(&mut app, &mut tui, TuiEvent::Submit, &tx);
        assert!(!tui.message_list.is_expanded(reply_id));

        // User messages have no panel
        handle_event(&mut app, &mut tui, TuiEvent::CursorUp, &tx);
        handle_event(&mut app, &mut tui, TuiEvent::InputChar(' '), &tx);
        assert!(tui.message_list.expanded.is_empty());

        // Panels are presentation only
        assert_eq!(app.transcript, before);
        assert!(!app.is_loading);

        // Typing returns to the input box
        handle_event(&mut app, &mut tui, TuiEvent::InputChar('x'), &tx);
        assert_eq!(tui.input_mode, InputMode::Input);
        assert_eq!(tui.input_box.buffer, "x");
        assert_eq!(tui.message_list.selected_index, None);
    }

    #[test]
    fn test_input_is_locked_while_loading() {
        let mut app = test_app();
        let mut tui = TuiState::new(app.prompts.len());
        let (tx, _rx) = tx();
        app.transcript.push(Message::user("first"));
        app.is_loading = true;
        tui.input_box.disabled = true;

        type_text(&mut app, &mut tui, "second", &tx);
        handle_event(&mut app, &mut tui, TuiEvent::Submit, &tx);
        assert_eq!(app.transcript.len(), 1);
    }
}
