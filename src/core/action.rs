//! # Actions
//!
//! Everything that can happen in a session becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! A stream record arrives? That's `Action::Record(record)`.
//!
//! The `update()` function applies an action to the state and returns the
//! `Effect` the adapter must perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## Turn lifecycle
//!
//! ```text
//! Submit ──► user msg + placeholder ──► Effect::SpawnRequest
//!              │
//!              ▼
//!   Record(agent_start | tool_call | content | agent_end | done)*
//!              │
//!              ▼
//!   TurnFinished | TurnFailed ──► loading cleared, active agent cleared
//! ```
//!
//! Only one turn is in flight at a time: a `Submit` while loading is rejected.

use log::{debug, info, warn};

use crate::chat::{ChatRequest, StreamRecord};
use crate::core::state::App;
use crate::core::transcript::{AgentEvent, Message, UNKNOWN_AGENT};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// User (or a landing prompt) submitted text.
    Submit(String),
    /// One parsed record from the response stream.
    Record(StreamRecord),
    /// The response body was read to the end.
    TurnFinished,
    /// The request or body read failed; carries the reason for the log.
    TurnFailed(String),
    /// Result of the startup health probe.
    HealthChecked(bool),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Start the network request for a new turn.
    SpawnRequest(ChatRequest),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, &text),
        Action::Record(record) => {
            apply_record(app, record);
            Effect::None
        }
        Action::TurnFinished => {
            info!("Turn finished");
            finish_turn(app);
            Effect::None
        }
        Action::TurnFailed(reason) => {
            warn!("Turn failed: {}", reason);
            if app.is_loading {
                // The placeholder stays as-is; the apology is a separate entry.
                app.transcript.push(Message::error_reply());
                app.status_message = String::from("Request failed");
            }
            finish_turn(app);
            Effect::None
        }
        Action::HealthChecked(online) => {
            app.backend_online = Some(online);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: &str) -> Effect {
    let content = text.trim();
    if content.is_empty() {
        return Effect::None;
    }
    if app.is_loading {
        debug!("Submit rejected: a turn is already in flight");
        app.status_message = String::from("Still answering, please wait");
        return Effect::None;
    }

    app.transcript.push(Message::user(content));

    app.is_loading = true;
    app.agent_log.clear();
    app.active_agent = None;
    app.pending_reply = Some(app.transcript.push(Message::placeholder()));
    app.status_message = String::from("Sending...");

    info!("Submitting turn ({} chars)", content.len());
    Effect::SpawnRequest(ChatRequest {
        message: content.to_string(),
        conversation_id: app.conversation_id.clone(),
    })
}

fn apply_record(app: &mut App, record: StreamRecord) {
    let Some(reply_id) = app.pending_reply.filter(|_| app.is_loading) else {
        debug!("Ignoring {} record: no turn in flight", record.kind());
        return;
    };

    match record {
        StreamRecord::AgentStart { agent } => {
            debug!("Agent started: {}", agent);
            app.agent_log.push(AgentEvent::start(agent.clone()));
            app.status_message = format!("{} is working", app.agents.display_name(&agent));
            app.active_agent = Some(agent);
        }
        StreamRecord::ToolCall { tool, input } => {
            let agent = app.active_agent.as_deref().unwrap_or(UNKNOWN_AGENT);
            debug!("Tool call: {} by {}", tool, agent);
            app.agent_log.push(AgentEvent::tool(agent, tool, input));
        }
        StreamRecord::Content { content } => {
            if let Some(reply) = app.transcript.get_mut(reply_id) {
                reply.content.push_str(&content);
            }
        }
        StreamRecord::AgentEnd { .. } => {
            app.active_agent = None;
        }
        StreamRecord::Done => {
            if let Some(reply) = app.transcript.get_mut(reply_id) {
                reply.agent_events = Some(app.agent_log.clone());
            }
            debug!("Stamped {} agent events onto reply", app.agent_log.len());
        }
        StreamRecord::Unknown => {
            debug!("Ignoring unrecognized record type");
        }
    }
}

fn finish_turn(app: &mut App) {
    if app.is_loading && app.status_message != "Request failed" {
        app.status_message.clear();
    }
    app.is_loading = false;
    app.active_agent = None;
    app.pending_reply = None;
}
