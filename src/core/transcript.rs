//! # Transcript Model
//!
//! The conversation as the user sees it: an ordered list of [`Message`]s,
//! where assistant messages may carry the [`AgentEvent`]s observed while
//! they were being produced.
//!
//! Pure data. The only behavior here is construction and append.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Apology shown when a turn fails at the transport level.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Agent name recorded for tool calls that arrive before any agent started.
pub const UNKNOWN_AGENT: &str = "unknown";

/// Opaque, unique message identifier. Random, never derived from the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentEventKind {
    /// An agent became active.
    Start,
    /// An agent invoked a tool.
    Tool,
    /// An agent finished. Renderable, but the controller never records it.
    End,
}

/// One observation about agent execution during a single assistant turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentEvent {
    #[serde(rename = "type")]
    pub kind: AgentEventKind,
    pub agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    pub timestamp: DateTime<Local>,
}

impl AgentEvent {
    pub fn start(agent: impl Into<String>) -> Self {
        Self {
            kind: AgentEventKind::Start,
            agent: agent.into(),
            tool: None,
            input: None,
            output: None,
            timestamp: Local::now(),
        }
    }

    pub fn tool(
        agent: impl Into<String>,
        tool: impl Into<String>,
        input: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Self {
        Self {
            kind: AgentEventKind::Tool,
            agent: agent.into(),
            tool: Some(tool.into()),
            input,
            output: None,
            timestamp: Local::now(),
        }
    }
}

/// One transcript entry. Lives only in memory for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
    /// Stamped onto assistant messages once their turn completes.
    pub agent_events: Option<Vec<AgentEvent>>,
    pub is_error: bool,
}

impl Message {
    fn new(role: Role, content: String) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            timestamp: Local::now(),
            agent_events: None,
            is_error: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into())
    }

    /// The empty assistant slot created at turn start and filled as content streams in.
    pub fn placeholder() -> Self {
        Self::new(Role::Assistant, String::new())
    }

    pub fn error_reply() -> Self {
        Self {
            is_error: true,
            ..Self::new(Role::Assistant, ERROR_REPLY.to_string())
        }
    }

    /// Number of agent events attached (0 when none were stamped).
    pub fn activity_len(&self) -> usize {
        self.agent_events.as_ref().map_or(0, Vec::len)
    }

    pub fn has_activity(&self) -> bool {
        self.activity_len() > 0
    }
}

/// Ordered, append-only list of messages for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) -> MessageId {
        let id = message.id;
        self.messages.push(message);
        id
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        // Newest first: the message being streamed into is almost always last.
        self.messages.iter_mut().rev().find(|m| m.id == id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
