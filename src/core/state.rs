//! # Application State
//!
//! Core session state. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn ChatBackend>   // support backend
//! ├── transcript: Transcript          // conversation, append-only
//! ├── conversation_id: String         // fixed for the session
//! ├── is_loading: bool                // a turn is in flight
//! ├── active_agent: Option<String>    // agent currently working
//! ├── agent_log: Vec<AgentEvent>      // running log for the current turn
//! ├── pending_reply: Option<MessageId>// placeholder being streamed into
//! ├── status_message: String          // title bar text
//! ├── backend_online: Option<bool>    // health probe result (None = unknown)
//! ├── agents: AgentDirectory          // agent display names
//! └── prompts: Vec<QuickPrompt>       // landing view prompts
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::chat::ChatBackend;
use crate::core::agents::AgentDirectory;
use crate::core::config::ResolvedConfig;
use crate::core::prompts::{QuickPrompt, default_prompts};
use crate::core::transcript::{AgentEvent, MessageId, Transcript};

pub struct App {
    pub backend: Arc<dyn ChatBackend>,
    pub transcript: Transcript,
    pub conversation_id: String,
    pub is_loading: bool,
    pub active_agent: Option<String>,
    /// Agent events observed during the current turn, stamped onto the reply at `done`.
    pub agent_log: Vec<AgentEvent>,
    /// The placeholder assistant message of the turn in flight.
    pub pending_reply: Option<MessageId>,
    pub status_message: String,
    pub backend_online: Option<bool>,
    pub agents: AgentDirectory,
    pub prompts: Vec<QuickPrompt>,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, conversation_id: String) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
            conversation_id,
            is_loading: false,
            active_agent: None,
            agent_log: Vec::new(),
            pending_reply: None,
            status_message: String::from("How can we help?"),
            backend_online: None,
            agents: AgentDirectory::builtin(),
            prompts: default_prompts(),
        }
    }

    pub fn from_config(backend: Arc<dyn ChatBackend>, config: &ResolvedConfig) -> Self {
        Self {
            agents: config.agents.clone(),
            prompts: config.prompts.clone(),
            ..Self::new(backend, config.conversation_id.clone())
        }
    }

    /// Agent to show in the live indicator: only while a turn is streaming.
    pub fn working_agent(&self) -> Option<&str> {
        if self.is_loading {
            self.active_agent.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.transcript.is_empty());
        assert!(!app.is_loading);
        assert!(app.active_agent.is_none());
        assert!(app.pending_reply.is_none());
        assert_eq!(app.conversation_id, "test-session");
        assert_eq!(app.prompts.len(), 4);
    }

    #[test]
    fn test_working_agent_requires_loading() {
        let mut app = test_app();
        app.active_agent = Some("triage_agent".into());
        assert_eq!(app.working_agent(), None);

        app.is_loading = true;
        assert_eq!(app.working_agent(), Some("triage_agent"));

        app.active_agent = None;
        assert_eq!(app.working_agent(), None);
    }
}
