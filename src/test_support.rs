//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::chat::{ChatBackend, ChatError, ChatRequest, StreamRecord};
use crate::core::state::App;

/// Backend that replays a fixed list of records, then optionally fails.
pub struct ScriptedBackend {
    pub records: Vec<StreamRecord>,
    pub failure: Option<String>,
}

impl ScriptedBackend {
    pub fn replaying(records: Vec<StreamRecord>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_chat(
        &self,
        _request: &ChatRequest,
        sender: Sender<StreamRecord>,
    ) -> Result<(), ChatError> {
        for record in &self.records {
            sender
                .send(record.clone())
                .await
                .map_err(|_| ChatError::ChannelClosed)?;
        }
        match &self.failure {
            Some(message) => Err(ChatError::Network(message.clone())),
            None => Ok(()),
        }
    }
}

/// Creates a test App with an empty scripted backend.
pub fn test_app() -> App {
    App::new(
        Arc::new(ScriptedBackend::replaying(Vec::new())),
        "test-session".to_string(),
    )
}
