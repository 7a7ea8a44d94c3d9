use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use super::types::{ChatRequest, StreamRecord};

/// Errors that can occur while talking to the support backend.
///
/// The UI folds every variant into the same apology message; the detail
/// only reaches the log.
#[derive(Debug)]
pub enum ChatError {
    /// Backend misconfigured (bad URL). Not retryable.
    Config(String),
    /// Network-level failure (DNS, connection refused, body read). Retryable by resubmitting.
    Network(String),
    /// Backend returned a non-success status.
    Api { status: u16, message: String },
    /// The record channel was closed (UI dropped the receiver).
    ChannelClosed,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Config(msg) => write!(f, "config error: {msg}"),
            ChatError::Network(msg) => write!(f, "network error: {msg}"),
            ChatError::Api { status, message } => {
                write!(f, "backend error (HTTP {status}): {message}")
            }
            ChatError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ChatError {}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns the name of the backend, for logs.
    fn name(&self) -> &str;

    /// Sends one chat turn and streams parsed records to `sender` as they arrive.
    ///
    /// Returns once the response body is exhausted. The sender is dropped on
    /// return, which closes the receiving side.
    async fn stream_chat(
        &self,
        request: &ChatRequest,
        sender: Sender<StreamRecord>,
    ) -> Result<(), ChatError>;

    /// Probes backend liveness. Backends without a probe report healthy.
    async fn check_health(&self) -> Result<(), ChatError> {
        Ok(())
    }
}
