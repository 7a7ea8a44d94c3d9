//! HTTP backend: POSTs a chat turn and decodes the streamed response.

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::mpsc::Sender;

use super::backend::{ChatBackend, ChatError};
use super::stream::RecordDecoder;
use super::types::{ChatRequest, StreamRecord};

/// Liveness endpoint, relative to the base URL.
pub const HEALTH_PATH: &str = "/health";

pub struct HttpBackend {
    base_url: String,
    chat_path: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, chat_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chat_path: chat_path.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub fn chat_url(&self) -> String {
        self.url(&self.chat_path)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn stream_chat(
        &self,
        request: &ChatRequest,
        sender: Sender<StreamRecord>,
    ) -> Result<(), ChatError> {
        let url = self.chat_url();
        info!(
            "Chat request: url={}, conversation_id={}, message_len={}",
            url,
            request.conversation_id,
            request.message.len()
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    ChatError::Config(e.to_string())
                } else {
                    ChatError::Network(e.to_string())
                }
            })?;

        debug!("Chat response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Backend error: {} - {}", status, message);
            return Err(ChatError::Api { status, message });
        }

        let mut decoder = RecordDecoder::new();
        let mut bytes = response.bytes_stream();
        let mut chunk_count = 0usize;
        let mut record_count = 0usize;

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| ChatError::Network(e.to_string()))?;
            chunk_count += 1;
            debug!("Raw chunk received: {} bytes", chunk.len());

            for record in decoder.push(&chunk) {
                record_count += 1;
                debug!("Record #{}: {}", record_count, record.kind());
                if sender.send(record).await.is_err() {
                    warn!("Record send failed: receiver dropped");
                    return Err(ChatError::ChannelClosed);
                }
            }
        }

        if let Some(record) = decoder.finish() {
            record_count += 1;
            debug!("Record #{} (unterminated): {}", record_count, record.kind());
            if sender.send(record).await.is_err() {
                return Err(ChatError::ChannelClosed);
            }
        }

        info!(
            "Stream ended: {} chunks, {} records",
            chunk_count, record_count
        );
        Ok(())
    }

    async fn check_health(&self) -> Result<(), ChatError> {
        let url = self.url(HEALTH_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if response.status().is_success() {
            debug!("Health check ok: {}", url);
            Ok(())
        } else {
            let status = response.status().as_u16();
            Err(ChatError::Api {
                status,
                message: format!("health check failed at {url}"),
            })
        }
    }
}
