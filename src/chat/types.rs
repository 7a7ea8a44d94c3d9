use serde::{Deserialize, Serialize};

/// Body of the chat POST.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: String,
}

/// One parsed `data: ` record from the response stream.
///
/// Records are tagged by their `type` field. Anything the client doesn't
/// act on lands in [`StreamRecord::Unknown`] and is dropped by the reducer.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamRecord {
    AgentStart {
        agent: String,
    },
    ToolCall {
        tool: String,
        #[serde(default)]
        input: Option<serde_json::Map<String, serde_json::Value>>,
    },
    Content {
        content: String,
    },
    AgentEnd {
        #[serde(default)]
        agent: Option<String>,
    },
    Done,
    #[serde(other)]
    Unknown,
}

impl StreamRecord {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamRecord::AgentStart { .. } => "agent_start",
            StreamRecord::ToolCall { .. } => "tool_call",
            StreamRecord::Content { .. } => "content",
            StreamRecord::AgentEnd { .. } => "agent_end",
            StreamRecord::Done => "done",
            StreamRecord::Unknown => "unknown",
        }
    }
}
