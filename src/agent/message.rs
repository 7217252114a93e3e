//! Provider-agnostic message types for model calls.
//!
//! Agents, the router, and the RAG chains build [`ChatRequest`]s from these
//! types; providers translate them to their SDK.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tool::{ToolCall, ToolDefinition};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Agent instructions.
    System,
    /// The routed query or prompt.
    User,
    /// Model turn.
    Assistant,
    /// Tool output fed back to the model.
    Tool,
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author.
    pub role: Role,
    /// Text body. Empty for pure tool-call turns.
    pub content: String,
    /// Calls requested in an assistant turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Call answered by a tool turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// JSON schema the model's output must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    /// Schema name reported to the provider (`[a-zA-Z0-9_-]`).
    pub name: String,
    /// JSON schema object.
    pub schema: Value,
}

/// One completion call, independent of the backing SDK.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier, e.g. `"gpt-4o-mini"`.
    pub model: String,
    /// Transcript so far.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature. `Some(0.0)` is sent, not dropped.
    pub temperature: Option<f32>,
    /// Completion token cap.
    pub max_tokens: Option<u32>,
    /// Ask for a bare JSON object.
    pub json_mode: bool,
    /// Constrain output to this schema. Takes precedence over `json_mode`.
    pub output_schema: Option<OutputSchema>,
    /// Tools the model may call this round.
    pub tools: Vec<ToolDefinition>,
}

impl ChatRequest {
    /// Creates a plain request with no sampling overrides or tools.
    #[must_use]
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            json_mode: false,
            output_schema: None,
            tools: Vec::new(),
        }
    }

    /// Sets temperature and completion token limit.
    #[must_use]
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = Some(temperature);
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Token accounting reported by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt side.
    pub prompt_tokens: u32,
    /// Completion side.
    pub completion_tokens: u32,
    /// Sum as reported.
    pub total_tokens: u32,
}

/// What a backend returned for a [`ChatRequest`].
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Answer text, empty when the model only requested tools.
    pub content: String,
    /// Token accounting.
    pub usage: TokenUsage,
    /// Tool calls to run before the next round.
    pub tool_calls: Vec<ToolCall>,
    /// Lowercased stop reason, e.g. `"stop"` or `"toolcalls"`.
    pub finish_reason: Option<String>,
}

impl ChatMessage {
    fn plain(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

/// Creates a system message.
#[must_use]
pub fn system_message(content: &str) -> ChatMessage {
    ChatMessage::plain(Role::System, content)
}

/// Creates a user message.
#[must_use]
pub fn user_message(content: &str) -> ChatMessage {
    ChatMessage::plain(Role::User, content)
}

/// Creates an assistant turn that only requests tool calls.
#[must_use]
pub fn assistant_tool_calls_message(tool_calls: Vec<ToolCall>) -> ChatMessage {
    ChatMessage {
        tool_calls,
        ..ChatMessage::plain(Role::Assistant, "")
    }
}

/// Creates the reply to tool call `tool_call_id`.
#[must_use]
pub fn tool_message(tool_call_id: &str, content: &str) -> ChatMessage {
    ChatMessage {
        tool_call_id: Some(tool_call_id.to_string()),
        ..ChatMessage::plain(Role::Tool, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message() {
        let msg = system_message("You are a logistics assistant.");
        assert_eq!(msg.role, Role::System);
        assert_eq!(msg.content, "You are a logistics assistant.");
        assert!(msg.tool_calls.is_empty());
        assert!(msg.tool_call_id.is_none());
    }

    #[test]
    fn test_user_message() {
        let msg = user_message("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_tool_message() {
        let msg = tool_message("call_123", r#"{"error":"Shipment not found."}"#);
        assert_eq!(msg.role, Role::Tool);
        assert!(msg.content.contains("Shipment not found."));
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_123"));
    }

    #[test]
    fn test_assistant_tool_calls_message() {
        let calls = vec![ToolCall {
            id: "call_1".to_string(),
            name: "shipment-status-lookup".to_string(),
            arguments: r#"{"shipment_id":"S-1"}"#.to_string(),
        }];
        let msg = assistant_tool_calls_message(calls);
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.content.is_empty());
        assert_eq!(msg.tool_calls.len(), 1);
        assert_eq!(msg.tool_calls[0].name, "shipment-status-lookup");
    }

    #[test]
    fn test_new_request_defaults() {
        let req = ChatRequest::new("m", vec![user_message("hi")]);
        assert_eq!(req.model, "m");
        assert!(req.tools.is_empty());
        assert!(req.output_schema.is_none());
        assert!(!req.json_mode);
    }

    #[test]
    fn test_with_sampling() {
        let req = ChatRequest::new("m", Vec::new()).with_sampling(0.0, 512);
        assert_eq!(req.temperature, Some(0.0));
        assert_eq!(req.max_tokens, Some(512));
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::System).unwrap_or_default();
        assert_eq!(json, "\"system\"");

        let json = serde_json::to_string(&Role::Tool).unwrap_or_default();
        assert_eq!(json, "\"tool\"");
    }

    #[test]
    fn test_chat_message_serialization() {
        let msg = user_message("test");
        let json = serde_json::to_string(&msg).unwrap_or_default();
        assert!(json.contains("\"user\""));
        assert!(json.contains("\"test\""));
        assert!(!json.contains("tool_calls"));
        assert!(!json.contains("tool_call_id"));
    }
}
