//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::{Value, json};

use crate::agent::{InvokeResponse, ToolDefinition, ToolResult};
use crate::core::AgentKind;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format name; anything other than `json` is text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Serializes `value` as pretty JSON.
    #[must_use]
    pub fn to_json<T: Serialize + ?Sized>(self, value: &T) -> String {
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| json!({ "error": format!("serialization failed: {e}") }).to_string())
    }
}

/// Formats a graph answer.
#[must_use]
pub fn format_answer(response: &InvokeResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{}\n", response.response),
        OutputFormat::Json => format.to_json(response),
    }
}

/// Formats a routing decision.
#[must_use]
pub fn format_route(query: &str, agent: AgentKind, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{agent}\n"),
        OutputFormat::Json => format.to_json(&json!({ "query": query, "agent_name": agent })),
    }
}

/// Formats the tool registry.
#[must_use]
pub fn format_tool_list(tools: &[ToolDefinition], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for tool in tools {
                let _ = writeln!(out, "{}", tool.name);
                let _ = writeln!(out, "    {}", tool.description);
            }
            out
        }
        OutputFormat::Json => format.to_json(tools),
    }
}

/// Formats a direct tool call result.
///
/// The payload is always JSON; text mode prints it as-is.
#[must_use]
pub fn format_tool_result(name: &str, result: &ToolResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{}\n", result.content),
        OutputFormat::Json => {
            let payload: Value = serde_json::from_str(&result.content)
                .unwrap_or_else(|_| Value::String(result.content.clone()));
            format.to_json(&json!({
                "tool": name,
                "is_error": result.is_error,
                "result": payload,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ToolSet;

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("yaml"), OutputFormat::Text);
    }

    #[test]
    fn test_format_answer_json() {
        let response = InvokeResponse {
            response: "Cost response: $20.0".to_string(),
            agent: AgentKind::Cost,
        };
        let out = format_answer(&response, OutputFormat::Json);
        let value: Value = serde_json::from_str(&out).unwrap_or_default();
        assert_eq!(value["agent"], "cost");
        assert_eq!(value["response"], "Cost response: $20.0");
    }

    #[test]
    fn test_format_tool_list_text() {
        let out = format_tool_list(ToolSet::all().definitions(), OutputFormat::Text);
        assert!(out.contains("packaging-optimizer\n"));
        assert!(out.contains("order-details-lookup\n"));
    }

    #[test]
    fn test_format_tool_result_json_embeds_payload() {
        let result = ToolResult {
            tool_call_id: "cli".to_string(),
            content: r#"{"error":"Shipment not found."}"#.to_string(),
            is_error: true,
        };
        let out = format_tool_result("shipment-status-lookup", &result, OutputFormat::Json);
        let value: Value = serde_json::from_str(&out).unwrap_or_default();
        assert_eq!(value["is_error"], true);
        assert_eq!(value["result"]["error"], "Shipment not found.");
    }
}
