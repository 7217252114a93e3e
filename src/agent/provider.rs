//! Pluggable LLM provider trait.
//!
//! Implementations translate provider-agnostic [`ChatRequest`]/[`ChatResponse`]
//! into provider-specific SDK calls, so routing and agent logic never touch
//! a vendor SDK directly.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::message::{ChatRequest, ChatResponse, OutputSchema};
use super::tool::json_schema_for;
use crate::error::AgentError;

/// Trait for LLM provider backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., `"openai"`).
    fn name(&self) -> &'static str;

    /// Whether the backend can bind tool definitions to a request.
    ///
    /// Tool-calling agents degrade to plain completion when this is `false`.
    fn supports_tools(&self) -> bool {
        true
    }

    /// Executes a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures or unusable responses.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError>;
}

/// Builds the [`OutputSchema`] for `T`.
#[must_use]
pub fn output_schema_for<T: JsonSchema>(name: &str) -> OutputSchema {
    OutputSchema {
        name: name.to_string(),
        schema: json_schema_for::<T>(),
    }
}

/// Strips a surrounding Markdown code fence, if any.
#[must_use]
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

/// Runs `request` constrained to `T`'s schema and decodes the answer.
///
/// The schema is attached as `output_schema`, with `json_mode` set for
/// backends that only honor the coarser flag. Any output that does not
/// decode into `T` is a [`AgentError::ResponseParse`]. There is no lenient
/// fallback.
pub async fn complete_structured<T>(
    provider: &dyn LlmProvider,
    mut request: ChatRequest,
    schema_name: &str,
) -> Result<T, AgentError>
where
    T: DeserializeOwned + JsonSchema,
{
    request.output_schema = Some(output_schema_for::<T>(schema_name));
    request.json_mode = true;
    request.tools.clear();

    let response = provider.chat(&request).await?;
    debug!(
        schema = schema_name,
        tokens = response.usage.total_tokens,
        "structured completion received"
    );

    let body = strip_code_fence(&response.content);
    serde_json::from_str(body).map_err(|e| AgentError::ResponseParse {
        message: format!("output does not match {schema_name}: {e}"),
        content: response.content.clone(),
    })
}
