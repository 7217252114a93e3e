//! Agentic tool-calling loop.
//!
//! Drives the LLM ↔ tool execution round-trip: sends a request to the model,
//! executes any tool calls in the response, appends results, and repeats
//! until the model produces a final text response. The loop itself has no
//! iteration cap; every reasoning round is charged to the request's
//! [`StepBudget`], which aborts a runaway loop.

use tracing::debug;

use super::budget::StepBudget;
use super::executor::ToolExecutor;
use super::message::{ChatRequest, ChatResponse, assistant_tool_calls_message, tool_message};
use super::provider::LlmProvider;
use crate::error::AgentError;

/// Runs an agentic loop: model → tool calls → tool results → model → …
///
/// # Arguments
///
/// * `provider` - LLM provider to call.
/// * `request` - Initial chat request (mutated in-place with tool messages).
/// * `executor` - Dispatches tool calls to the logistics store.
/// * `budget` - Request-wide step budget; one step per reasoning round.
/// * `agent` - Name used when charging the budget and in logs.
///
/// # Errors
///
/// Returns [`AgentError::StepLimitExceeded`] when the budget runs out
/// before the model answers. Propagates provider errors. Tool failures are
/// not errors; they are fed back to the model as `{"error": ...}` results.
pub async fn agentic_loop(
    provider: &dyn LlmProvider,
    request: &mut ChatRequest,
    executor: &ToolExecutor,
    budget: &StepBudget,
    agent: &str,
) -> Result<ChatResponse, AgentError> {
    let step_name = format!("{agent} reasoning");
    let mut iteration = 0usize;
    loop {
        budget.charge(&step_name)?;
        let response = provider.chat(request).await?;

        if response.tool_calls.is_empty() {
            debug!(agent, iteration, "agentic loop completed with final text response");
            return Ok(response);
        }

        debug!(
            agent,
            iteration,
            tool_count = response.tool_calls.len(),
            "executing tool calls"
        );

        request
            .messages
            .push(assistant_tool_calls_message(response.tool_calls.clone()));

        for call in &response.tool_calls {
            let result = executor.execute(call);
            debug!(
                tool = call.name,
                call_id = call.id,
                is_error = result.is_error,
                "tool execution complete"
            );
            request
                .messages
                .push(tool_message(&result.tool_call_id, &result.content));
        }
        iteration += 1;
    }
}
