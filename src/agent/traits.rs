//! Agent trait definitions.
//!
//! [`Agent`] describes how a single model-backed role builds its requests.
//! [`DomainAgent`] is the narrower capability the orchestration graph sees:
//! every routed agent, whether retrieval-backed, tool-calling, or the
//! fallback executor, answers `run(query)` with an [`AgentOutput`].

use async_trait::async_trait;
use serde::Serialize;

use super::budget::StepBudget;
use super::executor::ToolExecutor;
use super::message::{ChatMessage, ChatRequest, ChatResponse, system_message, user_message};
use super::provider::LlmProvider;
use super::tool::ToolDefinition;
use crate::core::AgentKind;
use crate::error::AgentError;

/// Response from an agent execution.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// The agent's text output.
    pub content: String,
    /// Token usage for this call.
    pub usage: super::message::TokenUsage,
    /// Why the model stopped generating (e.g. `"stop"`, `"length"`).
    pub finish_reason: Option<String>,
}

impl From<ChatResponse> for AgentResponse {
    fn from(response: ChatResponse) -> Self {
        Self {
            content: response.content,
            usage: response.usage,
            finish_reason: response.finish_reason,
        }
    }
}

/// What a routed agent hands back to the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentOutput {
    /// Natural-language answer.
    pub output: String,
}

impl AgentOutput {
    /// Wraps an answer.
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

/// A model-backed role with a fixed prompt and sampling configuration.
///
/// Agents that support tool-calling override [`Agent::tools`] and are run
/// through [`execute_with_tools`].
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name for logging and budget accounting.
    fn name(&self) -> &'static str;

    /// Model identifier to use for this agent.
    fn model(&self) -> &str;

    /// System prompt that defines the agent's role. Empty means none.
    fn system_prompt(&self) -> &str;

    /// Sampling temperature.
    fn temperature(&self) -> f32 {
        0.0
    }

    /// Maximum tokens for the response.
    fn max_tokens(&self) -> u32 {
        2048
    }

    /// Tool definitions available to this agent.
    fn tools(&self) -> Vec<ToolDefinition> {
        Vec::new()
    }

    /// Builds the opening transcript for `user_msg`.
    fn messages(&self, user_msg: &str) -> Vec<ChatMessage> {
        let prompt = self.system_prompt();
        if prompt.is_empty() {
            vec![user_message(user_msg)]
        } else {
            vec![system_message(prompt), user_message(user_msg)]
        }
    }

    /// Executes the agent with the given user message (no tools).
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures.
    async fn execute(
        &self,
        provider: &dyn LlmProvider,
        user_msg: &str,
    ) -> Result<AgentResponse, AgentError> {
        let request = ChatRequest::new(self.model(), self.messages(user_msg))
            .with_sampling(self.temperature(), self.max_tokens());

        let response = provider.chat(&request).await?;
        Ok(response.into())
    }
}

/// A routable agent as seen by the orchestration graph.
#[async_trait]
pub trait DomainAgent: Send + Sync {
    /// Which of the six agents this is.
    fn kind(&self) -> AgentKind;

    /// Answers `query`, charging reasoning rounds to `budget`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on model failures or when `budget` runs out.
    async fn run(&self, query: &str, budget: &StepBudget) -> Result<AgentOutput, AgentError>;
}

/// Executes an agent with tool-calling support.
///
/// If the agent declares tools, builds a tool-enabled request and runs the
/// agentic loop, charging each reasoning round to `budget`. Otherwise falls
/// through to [`Agent::execute`].
///
/// # Errors
///
/// Returns [`AgentError`] on API failures or
/// [`AgentError::StepLimitExceeded`] if the loop outruns the budget.
pub async fn execute_with_tools(
    agent: &dyn Agent,
    provider: &dyn LlmProvider,
    user_msg: &str,
    executor: &ToolExecutor,
    budget: &StepBudget,
) -> Result<AgentResponse, AgentError> {
    let tool_defs = agent.tools();

    if tool_defs.is_empty() {
        return agent.execute(provider, user_msg).await;
    }

    let mut request = ChatRequest::new(agent.model(), agent.messages(user_msg))
        .with_sampling(agent.temperature(), agent.max_tokens());
    request.tools = tool_defs;

    let response = super::agentic_loop::agentic_loop(
        provider,
        &mut request,
        executor,
        budget,
        agent.name(),
    )
    .await?;

    Ok(response.into())
}
