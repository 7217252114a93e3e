//! Tool-calling agents (tracking, warehouse, cost) and their fallback.
//!
//! [`build_tool_agent`] binds a system prompt and a named tool subset. If
//! binding fails the agent degrades to a [`FallbackExecutor`] that answers
//! the raw query with a plain completion.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::budget::StepBudget;
use super::config::AgentConfig;
use super::executor::ToolExecutor;
use super::provider::LlmProvider;
use super::tool::{ToolDefinition, ToolSet};
use super::traits::{Agent, AgentOutput, DomainAgent, execute_with_tools};
use crate::core::AgentKind;
use crate::error::AgentError;

/// Agent that plans, calls tools, and observes results until it answers.
pub struct ToolCallingAgent {
    kind: AgentKind,
    provider: Arc<dyn LlmProvider>,
    executor: ToolExecutor,
    system_prompt: String,
    tools: Vec<ToolDefinition>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ToolCallingAgent {
    /// Binds `tool_names` from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Construction`] when the prompt is empty, a tool
    /// is not registered, or the provider cannot bind tools.
    pub fn try_new(
        kind: AgentKind,
        provider: Arc<dyn LlmProvider>,
        executor: ToolExecutor,
        system_prompt: &str,
        tool_names: &[&str],
        config: &AgentConfig,
    ) -> Result<Self, AgentError> {
        let fail = |message: String| AgentError::Construction {
            agent: kind.to_string(),
            message,
        };

        if system_prompt.trim().is_empty() {
            return Err(fail("system prompt is empty".to_string()));
        }
        if !provider.supports_tools() {
            return Err(fail(format!(
                "provider '{}' cannot bind tools",
                provider.name()
            )));
        }

        let registry = ToolSet::all();
        let tools = tool_names
            .iter()
            .map(|name| {
                registry
                    .get(name)
                    .cloned()
                    .ok_or_else(|| fail(format!("tool '{name}' is not registered")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            kind,
            provider,
            executor: executor.restricted_to(tool_names),
            system_prompt: system_prompt.to_string(),
            tools,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

impl Agent for ToolCallingAgent {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        self.tools.clone()
    }
}

#[async_trait]
impl DomainAgent for ToolCallingAgent {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    async fn run(&self, query: &str, budget: &StepBudget) -> Result<AgentOutput, AgentError> {
        let response = execute_with_tools(
            self,
            self.provider.as_ref(),
            query,
            &self.executor,
            budget,
        )
        .await?;
        Ok(AgentOutput::new(response.content))
    }
}

/// Plain completion of the raw query, used when tool binding fails.
pub struct FallbackExecutor {
    kind: AgentKind,
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl FallbackExecutor {
    /// Creates a fallback for `kind`.
    #[must_use]
    pub fn new(kind: AgentKind, provider: Arc<dyn LlmProvider>, config: &AgentConfig) -> Self {
        Self {
            kind,
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

impl Agent for FallbackExecutor {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        ""
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

#[async_trait]
impl DomainAgent for FallbackExecutor {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    async fn run(&self, query: &str, _budget: &StepBudget) -> Result<AgentOutput, AgentError> {
        let response = self.execute(self.provider.as_ref(), query).await?;
        Ok(AgentOutput::new(response.content))
    }
}

/// Builds the agent for `kind`, degrading to [`FallbackExecutor`] on failure.
#[must_use]
pub fn build_tool_agent(
    kind: AgentKind,
    provider: Arc<dyn LlmProvider>,
    executor: ToolExecutor,
    system_prompt: &str,
    tool_names: &[&str],
    config: &AgentConfig,
) -> Arc<dyn DomainAgent> {
    match ToolCallingAgent::try_new(
        kind,
        Arc::clone(&provider),
        executor,
        system_prompt,
        tool_names,
        config,
    ) {
        Ok(agent) => Arc::new(agent),
        Err(e) => {
            warn!(agent = %kind, error = %e, "tool agent unavailable; using fallback executor");
            Arc::new(FallbackExecutor::new(kind, provider, config))
        }
    }
}
