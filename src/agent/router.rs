//! Query router.
//!
//! Classifies a query into exactly one [`AgentKind`] with a
//! schema-constrained completion. The choice is decoded straight into the
//! enum; anything outside it is a parse error, never a guess.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::AgentConfig;
use super::message::{ChatRequest, user_message};
use super::prompt::build_router_prompt;
use super::provider::{LlmProvider, complete_structured};
use crate::core::AgentKind;
use crate::error::AgentError;

/// Schema name sent with the router request.
const ROUTER_SCHEMA: &str = "router_choice";

/// The router's structured decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RouterChoice {
    /// Agent that should handle the query.
    pub agent_name: AgentKind,
}

/// Routes queries to one of the six agents.
pub struct Router {
    provider: Arc<dyn LlmProvider>,
    model: String,
    template: String,
    temperature: f32,
    max_tokens: u32,
}

impl Router {
    /// Creates a router using `template` (placeholder `{query}`).
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        config: &AgentConfig,
        template: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: config.router_model.clone(),
            template: template.into(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Builds the router request for `query`.
    fn request(&self, query: &str) -> ChatRequest {
        let prompt = build_router_prompt(&self.template, query);
        ChatRequest::new(&self.model, vec![user_message(&prompt)])
            .with_sampling(self.temperature, self.max_tokens)
    }

    /// Picks the agent for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ResponseParse`] when the model's output is not a
    /// valid [`RouterChoice`], or the provider's error when the call fails.
    /// Neither is retried.
    pub async fn route(&self, query: &str) -> Result<AgentKind, AgentError> {
        let choice: RouterChoice =
            complete_structured(self.provider.as_ref(), self.request(query), ROUTER_SCHEMA)
                .await?;
        info!(agent = %choice.agent_name, "query routed");
        Ok(choice.agent_name)
    }
}
