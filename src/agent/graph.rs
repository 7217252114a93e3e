//! Orchestration graph: `router -> agent -> final_responder -> end`.
//!
//! Each invocation owns a fresh [`AgentState`] and [`StepBudget`]. Exactly
//! one agent node runs; its labeled output becomes the final response.
//! Every node visit and every reasoning round costs one step, and running
//! out of steps aborts the request.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::budget::StepBudget;
use super::config::AgentConfig;
use super::executor::ToolExecutor;
use super::prompt::PromptSet;
use super::provider::LlmProvider;
use super::rag::RagChain;
use super::router::Router;
use super::tool::ToolSet;
use super::tool_agent::build_tool_agent;
use super::traits::DomainAgent;
use crate::audit::{AuditLogEntry, AuditSink};
use crate::core::{AgentKind, AgentState, Identity};
use crate::error::AgentError;
use crate::retrieval::Retriever;
use crate::store::LogisticsStore;

/// Longest accepted query, in bytes.
pub const MAX_QUERY_LEN: usize = 10_000;

const ROUTER_NODE: &str = "router";
const FINAL_RESPONDER_NODE: &str = "final_responder";

/// A query plus the caller's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeRequest {
    /// Natural-language query.
    pub query: String,
    /// Caller identity, passed through to the audit log.
    #[serde(default)]
    pub identity: Identity,
}

impl InvokeRequest {
    /// An anonymous request.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            identity: Identity::default(),
        }
    }
}

/// The graph's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvokeResponse {
    /// Final response (the routed agent's labeled output).
    pub response: String,
    /// Agent the router picked.
    pub agent: AgentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Router,
    Agent(AgentKind),
    FinalResponder,
    End,
}

/// Routes a query to one agent and reduces its output to a response.
pub struct OrchestrationGraph {
    router: Router,
    agents: BTreeMap<AgentKind, Arc<dyn DomainAgent>>,
    audit: Arc<dyn AuditSink>,
    max_steps: usize,
}

impl OrchestrationGraph {
    /// Assembles a graph from prebuilt parts.
    #[must_use]
    pub fn new(
        router: Router,
        agents: impl IntoIterator<Item = Arc<dyn DomainAgent>>,
        audit: Arc<dyn AuditSink>,
        max_steps: usize,
    ) -> Self {
        Self {
            router,
            agents: agents.into_iter().map(|a| (a.kind(), a)).collect(),
            audit,
            max_steps,
        }
    }

    /// Builds the router and all six agents from `config`.
    ///
    /// Prompts are loaded from [`AgentConfig::prompt_dir`] with compiled-in
    /// defaults for missing files.
    #[must_use]
    pub fn from_config(
        config: &AgentConfig,
        provider: Arc<dyn LlmProvider>,
        store: Arc<dyn LogisticsStore>,
        retriever: Arc<dyn Retriever>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let prompts = PromptSet::load(config.prompt_dir.as_deref());
        Self::with_prompts(config, &prompts, provider, store, retriever, audit)
    }

    /// Like [`OrchestrationGraph::from_config`] with an explicit prompt set.
    #[must_use]
    pub fn with_prompts(
        config: &AgentConfig,
        prompts: &PromptSet,
        provider: Arc<dyn LlmProvider>,
        store: Arc<dyn LogisticsStore>,
        retriever: Arc<dyn Retriever>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let router = Router::new(Arc::clone(&provider), config, prompts.router.clone());
        let executor = ToolExecutor::new(store);

        let agents = AgentKind::ALL.into_iter().map(|kind| -> Arc<dyn DomainAgent> {
            let prompt = prompts.for_agent(kind);
            if kind.uses_tools() {
                let tools = ToolSet::for_agent(kind);
                build_tool_agent(
                    kind,
                    Arc::clone(&provider),
                    executor.clone(),
                    prompt,
                    &tools.names(),
                    config,
                )
            } else {
                Arc::new(RagChain::new(
                    kind,
                    Arc::clone(&provider),
                    Arc::clone(&retriever),
                    prompt,
                    config,
                ))
            }
        });

        Self::new(router, agents.collect::<Vec<_>>(), audit, config.max_steps)
    }

    /// Replaces the agent registered for the same kind.
    #[must_use]
    pub fn with_agent(mut self, agent: Arc<dyn DomainAgent>) -> Self {
        self.agents.insert(agent.kind(), agent);
        self
    }

    /// Classifies `query` without running an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidQuery`] for empty or oversized queries,
    /// or the router's error.
    pub async fn route(&self, query: &str) -> Result<AgentKind, AgentError> {
        validate_query(query)?;
        self.router.route(query).await
    }

    /// Answers `query` for an anonymous caller.
    ///
    /// # Errors
    ///
    /// See [`OrchestrationGraph::invoke_with_state`].
    pub async fn invoke(&self, query: &str) -> Result<String, AgentError> {
        let response = self.invoke_agent(InvokeRequest::new(query)).await?;
        Ok(response.response)
    }

    /// Answers an [`InvokeRequest`].
    ///
    /// # Errors
    ///
    /// See [`OrchestrationGraph::invoke_with_state`].
    pub async fn invoke_agent(&self, request: InvokeRequest) -> Result<InvokeResponse, AgentError> {
        let state = self
            .invoke_with_state(&request.query, request.identity)
            .await?;
        let agent = state.next_agent().ok_or_else(|| AgentError::Orchestration {
            message: "router did not select an agent".to_string(),
        })?;
        let response = state
            .final_response()
            .ok_or_else(|| AgentError::Orchestration {
                message: "final response was not produced".to_string(),
            })?
            .to_string();
        Ok(InvokeResponse { response, agent })
    }

    /// Runs the graph and returns the final state.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidQuery`] before routing,
    /// [`AgentError::StepLimitExceeded`] when the budget runs out, or the
    /// router's or agent's error. Nothing is retried.
    pub async fn invoke_with_state(
        &self,
        query: &str,
        identity: Identity,
    ) -> Result<AgentState, AgentError> {
        validate_query(query)?;

        let budget = StepBudget::new(self.max_steps);
        let mut state = AgentState::new(query, identity);
        let mut node = Node::Router;

        while node != Node::End {
            debug!(?node, "entering node");
            node = match node {
                Node::Router => {
                    budget.charge(ROUTER_NODE)?;
                    let kind = self.router.route(state.initial_query()).await?;
                    state.set_next_agent(kind)?;
                    Node::Agent(kind)
                }
                Node::Agent(kind) => {
                    budget.charge(kind.as_str())?;
                    let agent = self
                        .agents
                        .get(&kind)
                        .ok_or_else(|| AgentError::Orchestration {
                            message: format!("no agent registered for '{kind}'"),
                        })?;
                    let output = agent.run(state.initial_query(), &budget).await?;
                    state.record_step(kind, &output.output);
                    self.write_audit(kind, &state, &output.output);
                    Node::FinalResponder
                }
                Node::FinalResponder => {
                    budget.charge(FINAL_RESPONDER_NODE)?;
                    state.finalize()?;
                    Node::End
                }
                Node::End => Node::End,
            };
        }

        info!(
            agent = ?state.next_agent(),
            steps = budget.used(),
            "request completed"
        );
        Ok(state)
    }

    fn write_audit(&self, kind: AgentKind, state: &AgentState, output: &str) {
        let entry = AuditLogEntry::new(
            kind,
            state.initial_query(),
            state.identity().user_id.clone(),
            output,
        );
        if let Err(e) = self.audit.log(&entry) {
            warn!(agent = %kind, error = %e, "failed to write audit log");
        }
    }
}

/// Rejects empty queries and queries over [`MAX_QUERY_LEN`] bytes.
///
/// # Errors
///
/// Returns [`AgentError::InvalidQuery`].
pub fn validate_query(query: &str) -> Result<(), AgentError> {
    if query.trim().is_empty() {
        return Err(AgentError::InvalidQuery {
            message: "Query cannot be empty".to_string(),
        });
    }
    if query.len() > MAX_QUERY_LEN {
        return Err(AgentError::InvalidQuery {
            message: format!(
                "Query exceeds maximum length ({} bytes, max {MAX_QUERY_LEN})",
                query.len()
            ),
        });
    }
    Ok(())
}
