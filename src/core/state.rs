//! Per-request graph state and caller identity.

use serde::{Deserialize, Serialize};

use super::agent_kind::AgentKind;
use crate::error::AgentError;

/// Caller identity passed through from the outer layer.
///
/// Not validated here; authorization happens before the core is called.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Authenticated user identifier.
    pub user_id: Option<String>,
    /// User role (e.g. `"admin"`, `"dispatcher"`).
    pub user_role: Option<String>,
    /// Granted permission names.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Identity {
    /// Returns `true` when no identity field is set.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none() && self.user_role.is_none() && self.permissions.is_empty()
    }
}

/// Mutable record threaded through a single graph invocation.
///
/// `next_agent` and `final_response` are write-once; `intermediate_steps`
/// is append-only. Setters enforce this and report violations as
/// [`AgentError::Orchestration`].
#[derive(Debug, Clone, Serialize)]
pub struct AgentState {
    initial_query: String,
    #[serde(skip_serializing_if = "Identity::is_anonymous")]
    identity: Identity,
    next_agent: Option<AgentKind>,
    intermediate_steps: Vec<String>,
    final_response: Option<String>,
}

impl AgentState {
    /// Creates state for a new request.
    #[must_use]
    pub fn new(query: impl Into<String>, identity: Identity) -> Self {
        Self {
            initial_query: query.into(),
            identity,
            next_agent: None,
            intermediate_steps: Vec::new(),
            final_response: None,
        }
    }

    /// The caller's original query.
    #[must_use]
    pub fn initial_query(&self) -> &str {
        &self.initial_query
    }

    /// Caller identity.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The router's decision, once made.
    #[must_use]
    pub const fn next_agent(&self) -> Option<AgentKind> {
        self.next_agent
    }

    /// Outputs recorded by agent nodes, in order.
    #[must_use]
    pub fn intermediate_steps(&self) -> &[String] {
        &self.intermediate_steps
    }

    /// The final response, once the final responder has run.
    #[must_use]
    pub fn final_response(&self) -> Option<&str> {
        self.final_response.as_deref()
    }

    /// Records the routing decision.
    pub fn set_next_agent(&mut self, kind: AgentKind) -> Result<(), AgentError> {
        if let Some(existing) = self.next_agent {
            return Err(AgentError::Orchestration {
                message: format!("next_agent already set to {existing}, refusing {kind}"),
            });
        }
        self.next_agent = Some(kind);
        Ok(())
    }

    /// Appends an agent's output, labeled with the agent name.
    pub fn record_step(&mut self, kind: AgentKind, output: &str) {
        self.intermediate_steps
            .push(format!("{} response: {output}", kind.label()));
    }

    /// Copies the latest intermediate step into the final response.
    pub fn finalize(&mut self) -> Result<&str, AgentError> {
        if self.final_response.is_some() {
            return Err(AgentError::Orchestration {
                message: "final_response already set".to_string(),
            });
        }
        let last = self
            .intermediate_steps
            .last()
            .cloned()
            .ok_or_else(|| AgentError::Orchestration {
                message: "no agent output to finalize".to_string(),
            })?;
        Ok(self.final_response.insert(last).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = AgentState::new("where is my truck", Identity::default());
        assert_eq!(state.initial_query(), "where is my truck");
        assert!(state.next_agent().is_none());
        assert!(state.intermediate_steps().is_empty());
        assert!(state.final_response().is_none());
    }

    #[test]
    fn test_next_agent_write_once() {
        let mut state = AgentState::new("q", Identity::default());
        assert!(state.set_next_agent(AgentKind::Cost).is_ok());
        let second = state.set_next_agent(AgentKind::Tracking);
        assert!(matches!(second, Err(AgentError::Orchestration { .. })));
        assert_eq!(state.next_agent(), Some(AgentKind::Cost));
    }

    #[test]
    fn test_finalize_copies_last_step() {
        let mut state = AgentState::new("q", Identity::default());
        state.record_step(AgentKind::Warehouse, "350 units in stock");
        let response = state.finalize().map(str::to_string);
        assert_eq!(
            response.ok().as_deref(),
            Some("Warehouse response: 350 units in stock")
        );
        assert_eq!(
            state.final_response(),
            Some("Warehouse response: 350 units in stock")
        );
    }

    #[test]
    fn test_finalize_without_steps_fails() {
        let mut state = AgentState::new("q", Identity::default());
        assert!(state.finalize().is_err());
    }

    #[test]
    fn test_finalize_twice_fails() {
        let mut state = AgentState::new("q", Identity::default());
        state.record_step(AgentKind::Cost, "done");
        assert!(state.finalize().is_ok());
        assert!(state.finalize().is_err());
    }

    #[test]
    fn test_anonymous_identity_not_serialized() {
        let state = AgentState::new("q", Identity::default());
        let json = serde_json::to_string(&state).unwrap_or_default();
        assert!(!json.contains("identity"));

        let identity = Identity {
            user_id: Some("u-1".to_string()),
            ..Identity::default()
        };
        let state = AgentState::new("q", identity);
        let json = serde_json::to_string(&state).unwrap_or_default();
        assert!(json.contains("u-1"));
    }
}
