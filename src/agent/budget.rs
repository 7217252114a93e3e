//! Request-wide step ceiling.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::error::AgentError;

/// Default number of steps one request may take.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// Counts graph node visits and reasoning rounds for one request.
///
/// Created fresh per invocation and shared by reference with the agent
/// that runs inside it. Charging past the limit fails with
/// [`AgentError::StepLimitExceeded`]; nothing resets the counter.
#[derive(Debug)]
pub struct StepBudget {
    limit: usize,
    used: AtomicUsize,
}

impl StepBudget {
    /// Creates a budget allowing `limit` steps.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
        }
    }

    /// Configured ceiling.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Steps taken so far.
    #[must_use]
    pub fn used(&self) -> usize {
        self.used.load(Ordering::SeqCst)
    }

    /// Takes one step on behalf of `node`.
    pub fn charge(&self, node: &str) -> Result<usize, AgentError> {
        let step = self.used.fetch_add(1, Ordering::SeqCst) + 1;
        if step > self.limit {
            return Err(AgentError::StepLimitExceeded {
                limit: self.limit,
                node: node.to_string(),
            });
        }
        debug!(node, step, limit = self.limit, "step charged");
        Ok(step)
    }
}

impl Default for StepBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charges_up_to_limit() {
        let budget = StepBudget::new(2);
        assert_eq!(budget.charge("router").ok(), Some(1));
        assert_eq!(budget.charge("cost").ok(), Some(2));
        let err = budget.charge("final_responder");
        assert!(matches!(
            err,
            Err(AgentError::StepLimitExceeded { limit: 2, ref node }) if node == "final_responder"
        ));
    }

    #[test]
    fn test_zero_limit_rejects_first_step() {
        assert!(StepBudget::new(0).charge("router").is_err());
    }

    #[test]
    fn test_default_limit() {
        let budget = StepBudget::default();
        assert_eq!(budget.limit(), DEFAULT_MAX_STEPS);
        assert_eq!(budget.used(), 0);
    }
}
