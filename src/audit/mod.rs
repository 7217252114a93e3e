//! Audit trail of agent decisions.
//!
//! The graph writes one [`AuditLogEntry`] after each agent node. Sinks are
//! write-only from the core's point of view; a failed write is logged and
//! never fails the request.

mod memory;
mod sqlite;

pub use memory::MemoryAuditSink;
pub use sqlite::SqliteAuditSink;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::core::AgentKind;
use crate::error::StoreError;

/// Confidence recorded for every decision until agents report their own.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// One agent decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogEntry {
    /// Agent that produced the decision.
    pub agent_name: AgentKind,
    /// The query the agent answered.
    pub query: String,
    /// Caller, when known.
    pub user_id: Option<String>,
    /// The agent's raw output.
    pub decision: String,
    /// Confidence score in `[0, 1]`.
    pub confidence: f64,
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(
        agent_name: AgentKind,
        query: impl Into<String>,
        user_id: Option<String>,
        decision: impl Into<String>,
    ) -> Self {
        Self {
            agent_name,
            query: query.into(),
            user_id,
            decision: decision.into(),
            confidence: DEFAULT_CONFIDENCE,
            timestamp: Utc::now(),
        }
    }

    /// Input context as stored: `{"query": ..., "user_id": ...}`.
    #[must_use]
    pub fn input_context(&self) -> Value {
        let mut ctx = json!({ "query": self.query });
        if let (Some(user_id), Some(map)) = (&self.user_id, ctx.as_object_mut()) {
            map.insert("user_id".to_string(), Value::String(user_id.clone()));
        }
        ctx
    }

    /// Decision as stored: `{"output": ...}`.
    #[must_use]
    pub fn decision_json(&self) -> Value {
        json!({ "output": self.decision })
    }
}

/// Destination for audit entries.
pub trait AuditSink: Send + Sync {
    /// Persists one entry.
    fn log(&self, entry: &AuditLogEntry) -> Result<(), StoreError>;
}
