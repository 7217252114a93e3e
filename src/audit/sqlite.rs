//! SQLite-backed [`AuditSink`] writing to `agent_audit_logs`.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, params};
use tracing::debug;

use super::{AuditLogEntry, AuditSink};
use crate::error::StoreError;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS agent_audit_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    agent_name TEXT NOT NULL,
    input_context TEXT NOT NULL,
    decision_json TEXT NOT NULL,
    confidence REAL NOT NULL,
    created_at TEXT NOT NULL
);
";

/// Audit rows in a SQLite database.
pub struct SqliteAuditSink {
    conn: Mutex<Connection>,
}

impl SqliteAuditSink {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(Connection::open(path)?),
        })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    /// Creates the audit table if it does not exist.
    pub fn init(&self) -> Result<(), StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Number of rows written.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM agent_audit_logs", [], |row| {
            row.get(0)
        })?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

impl AuditSink for SqliteAuditSink {
    fn log(&self, entry: &AuditLogEntry) -> Result<(), StoreError> {
        let input_context = serde_json::to_string(&entry.input_context())?;
        let decision_json = serde_json::to_string(&entry.decision_json())?;
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO agent_audit_logs
                (agent_name, input_context, decision_json, confidence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.agent_name.as_str(),
                input_context,
                decision_json,
                entry.confidence,
                entry.timestamp.to_rfc3339()
            ],
        )?;
        debug!(agent = %entry.agent_name, "audit entry written");
        Ok(())
    }
}
