//! In-memory [`AuditSink`].

use std::sync::{Arc, Mutex};

use super::{AuditLogEntry, AuditSink};
use crate::error::StoreError;

/// Append-only audit sink that keeps entries in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the graph
/// and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    entries: Arc<Mutex<Vec<AuditLogEntry>>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries written so far.
    pub fn entries(&self) -> Result<Vec<AuditLogEntry>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.clone())
    }
}

impl AuditSink for MemoryAuditSink {
    fn log(&self, entry: &AuditLogEntry) -> Result<(), StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AgentKind;

    #[test]
    fn test_clones_share_entries() {
        let sink = MemoryAuditSink::new();
        let writer = sink.clone();
        let entry = AuditLogEntry::new(AgentKind::Supplier, "lead time", None, "14 days");
        assert!(writer.log(&entry).is_ok());

        let entries = sink.entries().unwrap_or_default();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].decision, "14 days");
    }
}
