//! SQLite document store with brute-force cosine ranking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, params};
use serde_json::json;
use tracing::debug;

use super::embedding::{Embedder, cosine_similarity, decode_vector, encode_vector};
use super::{RetrievedDocument, Retriever};
use crate::error::{RetrievalError, StoreError};

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    doc_id TEXT NOT NULL UNIQUE,
    source TEXT NOT NULL,
    content TEXT NOT NULL,
    embedding BLOB NOT NULL
);
";

/// Knowledge-base documents with stored embeddings.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
    embedder: Arc<dyn Embedder>,
}

impl SqliteDocumentStore {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>, embedder: Arc<dyn Embedder>) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(Connection::open(path)?),
            embedder,
        })
    }

    /// Opens a private in-memory database.
    pub fn in_memory(embedder: Arc<dyn Embedder>) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            embedder,
        })
    }

    /// Creates the documents table if it does not exist.
    pub fn init(&self) -> Result<(), StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Embeds and stores a document, replacing any with the same `doc_id`.
    pub fn add_document(
        &self,
        doc_id: &str,
        source: &str,
        content: &str,
    ) -> Result<(), RetrievalError> {
        let embedding = encode_vector(&self.embedder.embed(content)?);
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO documents (doc_id, source, content, embedding)
             VALUES (?1, ?2, ?3, ?4)",
            params![doc_id, source, content, embedding],
        )?;
        Ok(())
    }

    /// Number of stored documents.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

impl Retriever for SqliteDocumentStore {
    fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>, RetrievalError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let query_vec = self.embedder.embed(query)?;

        let rows = {
            let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            let mut stmt =
                conn.prepare("SELECT doc_id, source, content, embedding FROM documents")?;
            stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Vec<u8>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?
        };

        let mut scored = Vec::with_capacity(rows.len());
        for (doc_id, source, content, blob) in rows {
            let score = f64::from(cosine_similarity(&query_vec, &decode_vector(&blob)?));
            scored.push(RetrievedDocument {
                text: content,
                metadata: json!({
                    "doc_id": doc_id,
                    "source": source,
                    "similarity_score": score,
                }),
                score,
            });
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        debug!(query_len = query.len(), hits = scored.len(), "documents retrieved");
        Ok(scored)
    }
}
