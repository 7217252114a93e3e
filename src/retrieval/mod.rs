//! Document retrieval for the RAG agents.

pub mod embedding;
mod sqlite;

#[cfg(feature = "fastembed-embeddings")]
pub use embedding::FastEmbedder;
pub use embedding::{Embedder, HashEmbedder, default_embedder};
pub use sqlite::SqliteDocumentStore;

use serde::Serialize;
use serde_json::Value;

use crate::error::RetrievalError;

/// Default number of documents fetched per query.
pub const DEFAULT_TOP_K: usize = 5;

/// A document returned by a [`Retriever`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedDocument {
    /// Document body.
    pub text: String,
    /// Backend metadata (`doc_id`, `source`, `similarity_score`).
    pub metadata: Value,
    /// Similarity to the query; higher is closer.
    pub score: f64,
}

/// Ranked document lookup.
pub trait Retriever: Send + Sync {
    /// Returns at most `k` documents ordered by descending score.
    fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>, RetrievalError>;
}

/// Joins document bodies with blank lines, in retrieval order.
#[must_use]
pub fn format_documents(docs: &[RetrievedDocument]) -> String {
    docs.iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> RetrievedDocument {
        RetrievedDocument {
            text: text.to_string(),
            metadata: serde_json::json!({"source": "ignored"}),
            score: 0.5,
        }
    }

    #[test]
    fn test_format_documents_joins_with_blank_line() {
        let joined = format_documents(&[doc("first"), doc("second")]);
        assert_eq!(joined, "first\n\nsecond");
    }

    #[test]
    fn test_format_documents_empty() {
        assert_eq!(format_documents(&[]), "");
    }
}
