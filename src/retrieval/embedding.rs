//! Text embeddings for document retrieval.
//!
//! With the `fastembed-embeddings` feature (default) documents are embedded
//! with all-MiniLM-L6-v2 through [`FastEmbedder`]. Without it,
//! [`HashEmbedder`] provides a deterministic lexical fallback of the same
//! width. Documents must be indexed and queried with the same embedder.

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::RetrievalError;

/// Default embedding width (all-MiniLM-L6-v2).
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Maps text to a fixed-width vector.
pub trait Embedder: Send + Sync {
    /// Vector width produced by [`Embedder::embed`].
    fn dimensions(&self) -> usize;

    /// Embeds `text`.
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;
}

/// Feature-hashing embedder over lowercased Unicode words.
///
/// Deterministic and offline; used when semantic embeddings are disabled
/// and in tests. Each word is hashed (FNV-1a) into a
/// bucket with a sign bit; the result is L2-normalized, so a dot product of
/// two embeddings is their cosine similarity.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Creates an embedder producing `dimensions`-wide vectors.
    #[must_use]
    pub const fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    bytes.iter().fold(OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(PRIME)
    })
}

impl Embedder for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        if self.dimensions == 0 {
            return Err(RetrievalError::Embedding {
                message: "embedding dimensions must be positive".to_string(),
            });
        }

        let mut vector = vec![0.0f32; self.dimensions];
        let dims = self.dimensions as u64;
        for word in text.unicode_words() {
            let hash = fnv1a(word.to_lowercase().as_bytes());
            #[allow(clippy::cast_possible_truncation)]
            let index = (hash % dims) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}

/// Semantic embedder backed by `fastembed` (all-MiniLM-L6-v2, 384 dims).
///
/// The ONNX model is loaded on first use, so constructing the embedder
/// never touches the network.
#[cfg(feature = "fastembed-embeddings")]
pub struct FastEmbedder {
    model: std::sync::Mutex<Option<fastembed::TextEmbedding>>,
}

#[cfg(feature = "fastembed-embeddings")]
impl FastEmbedder {
    /// Creates an embedder; the model is fetched lazily.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            model: std::sync::Mutex::new(None),
        }
    }

    fn load() -> Result<fastembed::TextEmbedding, RetrievalError> {
        use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

        tracing::debug!("loading all-MiniLM-L6-v2 embedding model");
        TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .map_err(|e| RetrievalError::Embedding {
            message: format!("failed to load embedding model: {e}"),
        })
    }
}

#[cfg(feature = "fastembed-embeddings")]
impl Default for FastEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "fastembed-embeddings")]
impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("model", &"all-MiniLM-L6-v2")
            .finish()
    }
}

#[cfg(feature = "fastembed-embeddings")]
impl Embedder for FastEmbedder {
    fn dimensions(&self) -> usize {
        DEFAULT_DIMENSIONS
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let mut guard = self.model.lock().map_err(|_| RetrievalError::Embedding {
            message: "embedding model lock poisoned".to_string(),
        })?;
        if guard.is_none() {
            *guard = Some(Self::load()?);
        }
        let model = guard.as_mut().ok_or_else(|| RetrievalError::Embedding {
            message: "embedding model unavailable".to_string(),
        })?;

        model
            .embed(vec![text], None)
            .map_err(|e| RetrievalError::Embedding {
                message: e.to_string(),
            })?
            .pop()
            .ok_or_else(|| RetrievalError::Embedding {
                message: "embedding model returned no vector".to_string(),
            })
    }
}

/// The embedder this build indexes and queries with.
#[must_use]
pub fn default_embedder() -> Arc<dyn Embedder> {
    #[cfg(feature = "fastembed-embeddings")]
    {
        Arc::new(FastEmbedder::new())
    }
    #[cfg(not(feature = "fastembed-embeddings"))]
    {
        Arc::new(HashEmbedder::default())
    }
}

/// Cosine similarity of two equal-length vectors; `0.0` when either is zero.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

/// Encodes a vector as little-endian `f32` bytes for BLOB storage.
#[must_use]
pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Decodes a BLOB written by [`encode_vector`].
pub fn decode_vector(bytes: &[u8]) -> Result<Vec<f32>, RetrievalError> {
    if bytes.len() % 4 != 0 {
        return Err(RetrievalError::Embedding {
            message: format!("embedding blob length {} is not a multiple of 4", bytes.len()),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_is_normalized() {
        let v = HashEmbedder::default()
            .embed("Road closures on the A7 near Hamburg")
            .unwrap_or_default();
        assert_eq!(v.len(), DEFAULT_DIMENSIONS);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_case_insensitive() {
        let e = HashEmbedder::default();
        assert_eq!(e.embed("Supplier CONTRACT").ok(), e.embed("supplier contract").ok());
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let v = HashEmbedder::new(8).embed("").unwrap_or_default();
        assert!(v.iter().all(|x| *x == 0.0));
        assert!((cosine_similarity(&v, &v)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_similar_text_scores_higher() {
        let e = HashEmbedder::default();
        let query = e.embed("supplier lead time").unwrap_or_default();
        let near = e.embed("the supplier lead time is 14 days").unwrap_or_default();
        let far = e.embed("congestion on the ring road").unwrap_or_default();
        assert!(cosine_similarity(&query, &near) > cosine_similarity(&query, &far));
    }

    #[test]
    fn test_vector_blob_round_trip() {
        let v = vec![0.5f32, -1.25, 3.0];
        assert_eq!(decode_vector(&encode_vector(&v)).ok(), Some(v));
        assert!(decode_vector(&[0, 1, 2]).is_err());
    }

    #[test]
    fn test_default_embedder_width() {
        assert_eq!(default_embedder().dimensions(), DEFAULT_DIMENSIONS);
    }

    #[cfg(feature = "fastembed-embeddings")]
    #[test]
    fn test_fast_embedder_is_lazy() {
        let embedder = FastEmbedder::new();
        assert_eq!(embedder.dimensions(), 384);
        let loaded = embedder.model.lock().map(|m| m.is_some()).unwrap_or(true);
        assert!(!loaded);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(HashEmbedder::new(0).embed("x").is_err());
    }
}
