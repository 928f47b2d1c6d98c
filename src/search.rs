//! Cosine-similarity search over stored chunks.
//!
//! Brute-force O(N·D) scan per query: every stored embedding is decoded
//! and scored against the query vector. That is a deliberate simplicity
//! choice for small corpora, not a bug; it becomes a scaling limit
//! somewhere past tens of thousands of chunks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embeddings::{Embedder, decode_vector};
use crate::stores::{ChunkStore, StoredChunk};
use crate::types::PipelineError;

/// Default number of results returned by a search.
pub const DEFAULT_TOP_K: usize = 5;

/// One ranked search result. Embeddings are not echoed back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub text: String,
    pub url: String,
    pub keywords: Vec<String>,
    /// Cosine similarity against the query, in `[-1, 1]`.
    pub score: f32,
}

/// Cosine similarity with the zero-norm convention: if either vector
/// has zero norm the similarity is `0.0`, never a division by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let x = f64::from(x);
        let y = f64::from(y);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
}

/// Scores every chunk against `query` and returns the top `top_k` hits,
/// ranked descending with ties kept in retrieval order.
///
/// Any stored embedding whose decoded length differs from the query's
/// aborts the whole ranking with
/// [`PipelineError::DimensionMismatch`]; a length disagreement means the
/// store is corrupt, and skipping the record would hide that.
pub fn rank_chunks(
    query: &[f32],
    chunks: &[StoredChunk],
    top_k: usize,
) -> Result<Vec<SearchHit>, PipelineError> {
    let expected = query.len();
    let mut scored = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        let embedding = decode_vector(&chunk.embedding)?;
        if embedding.len() != expected {
            return Err(PipelineError::DimensionMismatch {
                expected,
                actual: embedding.len(),
            });
        }
        scored.push((chunk, cosine_similarity(query, &embedding)));
    }

    // sort_by is stable: equal scores keep retrieval order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_k);

    Ok(scored
        .into_iter()
        .map(|(chunk, score)| SearchHit {
            id: chunk.id.clone(),
            text: chunk.text.clone(),
            url: chunk.url.clone(),
            keywords: chunk.keywords.clone(),
            score,
        })
        .collect())
}

/// Embeds a query and ranks the full stored collection against it.
///
/// Holds long-lived handles to the embedder and store; the embedder is
/// loaded once per process and shared with the ingest path rather than
/// reconstructed per request.
pub struct SimilaritySearcher {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn ChunkStore>,
}

impl SimilaritySearcher {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn ChunkStore>) -> Self {
        Self { embedder, store }
    }

    /// Returns the `top_k` chunks most similar to `query`.
    ///
    /// An empty or whitespace-only query fails with
    /// [`PipelineError::EmptyQuery`] before any embedding call is made.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, PipelineError> {
        if query.trim().is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        let query_vector = self.embedder.embed(query).await?;
        let chunks = self.store.load_all().await?;
        debug!(candidates = chunks.len(), top_k, "ranking stored chunks");
        rank_chunks(&query_vector, &chunks, top_k)
    }
}
