//! Chunk persistence.
//!
//! The search path only needs bulk save and full-collection retrieval;
//! everything else here is maintenance surface. Backends provide
//! per-record atomicity, which is all the append-only write pattern
//! requires. A search overlapping an ingest may observe a partial
//! collection; that is acceptable.

pub mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chunking::ChunkDraft;
use crate::types::PipelineError;

pub use sqlite::SqliteChunkStore;

/// A chunk with its embedding attached, ready for persistence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub text: String,
    pub url: String,
    pub keywords: Vec<String>,
    pub embedding: Vec<f32>,
}

impl EmbeddedChunk {
    /// Attaches an embedding to a chunk draft.
    pub fn from_draft(draft: ChunkDraft, embedding: Vec<f32>) -> Self {
        Self {
            text: draft.text,
            url: draft.url,
            keywords: draft.keywords,
            embedding,
        }
    }
}

/// A persisted chunk as read back from a store.
///
/// `embedding` holds raw little-endian f32 bytes; its length must be
/// four times the store's vector dimensionality.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: String,
    pub text: String,
    pub url: String,
    pub keywords: Vec<String>,
    pub embedding: Vec<u8>,
}

/// Storage backend for embedded chunks.
///
/// Ids are opaque and minted by the store at save time; drafts never
/// carry one. Stored chunks are immutable; there is no update path.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Persists chunks in bulk and returns the assigned ids in order.
    async fn save_chunks(&self, chunks: Vec<EmbeddedChunk>) -> Result<Vec<String>, PipelineError>;

    /// Returns every stored chunk in insertion order.
    async fn load_all(&self) -> Result<Vec<StoredChunk>, PipelineError>;

    /// Returns the chunks derived from a given source URL.
    async fn chunks_for_url(&self, url: &str) -> Result<Vec<StoredChunk>, PipelineError>;

    /// Removes the chunks derived from a given source URL, returning
    /// how many were deleted.
    async fn delete_by_url(&self, url: &str) -> Result<usize, PipelineError>;

    /// Total number of stored chunks.
    async fn count(&self) -> Result<usize, PipelineError>;
}
