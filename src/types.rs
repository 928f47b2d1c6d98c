//! Crate-wide error taxonomy.

use thiserror::Error;

/// Errors surfaced by the ingestion and search pipeline.
///
/// Upstream failures (network, embedder backend) are carried through
/// unmodified; the pipeline does not retry.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The search query was empty or whitespace-only. Raised before any
    /// embedding call is made.
    #[error("search query is empty")]
    EmptyQuery,

    /// An embedding did not have the expected shape before storage,
    /// e.g. a batch with more than one row or a byte payload that is not
    /// a whole number of f32 values.
    #[error("embedding has unexpected shape: {0}")]
    EmbeddingShape(String),

    /// A stored embedding's dimensionality disagrees with the query
    /// embedding at search time. This aborts the whole search: it
    /// signals store corruption, not a per-chunk condition.
    #[error("stored embedding has dimension {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The embedding backend failed or returned an unusable response.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Tokenizer construction or encoding failed.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// A fetched document could not be used (bad URL, unusable markup).
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// HTTP transport failure while fetching a page or calling a remote
    /// embedder.
    #[error("fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
