//! Web-page ingestion into token-bounded overlapping chunks with
//! embeddings, plus cosine-similarity search over the stored chunks.
//!
//! ```text
//! URL ──► parser::PageParser ──► ordered text blocks
//!
//! text blocks ──► chunking::Chunker ──► ChunkDraft (text + keywords)
//!                        │
//!                        ├─► segmenter (sentence bounds)
//!                        └─► tokenizer (budget accounting)
//!
//! ChunkDraft ──► embeddings::Embedder ──► EmbeddedChunk ──► stores::ChunkStore
//!
//! query ──► embeddings::Embedder ──► search::SimilaritySearcher ──► ranked SearchHit
//! ```

pub mod chunking;
pub mod config;
pub mod embeddings;
pub mod parser;
pub mod pipeline;
pub mod search;
pub mod segmenter;
pub mod stores;
pub mod tokenizer;
pub mod types;

pub use chunking::{ChunkDraft, Chunker, ChunkingOutcome, ChunkingStats};
pub use config::ChunkerConfig;
pub use embeddings::{Embedder, HttpEmbedder, MockEmbedder};
pub use parser::{PageParser, ScraperPageParser};
pub use pipeline::{IngestReport, IngestionPipeline};
pub use search::{DEFAULT_TOP_K, SearchHit, SimilaritySearcher};
pub use segmenter::{SentenceSegmenter, UnicodeSentenceSegmenter};
pub use stores::{ChunkStore, EmbeddedChunk, SqliteChunkStore, StoredChunk};
#[cfg(feature = "tokenizer-tiktoken")]
pub use tokenizer::TiktokenTokenizer;
pub use tokenizer::{HeuristicTokenizer, Tokenizer};
pub use types::PipelineError;
