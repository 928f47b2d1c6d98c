//! End-to-end ingest and search operations.

use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::chunking::{Chunker, ChunkingStats};
use crate::embeddings::Embedder;
use crate::parser::PageParser;
use crate::search::{SearchHit, SimilaritySearcher};
use crate::stores::{ChunkStore, EmbeddedChunk};
use crate::types::PipelineError;

/// Summary of one ingest run.
#[derive(Clone, Debug)]
pub struct IngestReport {
    pub url: String,
    pub blocks: usize,
    pub chunk_ids: Vec<String>,
    pub stats: ChunkingStats,
}

impl IngestReport {
    pub fn chunk_count(&self) -> usize {
        self.chunk_ids.len()
    }
}

/// Wires the parser, chunker, embedder and store into the two exposed
/// operations: [`ingest`](Self::ingest) and [`search`](Self::search).
///
/// All collaborators are injected at construction and shared for the
/// life of the pipeline. In particular the embedder handle is loaded
/// once and reused by both paths; per-request model construction is a
/// known performance trap.
pub struct IngestionPipeline {
    parser: Arc<dyn PageParser>,
    chunker: Chunker,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn ChunkStore>,
    searcher: SimilaritySearcher,
}

impl IngestionPipeline {
    pub fn new(
        parser: Arc<dyn PageParser>,
        chunker: Chunker,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn ChunkStore>,
    ) -> Self {
        let searcher = SimilaritySearcher::new(embedder.clone(), store.clone());
        Self {
            parser,
            chunker,
            embedder,
            store,
            searcher,
        }
    }

    /// Runs the full write path for one URL: extract text blocks, chunk
    /// them, embed each chunk, persist the batch. Chunk saves are
    /// independent; a failure aborts the run without rollback of chunks
    /// already persisted by earlier runs.
    pub async fn ingest(&self, url: &Url) -> Result<IngestReport, PipelineError> {
        info!(%url, "ingesting page");
        let blocks = self.parser.extract_text_blocks(url).await?;
        let outcome = self.chunker.chunk_blocks(url, &blocks);

        let mut embedded = Vec::with_capacity(outcome.chunks.len());
        for draft in outcome.chunks {
            let vector = self.embedder.embed(&draft.text).await?;
            embedded.push(EmbeddedChunk::from_draft(draft, vector));
        }

        let chunk_ids = self.store.save_chunks(embedded).await?;
        info!(
            %url,
            blocks = blocks.len(),
            chunks = chunk_ids.len(),
            "page ingested"
        );

        Ok(IngestReport {
            url: url.to_string(),
            blocks: blocks.len(),
            chunk_ids,
            stats: outcome.stats,
        })
    }

    /// Runs the read path: embed the query and rank every stored chunk
    /// by cosine similarity, returning the top `top_k`.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, PipelineError> {
        self.searcher.search(query, top_k).await
    }
}
