//! Sentence-aware, token-budgeted chunking with trailing-word overlap.
//!
//! Each text block is segmented into sentences, and sentences are
//! accumulated into a buffer until appending the next one would exceed
//! the token budget. The closed buffer becomes a chunk, and the next
//! buffer is seeded with the trailing fraction of the closed buffer's
//! words so context carries across the boundary. Sentences are never
//! split: one sentence larger than the whole budget still lands in a
//! chunk of its own.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ChunkerConfig;
use crate::segmenter::SentenceSegmenter;
use crate::tokenizer::Tokenizer;

/// A chunk before embedding and persistence. Drafts carry no id; ids
/// are minted by the store at save time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkDraft {
    /// Chunk content, stripped of surrounding whitespace. Never empty.
    pub text: String,
    /// Source URL the chunk was derived from.
    pub url: String,
    /// Most-frequent alphabetic tokens, descending by frequency, ties
    /// broken by first occurrence.
    pub keywords: Vec<String>,
}

/// Summary counters for one chunking run.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ChunkingStats {
    pub blocks: usize,
    pub sentences: usize,
    pub chunks: usize,
    /// Mean of the running token totals at the moment each chunk closed.
    pub average_tokens: f64,
}

/// Chunk drafts plus the run's counters.
#[derive(Clone, Debug)]
pub struct ChunkingOutcome {
    pub chunks: Vec<ChunkDraft>,
    pub stats: ChunkingStats,
}

/// Converts ordered text blocks into bounded, overlapping chunk drafts.
pub struct Chunker {
    segmenter: Arc<dyn SentenceSegmenter>,
    tokenizer: Arc<dyn Tokenizer>,
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(
        segmenter: Arc<dyn SentenceSegmenter>,
        tokenizer: Arc<dyn Tokenizer>,
        config: ChunkerConfig,
    ) -> Self {
        Self {
            segmenter,
            tokenizer,
            config,
        }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunks every block independently; overlap never crosses block
    /// boundaries. Blocks that segment into zero sentences contribute
    /// zero chunks.
    pub fn chunk_blocks(&self, url: &Url, blocks: &[String]) -> ChunkingOutcome {
        let mut chunks = Vec::new();
        let mut sentences_seen = 0usize;
        let mut token_total = 0usize;

        for block in blocks {
            let sentences = self.segmenter.split(block);
            sentences_seen += sentences.len();

            let mut buffer = String::new();
            let mut buffer_tokens = 0usize;

            for sentence in &sentences {
                let sentence_tokens = self.tokenizer.token_count(sentence);

                if buffer_tokens + sentence_tokens > self.config.token_budget {
                    if let Some(draft) = self.close_buffer(url, &buffer) {
                        token_total += buffer_tokens;
                        chunks.push(draft);
                    }
                    buffer = overlap_seed(&buffer, self.config.overlap_fraction);
                    buffer_tokens = if buffer.is_empty() {
                        0
                    } else {
                        self.tokenizer.token_count(&buffer)
                    };
                }

                buffer.push(' ');
                buffer.push_str(sentence);
                buffer_tokens += sentence_tokens;
            }

            if let Some(draft) = self.close_buffer(url, &buffer) {
                token_total += buffer_tokens;
                chunks.push(draft);
            }
        }

        let stats = ChunkingStats {
            blocks: blocks.len(),
            sentences: sentences_seen,
            chunks: chunks.len(),
            average_tokens: if chunks.is_empty() {
                0.0
            } else {
                token_total as f64 / chunks.len() as f64
            },
        };
        debug!(
            blocks = stats.blocks,
            sentences = stats.sentences,
            chunks = stats.chunks,
            average_tokens = stats.average_tokens,
            "chunking finished"
        );

        ChunkingOutcome { chunks, stats }
    }

    fn close_buffer(&self, url: &Url, buffer: &str) -> Option<ChunkDraft> {
        let text = buffer.trim();
        if text.is_empty() {
            return None;
        }
        Some(ChunkDraft {
            text: text.to_string(),
            url: url.to_string(),
            keywords: extract_keywords(text, self.config.keyword_count),
        })
    }
}

/// Trailing `round(fraction * word_count)` whitespace-split words of
/// `buffer`, re-joined with single spaces. A buffer of zero or one word
/// yields an empty or single-word seed.
pub fn overlap_seed(buffer: &str, fraction: f64) -> String {
    let words: Vec<&str> = buffer.split_whitespace().collect();
    let carry = (fraction.clamp(0.0, 1.0) * words.len() as f64).round() as usize;
    if carry == 0 {
        return String::new();
    }
    words[words.len() - carry.min(words.len())..].join(" ")
}

/// Top-`limit` purely alphabetic lower-cased whitespace tokens by
/// frequency, ties resolved by first occurrence.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in text.split_whitespace() {
        let lowered = token.to_lowercase();
        if lowered.is_empty() || !lowered.chars().all(char::is_alphabetic) {
            continue;
        }
        match index.get(&lowered) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                index.insert(lowered.clone(), order.len());
                order.push((lowered, 1));
            }
        }
    }

    // sort_by is stable, so equal counts keep first-seen order.
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(limit)
        .map(|(token, _)| token)
        .collect()
}
