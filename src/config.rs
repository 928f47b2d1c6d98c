//! Chunker tuning knobs.

use serde::{Deserialize, Serialize};

/// Configuration for the token-budgeted chunker.
///
/// The defaults mirror the reference pipeline: a 512-token budget with a
/// 10% trailing-word overlap carried between consecutive chunks of the
/// same block, and up to five keywords per chunk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum tokenizer-counted units permitted per chunk before a
    /// split is forced.
    pub token_budget: usize,
    /// Fraction of the previous chunk's trailing words carried into the
    /// next chunk. Clamped to `[0.0, 1.0]` when applied.
    pub overlap_fraction: f64,
    /// Number of keywords extracted per chunk.
    pub keyword_count: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            token_budget: 512,
            overlap_fraction: 0.1,
            keyword_count: 5,
        }
    }
}

impl ChunkerConfig {
    /// Override the token budget.
    #[must_use]
    pub fn with_token_budget(mut self, budget: usize) -> Self {
        self.token_budget = budget;
        self
    }

    /// Override the overlap fraction.
    #[must_use]
    pub fn with_overlap_fraction(mut self, fraction: f64) -> Self {
        self.overlap_fraction = fraction;
        self
    }

    /// Override the number of keywords extracted per chunk.
    #[must_use]
    pub fn with_keyword_count(mut self, count: usize) -> Self {
        self.keyword_count = count;
        self
    }
}
