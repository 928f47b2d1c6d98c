//! Token counting against the chunk budget.

#[cfg(feature = "tokenizer-tiktoken")]
use crate::types::PipelineError;

/// Measures text against the chunker's token budget.
///
/// The chunker only ever needs a count; encoding output stays inside the
/// implementation.
pub trait Tokenizer: Send + Sync {
    /// Number of tokens the backing model would consume for `text`.
    fn token_count(&self, text: &str) -> usize;
}

/// BPE token counting via tiktoken's `cl100k_base` vocabulary.
#[cfg(feature = "tokenizer-tiktoken")]
pub struct TiktokenTokenizer {
    bpe: tiktoken_rs::CoreBPE,
}

#[cfg(feature = "tokenizer-tiktoken")]
impl TiktokenTokenizer {
    /// Loads the `cl100k_base` vocabulary. The load is cheap enough to
    /// do once at startup; share the instance afterwards.
    pub fn new() -> Result<Self, PipelineError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|err| PipelineError::Tokenizer(err.to_string()))?;
        Ok(Self { bpe })
    }
}

#[cfg(feature = "tokenizer-tiktoken")]
impl Tokenizer for TiktokenTokenizer {
    fn token_count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

/// Whitespace-word counting, useful for tests and environments without
/// the tiktoken vocabulary. Counts are a rough proxy for BPE tokens but
/// the chunker's budget semantics do not depend on the exact scale.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTokenizer;

impl Tokenizer for HeuristicTokenizer {
    fn token_count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}
