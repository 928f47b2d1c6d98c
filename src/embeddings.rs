//! Embedding providers and the raw-byte vector codec.
//!
//! Embedders are black boxes to the rest of the crate: deterministic for
//! a given text, fixed dimensionality for the lifetime of a store, and
//! responsible for their own input truncation.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::types::PipelineError;

/// Produces fixed-length vectors for chunk and query text.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Vector length produced by every [`embed`](Self::embed) call.
    fn dimensions(&self) -> usize;

    /// Embeds `text`, truncating internally if the backing model has an
    /// input limit.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError>;
}

/// Encodes a vector as raw little-endian f32 bytes for storage.
pub fn encode_vector(values: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * 4);
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decodes raw little-endian f32 bytes back into a vector. Round-trips
/// [`encode_vector`] bit-for-bit.
pub fn decode_vector(bytes: &[u8]) -> Result<Vec<f32>, PipelineError> {
    if bytes.len() % 4 != 0 {
        return Err(PipelineError::EmbeddingShape(format!(
            "{} bytes is not a whole number of f32 values",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Reduces a batched embedding response to a single vector.
///
/// A leading batch dimension of exactly one is squeezed away; any other
/// shape is rejected before it can reach storage.
pub fn squeeze_batch(mut batch: Vec<Vec<f32>>) -> Result<Vec<f32>, PipelineError> {
    match batch.len() {
        1 => Ok(batch.remove(0)),
        0 => Err(PipelineError::EmbeddingShape(
            "embedding batch is empty".to_string(),
        )),
        rows => Err(PipelineError::EmbeddingShape(format!(
            "embedding batch has {rows} rows, expected exactly 1"
        ))),
    }
}

/// Deterministic hash-seeded embedder for tests and offline runs.
///
/// Identical text always maps to the same unit vector; distinct texts
/// almost surely differ.
#[derive(Clone, Debug)]
pub struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish() | 1;

        let mut values = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            // splitmix64 step; spread the hash across all components.
            state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^= z >> 31;
            let unit = (z >> 40) as f32 / (1u64 << 24) as f32;
            values.push(unit * 2.0 - 1.0);
        }

        let norm = values.iter().map(|v| f64::from(*v).powi(2)).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut values {
                *value = (f64::from(*value) / norm) as f32;
            }
        } else if let Some(first) = values.first_mut() {
            *first = 1.0;
        }
        Ok(values)
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

/// Embedder backed by an OpenAI-style `/embeddings` HTTP endpoint.
///
/// The backend owns tokenization and truncation; this adapter only
/// forwards raw text and squeezes the singleton batch in the response.
#[derive(Clone, Debug)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    dimensions: usize,
}

impl HttpEmbedder {
    pub fn new(
        client: reqwest::Client,
        endpoint: Url,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            client,
            endpoint,
            model: model.into(),
            dimensions,
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "model": self.model, "input": text }))
            .send()
            .await?
            .error_for_status()?;

        let payload: EmbeddingResponse = response.json().await?;
        let vector = squeeze_batch(
            payload
                .data
                .into_iter()
                .map(|row| row.embedding)
                .collect(),
        )?;

        if vector.len() != self.dimensions {
            return Err(PipelineError::Embedding(format!(
                "backend returned {} dimensions, expected {}",
                vector.len(),
                self.dimensions
            )));
        }
        Ok(vector)
    }
}
