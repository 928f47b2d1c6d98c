//! SQLite-backed chunk store.

use std::path::Path;

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use crate::embeddings::encode_vector;
use crate::types::PipelineError;

use super::{ChunkStore, EmbeddedChunk, StoredChunk};

/// Chunk store over a single SQLite file.
///
/// One `chunks` table holds the record fields plus the raw embedding
/// blob; there is no vector index, because search scans the full
/// collection in process.
#[derive(Clone)]
pub struct SqliteChunkStore {
    conn: Connection,
}

impl SqliteChunkStore {
    /// Opens (creating if needed) the database at `path` and applies the
    /// schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let conn = Connection::open(path).await.map_err(storage_err)?;
        let store = Self { conn };
        store.migrate().await?;
        Ok(store)
    }

    /// In-memory database, handy for tests and throwaway runs.
    pub async fn open_in_memory() -> Result<Self, PipelineError> {
        let conn = Connection::open_in_memory().await.map_err(storage_err)?;
        let store = Self { conn };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), PipelineError> {
        self.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS chunks (
                        id TEXT PRIMARY KEY,
                        url TEXT NOT NULL,
                        text TEXT NOT NULL,
                        keywords TEXT NOT NULL,
                        embedding BLOB NOT NULL
                    );
                    CREATE INDEX IF NOT EXISTS idx_chunks_url ON chunks(url);",
                )?;
                Ok::<_, tokio_rusqlite::rusqlite::Error>(())
            })
            .await
            .map_err(storage_err)
    }

    /// Direct access to the underlying connection for queries outside
    /// the [`ChunkStore`] surface.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl ChunkStore for SqliteChunkStore {
    async fn save_chunks(&self, chunks: Vec<EmbeddedChunk>) -> Result<Vec<String>, PipelineError> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(chunks.len());
        let mut rows = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let id = Uuid::new_v4().to_string();
            let keywords = serde_json::to_string(&chunk.keywords)
                .map_err(|err| PipelineError::Storage(err.to_string()))?;
            rows.push((
                id.clone(),
                chunk.url,
                chunk.text,
                keywords,
                encode_vector(&chunk.embedding),
            ));
            ids.push(id);
        }

        let inserted = rows.len();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO chunks (id, url, text, keywords, embedding)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                    )?;
                    for (id, url, text, keywords, embedding) in &rows {
                        stmt.execute((id, url, text, keywords, embedding))?;
                    }
                }
                tx.commit()?;
                Ok::<_, tokio_rusqlite::rusqlite::Error>(())
            })
            .await
            .map_err(storage_err)?;

        debug!(chunks = inserted, "saved chunk batch");
        Ok(ids)
    }

    async fn load_all(&self) -> Result<Vec<StoredChunk>, PipelineError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, url, text, keywords, embedding FROM chunks ORDER BY rowid",
                )?;
                let rows = stmt.query_map([], |row| {
                    let keywords: String = row.get(3)?;
                    Ok(StoredChunk {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        text: row.get(2)?,
                        keywords: serde_json::from_str(&keywords).unwrap_or_default(),
                        embedding: row.get(4)?,
                    })
                })?;
                let mut chunks = Vec::new();
                for row in rows {
                    chunks.push(row?);
                }
                Ok::<_, tokio_rusqlite::rusqlite::Error>(chunks)
            })
            .await
            .map_err(storage_err)
    }

    async fn chunks_for_url(&self, url: &str) -> Result<Vec<StoredChunk>, PipelineError> {
        let url = url.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, url, text, keywords, embedding FROM chunks
                     WHERE url = ?1 ORDER BY rowid",
                )?;
                let rows = stmt.query_map([&url], |row| {
                    let keywords: String = row.get(3)?;
                    Ok(StoredChunk {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        text: row.get(2)?,
                        keywords: serde_json::from_str(&keywords).unwrap_or_default(),
                        embedding: row.get(4)?,
                    })
                })?;
                let mut chunks = Vec::new();
                for row in rows {
                    chunks.push(row?);
                }
                Ok::<_, tokio_rusqlite::rusqlite::Error>(chunks)
            })
            .await
            .map_err(storage_err)
    }

    async fn delete_by_url(&self, url: &str) -> Result<usize, PipelineError> {
        let url = url.to_string();
        self.conn
            .call(move |conn| {
                let deleted = conn.execute("DELETE FROM chunks WHERE url = ?1", [&url])?;
                Ok::<_, tokio_rusqlite::rusqlite::Error>(deleted)
            })
            .await
            .map_err(storage_err)
    }

    async fn count(&self) -> Result<usize, PipelineError> {
        self.conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
                Ok::<_, tokio_rusqlite::rusqlite::Error>(count as usize)
            })
            .await
            .map_err(storage_err)
    }
}

fn storage_err(err: impl std::fmt::Display) -> PipelineError {
    PipelineError::Storage(err.to_string())
}
