//! Persistent vector index over SQLite.
//!
//! Stores embedded chunks as `(text, little-endian f32 BLOB, metadata)` rows
//! scoped by a collection name, so multiple logical knowledge bases can share
//! one database file. Similarity search is brute-force cosine over the
//! collection, computed in Rust.
//!
//! Writes are additive: re-adding the same content produces duplicate rows.
//! Deduplication is an explicit non-goal.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use sqlx::{Row, SqlitePool};

use crate::config::Config;
use crate::db;
use crate::embedding::{self, Embedder};
use crate::migrate;
use crate::models::{Chunk, ScoredChunk, TicketStatus};

pub struct VectorIndex {
    pool: SqlitePool,
    collection: String,
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
}

impl VectorIndex {
    pub fn new(
        pool: SqlitePool,
        collection: impl Into<String>,
        embedder: Arc<dyn Embedder>,
        batch_size: usize,
    ) -> Self {
        Self {
            pool,
            collection: collection.into(),
            embedder,
            batch_size: batch_size.max(1),
        }
    }

    /// Open the configured index: connect, migrate, and build the embedder.
    ///
    /// Any failure here is fatal for the caller — there is no degraded mode
    /// without storage.
    pub async fn open(config: &Config) -> Result<VectorIndex> {
        let pool = db::connect(&config.store.path)
            .await
            .with_context(|| format!("Failed to open store at {}", config.store.path.display()))?;
        migrate::run_migrations(&pool)
            .await
            .context("Failed to run store migrations")?;
        let embedder: Arc<dyn Embedder> = Arc::from(embedding::create_embedder(&config.embedding)?);

        Ok(VectorIndex::new(
            pool,
            config.store.collection.clone(),
            embedder,
            config.embedding.batch_size,
        ))
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Embed and store a batch of chunks. Returns the number of rows written.
    ///
    /// Each batch is embedded with one capability call; all rows land in a
    /// single transaction so a failed run never leaves a chunk without its
    /// vector.
    pub async fn add(&self, chunks: &[Chunk]) -> Result<u64> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let batch_vectors = self.embedder.embed(&texts).await?;
            if batch_vectors.len() != batch.len() {
                bail!(
                    "Embedder returned {} vectors for {} chunks",
                    batch_vectors.len(),
                    batch.len()
                );
            }
            vectors.extend(batch_vectors);
        }

        let model = self.embedder.model_name().to_string();
        let dims = self.embedder.dims() as i64;
        let now = chrono::Utc::now().timestamp();

        let mut tx = self.pool.begin().await?;
        for (chunk, vector) in chunks.iter().zip(vectors.iter()) {
            if vector.is_empty() {
                bail!("Embedder returned an empty vector for chunk {}", chunk.id);
            }
            let blob = embedding::vec_to_blob(vector);
            sqlx::query(
                r#"
                INSERT INTO chunks
                    (id, collection, ticket_id, status, chunk_index, text, hash,
                     embedding, model, dims, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&chunk.id)
            .bind(&self.collection)
            .bind(chunk.ticket_id)
            .bind(chunk.status.as_str())
            .bind(chunk.chunk_index)
            .bind(&chunk.text)
            .bind(&chunk.hash)
            .bind(&blob)
            .bind(&model)
            .bind(dims)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(chunks.len() as u64)
    }

    /// Return the `k` stored chunks nearest to `query`, best first.
    ///
    /// An empty collection returns an empty result without calling the
    /// embedder; this path never fails on "no data".
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 || self.count().await? == 0 {
            return Ok(Vec::new());
        }

        let query_vec = embedding::embed_query(self.embedder.as_ref(), query).await?;

        let rows = sqlx::query(
            r#"
            SELECT id, ticket_id, status, chunk_index, text, hash, embedding
            FROM chunks
            WHERE collection = ?
            "#,
        )
        .bind(&self.collection)
        .fetch_all(&self.pool)
        .await?;

        let mut scored: Vec<ScoredChunk> = rows
            .iter()
            .map(|row| {
                let blob: Vec<u8> = row.get("embedding");
                let vector = embedding::blob_to_vec(&blob);
                let score = embedding::cosine_similarity(&query_vec, &vector) as f64;
                let status: String = row.get("status");
                ScoredChunk {
                    chunk: Chunk {
                        id: row.get("id"),
                        ticket_id: row.get("ticket_id"),
                        status: TicketStatus::parse(&status),
                        chunk_index: row.get("chunk_index"),
                        text: row.get("text"),
                        hash: row.get("hash"),
                    },
                    score,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }

    /// Remove every row in the collection. Returns the number removed.
    ///
    /// A single DELETE, so the reset is atomic; the schema stays intact and
    /// the index remains usable afterwards. Errors propagate to the caller.
    pub async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM chunks WHERE collection = ?")
            .bind(&self.collection)
            .execute(&self.pool)
            .await
            .context("Failed to clear knowledge base")?;
        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks WHERE collection = ?")
            .bind(&self.collection)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of distinct tickets represented in the collection.
    pub async fn ticket_count(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT ticket_id) FROM chunks WHERE collection = ?")
                .bind(&self.collection)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Retrieve the chunks most relevant to a question.
///
/// Thin wrapper over [`VectorIndex::similarity_search`]; an empty result is
/// not an error — the caller decides what "no results" means.
pub async fn retrieve(
    index: &VectorIndex,
    question: &str,
    top_k: usize,
) -> Result<Vec<ScoredChunk>> {
    index.similarity_search(question, top_k).await
}
