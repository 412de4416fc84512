use anyhow::Result;
use sqlx::SqlitePool;

/// Create the vector index schema. Idempotent.
///
/// Every row stores its embedding inline (`embedding BLOB NOT NULL`), so a
/// stored chunk can never exist without a vector.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chunks (
            id TEXT PRIMARY KEY,
            collection TEXT NOT NULL,
            ticket_id INTEGER NOT NULL,
            status TEXT NOT NULL,
            chunk_index INTEGER NOT NULL,
            text TEXT NOT NULL,
            hash TEXT NOT NULL,
            embedding BLOB NOT NULL,
            model TEXT NOT NULL,
            dims INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_collection ON chunks(collection)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_ticket_id ON chunks(ticket_id)")
        .execute(pool)
        .await?;

    Ok(())
}
