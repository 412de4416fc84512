//! Ingestion pipeline orchestration.
//!
//! Coordinates the write path: resolved tickets → knowledge units → chunks →
//! vector index. A ticket that fails (comment fetch, embedding, storage) is
//! logged and skipped; it never aborts the rest of the batch.

use anyhow::Result;

use crate::chunk::split_unit;
use crate::config::{ChunkingConfig, Config};
use crate::index::VectorIndex;
use crate::knowledge::build_unit;
use crate::models::{Comment, Ticket};
use crate::zendesk::ZendeskClient;

#[derive(Debug, Default)]
pub struct IngestStats {
    pub tickets_seen: u64,
    pub units_built: u64,
    pub chunks_written: u64,
    pub tickets_failed: u64,
}

/// Core ingest operation: build a knowledge unit per (ticket, comments)
/// pair, chunk it, and store the chunks.
///
/// Tickets without a support-authored comment contribute nothing and are not
/// failures. A ticket whose chunks cannot be stored is counted in
/// `tickets_failed` and skipped.
pub async fn ingest_tickets(
    index: &VectorIndex,
    chunking: &ChunkingConfig,
    tickets: &[(Ticket, Vec<Comment>)],
    support_ids: &[i64],
) -> Result<IngestStats> {
    let mut stats = IngestStats::default();

    for (ticket, comments) in tickets {
        stats.tickets_seen += 1;

        let unit = match build_unit(ticket, comments, support_ids) {
            Some(unit) => unit,
            None => continue,
        };
        stats.units_built += 1;

        let chunks = split_unit(&unit, chunking);
        match index.add(&chunks).await {
            Ok(written) => stats.chunks_written += written,
            Err(e) => {
                eprintln!("Warning: failed to index ticket {}: {}", ticket.id, e);
                stats.tickets_failed += 1;
            }
        }
    }

    Ok(stats)
}

/// `skb sync`: fetch resolved tickets and their comments, then ingest.
pub async fn run_sync(config: &Config) -> Result<()> {
    let index = VectorIndex::open(config).await?;
    let client = ZendeskClient::new(&config.zendesk)?;

    let support_ids = client.list_support_author_ids().await;

    let tickets = client.list_resolved_tickets().await?;
    println!("sync");
    println!("  resolved tickets: {}", tickets.len());

    let mut paired: Vec<(Ticket, Vec<Comment>)> = Vec::with_capacity(tickets.len());
    let mut fetch_failures = 0u64;
    for ticket in tickets {
        match client.list_comments(ticket.id).await {
            Ok(comments) => paired.push((ticket, comments)),
            Err(e) => {
                eprintln!("Warning: skipping ticket {}: {}", ticket.id, e);
                fetch_failures += 1;
            }
        }
    }

    let stats = ingest_tickets(&index, &config.chunking, &paired, &support_ids).await?;

    println!("  units built: {}", stats.units_built);
    println!("  chunks written: {}", stats.chunks_written);
    if fetch_failures + stats.tickets_failed > 0 {
        println!(
            "  tickets skipped: {}",
            fetch_failures + stats.tickets_failed
        );
    }
    println!("ok");

    index.close().await;
    Ok(())
}

/// `skb clear`: reset the collection to empty. Failures are surfaced — a
/// half-cleared knowledge base must be visible to the operator.
pub async fn run_clear(config: &Config) -> Result<()> {
    let index = VectorIndex::open(config).await?;
    let removed = index.clear().await?;
    println!("clear");
    println!("  collection: {}", index.collection());
    println!("  chunks removed: {}", removed);
    println!("ok");
    index.close().await;
    Ok(())
}

/// `skb stats`: report collection size.
pub async fn run_stats(config: &Config) -> Result<()> {
    let index = VectorIndex::open(config).await?;
    println!("stats");
    println!("  collection: {}", index.collection());
    println!("  chunks: {}", index.count().await?);
    println!("  tickets: {}", index.ticket_count().await?);
    index.close().await;
    Ok(())
}
