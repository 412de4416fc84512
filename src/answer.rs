//! Response drivers: the core `answer` operation and the CLI flows built on
//! it (one-shot ask, open-ticket drafting, interactive REPL).

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::compose::{self, GENERATION_FAILED_REPLY};
use crate::config::Config;
use crate::index::{self, VectorIndex};
use crate::llm::{ChatModel, OpenRouterChat};
use crate::zendesk::ZendeskClient;

/// Core answer operation: retrieve context for `question` and compose a
/// grounded reply.
///
/// Always returns user-facing text. Retrieval failures are logged and mapped
/// to the generation fallback; composition handles its own failures.
pub async fn answer(
    index: &VectorIndex,
    chat: &dyn ChatModel,
    top_k: usize,
    question: &str,
) -> String {
    let retrieved = match index::retrieve(index, question, top_k).await {
        Ok(chunks) => chunks,
        Err(e) => {
            eprintln!("Warning: retrieval failed: {}", e);
            return GENERATION_FAILED_REPLY.to_string();
        }
    };

    compose::compose(chat, question, &retrieved).await
}

/// `skb ask`: answer a single question on stdout.
pub async fn run_ask(config: &Config, question: &str) -> Result<()> {
    let index = VectorIndex::open(config).await?;
    let chat = OpenRouterChat::new(&config.llm)?;

    let reply = answer(&index, &chat, config.retrieval.top_k, question).await;
    println!("{}", reply);

    index.close().await;
    Ok(())
}

/// `skb draft`: draft a private reply on every open ticket.
///
/// Tickets without a description are skipped; per-ticket failures are logged
/// and do not stop the batch.
pub async fn run_draft(config: &Config) -> Result<()> {
    let index = VectorIndex::open(config).await?;
    let chat = OpenRouterChat::new(&config.llm)?;
    let client = ZendeskClient::new(&config.zendesk)?;

    let author_id = *client
        .list_support_author_ids()
        .await
        .first()
        .unwrap_or(&config.zendesk.default_support_user_id);

    let tickets = client.list_open_tickets().await?;
    println!("draft");
    println!("  open tickets: {}", tickets.len());

    let mut drafted = 0u64;
    let mut skipped = 0u64;

    for ticket in &tickets {
        if ticket.description.trim().is_empty() {
            println!("  ticket {}: no description, skipped", ticket.id);
            skipped += 1;
            continue;
        }

        let reply = answer(&index, &chat, config.retrieval.top_k, &ticket.description).await;

        match client.post_private_comment(ticket.id, &reply, author_id).await {
            Ok(()) => {
                println!("  ticket {}: draft posted", ticket.id);
                drafted += 1;
            }
            Err(e) => {
                eprintln!("Warning: could not post draft to ticket {}: {}", ticket.id, e);
                skipped += 1;
            }
        }
    }

    println!("  drafted: {}", drafted);
    if skipped > 0 {
        println!("  skipped: {}", skipped);
    }
    println!("ok");

    index.close().await;
    Ok(())
}

/// `skb repl`: interactive question loop. `exit` quits.
pub async fn run_repl(config: &Config) -> Result<()> {
    let index = VectorIndex::open(config).await?;
    let chat = OpenRouterChat::new(&config.llm)?;

    if index.count().await? == 0 {
        println!("Knowledge base is empty. Run `skb sync` to ingest resolved tickets first.");
    }

    println!("Support assistant ready. Type 'exit' to quit.");

    let stdin = io::stdin();
    loop {
        print!("\nEnter your question: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        let reply = answer(&index, &chat, config.retrieval.top_k, question).await;
        println!("\n{}", reply);
    }

    index.close().await;
    Ok(())
}
