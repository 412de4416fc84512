//! # Support KB CLI (`skb`)
//!
//! Command-line interface for the support knowledge base.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `skb init` | Create the SQLite store and run schema migrations |
//! | `skb sync` | Ingest resolved tickets into the knowledge base |
//! | `skb draft` | Draft private replies on all open tickets |
//! | `skb ask "<question>"` | Answer a single question |
//! | `skb repl` | Interactive question loop |
//! | `skb clear` | Delete all stored knowledge |
//! | `skb stats` | Show collection size |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use support_kb::{answer, config, db, ingest, migrate};

/// Support KB — drafts customer support responses grounded in resolved
/// tickets.
#[derive(Parser)]
#[command(
    name = "skb",
    about = "Support KB — a retrieval-augmented drafting assistant for customer support tickets",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/skb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the store schema. Idempotent.
    Init,

    /// Fetch resolved tickets and ingest them into the knowledge base.
    ///
    /// Tickets whose comments cannot be fetched are skipped with a warning;
    /// the rest of the batch still ingests.
    Sync,

    /// Draft a private reply on every open ticket.
    Draft,

    /// Answer a single question from the knowledge base.
    Ask {
        /// The question text.
        question: String,
    },

    /// Interactive question loop. Type 'exit' to quit.
    Repl,

    /// Delete all stored knowledge in the configured collection.
    Clear,

    /// Show chunk and ticket counts for the configured collection.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&cfg.store.path).await?;
            migrate::run_migrations(&pool).await?;
            pool.close().await;
            println!("Store initialized successfully.");
        }
        Commands::Sync => {
            ingest::run_sync(&cfg).await?;
        }
        Commands::Draft => {
            answer::run_draft(&cfg).await?;
        }
        Commands::Ask { question } => {
            answer::run_ask(&cfg, &question).await?;
        }
        Commands::Repl => {
            answer::run_repl(&cfg).await?;
        }
        Commands::Clear => {
            ingest::run_clear(&cfg).await?;
        }
        Commands::Stats => {
            ingest::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
