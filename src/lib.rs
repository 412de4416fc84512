//! # Support KB
//!
//! A retrieval-augmented knowledge base that drafts customer support
//! responses from resolved tickets.
//!
//! Resolved tickets and their support-authored comments are converted into
//! question/answer knowledge units, chunked, embedded, and stored in a
//! persistent vector index. Open tickets are answered by retrieving the
//! nearest stored chunks and composing a grounded prompt for a chat model.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────────────┐   ┌───────────┐
//! │ Ticketing │──▶│ Knowledge units →     │──▶│  SQLite    │
//! │   API     │   │ chunks → embeddings   │   │ vector idx │
//! └──────────┘   └───────────────────────┘   └─────┬─────┘
//!                                                  │
//!                     question ──▶ retrieve ──▶ compose ──▶ answer
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`knowledge`] | Knowledge unit builder |
//! | [`chunk`] | Fixed-size text chunking with overlap |
//! | [`embedding`] | Embedding capability and vector utilities |
//! | [`index`] | Persistent vector index and retriever |
//! | [`llm`] | Chat completion capability |
//! | [`compose`] | Grounded prompt assembly and fallbacks |
//! | [`ingest`] | Write-path orchestration |
//! | [`answer`] | Read-path orchestration (ask, draft, repl) |
//! | [`zendesk`] | Ticketing system client |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod answer;
pub mod chunk;
pub mod compose;
pub mod config;
pub mod db;
pub mod embedding;
pub mod index;
pub mod ingest;
pub mod knowledge;
pub mod llm;
pub mod migrate;
pub mod models;
pub mod zendesk;
