//! Core data models for the support knowledge base.
//!
//! These types represent the tickets and comments fetched from the ticketing
//! system, the knowledge units derived from them, and the chunks that flow
//! through the embedding and retrieval pipeline.

use std::fmt;

use serde::Deserialize;

/// Lifecycle state of a ticket, as reported by the ticketing system.
///
/// Unrecognized values deserialize to [`TicketStatus::Unknown`] rather than
/// failing the whole fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    New,
    Open,
    Pending,
    Hold,
    Solved,
    Closed,
    #[serde(other)]
    Unknown,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::Open => "open",
            TicketStatus::Pending => "pending",
            TicketStatus::Hold => "hold",
            TicketStatus::Solved => "solved",
            TicketStatus::Closed => "closed",
            TicketStatus::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> TicketStatus {
        match value {
            "new" => TicketStatus::New,
            "open" => TicketStatus::Open,
            "pending" => TicketStatus::Pending,
            "hold" => TicketStatus::Hold,
            "solved" => TicketStatus::Solved,
            "closed" => TicketStatus::Closed,
            _ => TicketStatus::Unknown,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ticket as returned by the ticketing system. Read-only input.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub status: TicketStatus,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// A comment on a ticket. Read-only input.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: i64,
    pub author_id: i64,
    pub body: String,
    #[serde(default)]
    pub public: bool,
}

/// A derived question/answer record built from a resolved ticket and its
/// support-authored comments. Zero or one per ticket.
#[derive(Debug, Clone)]
pub struct KnowledgeUnit {
    /// `"Question: {description}\nAnswer: {bodies joined by single space}"`.
    /// The template is a contract; retrieval quality depends on it.
    pub text: String,
    pub ticket_id: i64,
    pub status: TicketStatus,
}

/// A length-bounded slice of a knowledge unit's text. The unit of storage
/// in the vector index; carries its source unit's metadata.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: String,
    pub ticket_id: i64,
    pub status: TicketStatus,
    pub chunk_index: i64,
    pub text: String,
    pub hash: String,
}

/// A chunk returned from similarity search, with its cosine score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f64,
}
