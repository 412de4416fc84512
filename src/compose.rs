//! Response composer.
//!
//! Assembles a grounded two-role prompt from retrieved chunks and invokes
//! the chat capability. Every failure on this path is converted into one of
//! two fixed user-facing replies; nothing here returns an error to the end
//! user.

use crate::llm::ChatModel;
use crate::models::ScoredChunk;

/// Reply when retrieval produced no context. No answer is generated without
/// retrieved context.
pub const NO_CONTEXT_REPLY: &str = "I apologize, but I don't have enough context to provide a \
specific answer. Could you please provide more details about your question?";

/// Reply when the chat capability failed or returned a malformed result.
pub const GENERATION_FAILED_REPLY: &str = "I apologize, but I encountered an error while \
generating the response. Please try again.";

/// Join retrieved chunk texts into a context block, retriever order,
/// separated by blank lines.
pub fn build_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the system instruction with the context block interpolated.
pub fn system_prompt(context: &str) -> String {
    format!(
        "You are a helpful customer support agent. Use the following similar support \
conversations to help answer the new question. Keep your response professional and concise. \
If the context doesn't contain relevant information, acknowledge that and ask for more \
details.\n\nSimilar conversations:\n{context}"
    )
}

/// Compose a grounded answer to `question` from the retrieved chunks.
///
/// - No chunks → [`NO_CONTEXT_REPLY`].
/// - Chat error or empty reply → [`GENERATION_FAILED_REPLY`], with the
///   underlying error logged.
/// - Otherwise the generated text, verbatim.
pub async fn compose(chat: &dyn ChatModel, question: &str, retrieved: &[ScoredChunk]) -> String {
    if retrieved.is_empty() {
        return NO_CONTEXT_REPLY.to_string();
    }

    let system = system_prompt(&build_context(retrieved));

    match chat.complete(&system, question).await {
        Ok(reply) if !reply.trim().is_empty() => reply,
        Ok(_) => GENERATION_FAILED_REPLY.to_string(),
        Err(e) => {
            eprintln!("Warning: chat completion failed: {}", e);
            GENERATION_FAILED_REPLY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chunk, TicketStatus};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn scored(text: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                id: "c1".to_string(),
                ticket_id: 1,
                status: TicketStatus::Solved,
                chunk_index: 0,
                text: text.to_string(),
                hash: String::new(),
            },
            score: 0.9,
        }
    }

    /// Chat double that records the prompt it was given.
    struct RecordingChat {
        reply: Result<String, String>,
        seen: Mutex<Option<(String, String)>>,
    }

    impl RecordingChat {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(None),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatModel for RecordingChat {
        async fn complete(&self, system: &str, user: &str) -> Result<String> {
            *self.seen.lock().unwrap() = Some((system.to_string(), user.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(anyhow::anyhow!("{}", message)),
            }
        }
    }

    #[test]
    fn test_build_context_blank_line_separated() {
        let chunks = vec![scored("first"), scored("second")];
        assert_eq!(build_context(&chunks), "first\n\nsecond");
    }

    #[tokio::test]
    async fn test_empty_retrieval_returns_no_context_reply() {
        let chat = RecordingChat::replying("should not be called");
        let reply = compose(&chat, "How do I reset my password?", &[]).await;
        assert_eq!(reply, NO_CONTEXT_REPLY);
        assert!(chat.seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_question_passed_verbatim_and_context_interpolated() {
        let chat = RecordingChat::replying("Here is what to do.");
        let chunks = vec![scored("Question: X\nAnswer: Y")];
        let reply = compose(&chat, "my printer is broken", &chunks).await;
        assert_eq!(reply, "Here is what to do.");

        let seen = chat.seen.lock().unwrap();
        let (system, user) = seen.as_ref().unwrap();
        assert_eq!(user, "my printer is broken");
        assert!(system.contains("Question: X\nAnswer: Y"));
        assert!(system.starts_with("You are a helpful customer support agent."));
    }

    #[tokio::test]
    async fn test_chat_error_returns_generation_failed_reply() {
        let chat = RecordingChat::failing("upstream 503");
        let reply = compose(&chat, "q", &[scored("ctx")]).await;
        assert_eq!(reply, GENERATION_FAILED_REPLY);
    }

    #[tokio::test]
    async fn test_blank_reply_returns_generation_failed_reply() {
        let chat = RecordingChat::replying("   \n");
        let reply = compose(&chat, "q", &[scored("ctx")]).await;
        assert_eq!(reply, GENERATION_FAILED_REPLY);
    }
}
