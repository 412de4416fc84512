//! Fixed-size text chunker with overlap.
//!
//! Splits knowledge unit text into [`Chunk`]s bounded by a configurable
//! character count, with a configurable overlap between consecutive chunks.
//! Splitting is purely length-based; no sentence or paragraph awareness.
//!
//! Each chunk receives a UUID, contiguous indices starting at 0, a SHA-256
//! hash of its text, and its source unit's ticket metadata.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::models::{Chunk, KnowledgeUnit};

/// Split text into pieces of at most `max_chars` characters, where each
/// piece after the first starts `overlap` characters before the end of the
/// previous one. Counts characters, not bytes, so multi-byte text never
/// splits mid-character.
///
/// `overlap` must be less than `max_chars` or the walk would not advance.
/// Empty input yields no pieces.
pub fn split_text(text: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    assert!(max_chars > 0, "max_chars must be > 0");
    assert!(overlap < max_chars, "overlap must be < max_chars");

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    if chars.len() <= max_chars {
        return vec![text.to_string()];
    }

    let step = max_chars - overlap;
    let mut pieces = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + max_chars).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    pieces
}

/// Split a knowledge unit into chunks, stamping each with the unit's
/// ticket id and status and a contiguous index.
pub fn split_unit(unit: &KnowledgeUnit, config: &ChunkingConfig) -> Vec<Chunk> {
    split_text(&unit.text, config.max_chars, config.overlap_chars)
        .into_iter()
        .enumerate()
        .map(|(i, text)| make_chunk(unit, i as i64, text))
        .collect()
}

/// Split a batch of knowledge units; chunk order follows unit order.
pub fn split_units(units: &[KnowledgeUnit], config: &ChunkingConfig) -> Vec<Chunk> {
    units
        .iter()
        .flat_map(|unit| split_unit(unit, config))
        .collect()
}

fn make_chunk(unit: &KnowledgeUnit, index: i64, text: String) -> Chunk {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    Chunk {
        id: Uuid::new_v4().to_string(),
        ticket_id: unit.ticket_id,
        status: unit.status,
        chunk_index: index,
        text,
        hash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TicketStatus;

    fn unit(text: &str) -> KnowledgeUnit {
        KnowledgeUnit {
            text: text.to_string(),
            ticket_id: 42,
            status: TicketStatus::Solved,
        }
    }

    fn cfg(max_chars: usize, overlap_chars: usize) -> ChunkingConfig {
        ChunkingConfig {
            max_chars,
            overlap_chars,
        }
    }

    #[test]
    fn test_short_text_single_piece() {
        let pieces = split_text("hello world", 1000, 200);
        assert_eq!(pieces, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_empty_text_no_pieces() {
        assert!(split_text("", 1000, 200).is_empty());
    }

    #[test]
    fn test_pieces_respect_max_chars() {
        let text = "a".repeat(2500);
        for piece in split_text(&text, 1000, 200) {
            assert!(piece.chars().count() <= 1000);
        }
    }

    #[test]
    fn test_consecutive_pieces_overlap() {
        let text: String = ('a'..='z').cycle().take(250).collect();
        let pieces = split_text(&text, 100, 20);
        assert!(pieces.len() > 1);
        for pair in pieces.windows(2) {
            let prev: Vec<char> = pair[0].chars().collect();
            let tail: String = prev[prev.len() - 20..].iter().collect();
            assert!(
                pair[1].starts_with(&tail),
                "next piece must begin with the previous piece's last 20 chars"
            );
        }
    }

    #[test]
    fn test_full_coverage_no_gaps() {
        let text: String = ('0'..='9').cycle().take(537).collect();
        let pieces = split_text(&text, 100, 20);
        // With step = 80, piece i must start at offset i * 80
        let chars: Vec<char> = text.chars().collect();
        for (i, piece) in pieces.iter().enumerate() {
            let start = i * 80;
            let expected: String = chars[start..(start + 100).min(chars.len())].iter().collect();
            assert_eq!(piece, &expected);
        }
        // Last piece must reach the end of the text
        assert!(text.ends_with(pieces.last().unwrap()));
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundary() {
        let text = "é".repeat(150);
        let pieces = split_text(&text, 100, 10);
        assert!(pieces.len() > 1);
        for piece in &pieces {
            assert!(piece.chars().count() <= 100);
            assert!(piece.chars().all(|c| c == 'é'));
        }
    }

    #[test]
    fn test_split_unit_stamps_metadata_and_indices() {
        let u = unit(&"x".repeat(350));
        let chunks = split_unit(&u, &cfg(100, 20));
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as i64);
            assert_eq!(chunk.ticket_id, 42);
            assert_eq!(chunk.status, TicketStatus::Solved);
            assert!(!chunk.hash.is_empty());
        }
    }

    #[test]
    fn test_split_units_preserves_order() {
        let units = vec![unit("first unit"), unit("second unit")];
        let chunks = split_units(&units, &cfg(1000, 200));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "first unit");
        assert_eq!(chunks[1].text, "second unit");
    }
}
