//! Character-count text splitting with overlap between adjacent chunks.


use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::docqa::pdf::DocumentPage;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk length in characters
    pub chunk_size: usize,
    /// Characters carried over from the tail of the previous chunk
    pub chunk_overlap: usize,
    /// Chunks shorter than this are dropped
    pub min_chunk_chars: usize,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            chunk_size: 1200,
            chunk_overlap: 300,
            min_chunk_chars: 50,
        }
    }
}

/// A slice of document text ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    /// Monotonically increasing id, starting at 0 within a document
    pub id: usize,
    pub text: String,
    pub source: String,
    /// 1-based page the chunk starts on
    pub page_number: usize,
}

/// Split extracted pages into overlapping chunks.
///
/// Chunk ids increase monotonically across the whole document. A chunk is
/// attributed to the page it starts on; chunks never span page boundaries.
#[inline]
pub fn chunk_pages(pages: &[DocumentPage], config: &ChunkingConfig) -> Vec<DocumentChunk> {
    let mut chunks = Vec::new();
    let mut next_id = 0;

    for page in pages {
        for text in split_text(&page.text, config) {
            chunks.push(DocumentChunk {
                id: next_id,
                text,
                source: page.source.clone(),
                page_number: page.page_number,
            });
            next_id += 1;
        }
    }

    debug!(
        "Split {} pages into {} chunks (size {}, overlap {})",
        pages.len(),
        chunks.len(),
        config.chunk_size,
        config.chunk_overlap
    );

    chunks
}

/// Split a single text into chunks of roughly `chunk_size` characters,
/// preferring to break at whitespace near the end of the window.
fn split_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let window_end = (start + config.chunk_size).min(chars.len());
        let break_at = if window_end < chars.len() {
            find_break(&chars, start, window_end, config.chunk_size)
        } else {
            window_end
        };

        let piece: String = chars[start..break_at].iter().collect();
        let trimmed = piece.trim();
        if trimmed.chars().count() >= config.min_chunk_chars {
            pieces.push(trimmed.to_string());
        }

        if break_at >= chars.len() {
            break;
        }

        // Step back by the overlap, but always make forward progress
        start = break_at
            .saturating_sub(config.chunk_overlap)
            .max(start + 1);
    }

    pieces
}

/// Find a whitespace break point in the last fifth of the window, falling
/// back to a hard cut when none exists.
fn find_break(chars: &[char], start: usize, window_end: usize, chunk_size: usize) -> usize {
    let floor = start + chunk_size.saturating_mul(4) / 5;

    (floor..window_end)
        .rev()
        .find(|&i| chars[i] == '\n')
        .or_else(|| (floor..window_end).rev().find(|&i| chars[i].is_whitespace()))
        .map_or(window_end, |pos| pos + 1)
}
