//! Greedy paragraph accumulation chunker.

use docdex_core::{ChunkError, Result};

/// Splits text into chunks along paragraph boundaries.
///
/// Paragraphs (newline-separated lines) are greedily accumulated into a
/// space-joined buffer; the buffer is flushed as a chunk whenever adding
/// the next paragraph would reach `max_length`. The bound is best-effort:
/// a single paragraph that is itself `>= max_length` becomes one oversized
/// chunk, which is accepted behavior rather than an error.
#[derive(Debug, Clone)]
pub struct ParagraphChunker {
    max_length: usize,
}

impl ParagraphChunker {
    /// Create a chunker with the given maximum chunk length in characters.
    pub fn new(max_length: usize) -> Result<Self> {
        if max_length == 0 {
            return Err(ChunkError::InvalidConfig(
                "max_length must be greater than zero".to_string(),
            )
            .into());
        }
        Ok(Self { max_length })
    }

    /// The configured maximum chunk length.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Split `text` into chunks, each shorter than `max_length` except for
    /// oversized single paragraphs.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut buffer = String::new();

        for paragraph in text.lines() {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            if buffer.is_empty() {
                buffer.push_str(paragraph);
                continue;
            }

            // +1 for the joining space
            if buffer.chars().count() + 1 + paragraph.chars().count() >= self.max_length {
                chunks.push(std::mem::take(&mut buffer));
                buffer.push_str(paragraph);
            } else {
                buffer.push(' ');
                buffer.push_str(paragraph);
            }
        }

        if !buffer.is_empty() {
            chunks.push(buffer);
        }

        chunks
    }
}
