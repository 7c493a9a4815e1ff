//! Splitting an over-long transcript into bounded, overlapping chunks.
//!
//! Chunking is a pure function of its inputs: no randomness, no I/O. Chunks
//! follow paragraph (newline) boundaries, falling back to sentence
//! boundaries for paragraphs that alone exceed the budget. Each chunk after
//! the first is seeded with a bounded tail of the previous chunk so context
//! survives the boundary, and the total number of chunks is capped so the
//! number of completion calls stays bounded regardless of input size.

use tracing::{info, warn};

use super::tokens::estimate_tokens;

/// Hard cap on produced chunks; bounds completion calls for any input.
pub const MAX_CHUNKS: usize = 12;

/// Accumulates units into one chunk, tracking the character length the
/// joined chunk will have (units plus newline separators) so the token
/// estimate of the finished chunk matches what was budgeted.
#[derive(Default)]
struct ChunkBuilder {
    units: Vec<String>,
    chars: usize,
}

impl ChunkBuilder {
    fn chars_with(&self, unit: &str) -> usize {
        if self.units.is_empty() {
            unit.len()
        } else {
            self.chars + 1 + unit.len()
        }
    }

    fn fits(&self, unit: &str, max_tokens: usize) -> bool {
        self.chars_with(unit) / 4 <= max_tokens
    }

    fn push(&mut self, unit: &str) {
        self.chars = self.chars_with(unit);
        self.units.push(unit.to_string());
    }

    fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn finish(&mut self) -> String {
        self.chars = 0;
        std::mem::take(&mut self.units).join("\n")
    }
}

/// Split `transcript` into ordered chunks of at most `max_chunk_tokens`
/// estimated tokens, each seeded with up to `overlap_tokens` of trailing
/// context from its predecessor.
///
/// A single sentence over the budget is kept intact as its own chunk rather
/// than truncated.
pub fn chunk_transcript(
    transcript: &str,
    max_chunk_tokens: usize,
    overlap_tokens: usize,
) -> Vec<String> {
    info!(
        "Chunking transcript of {} chars (est. {} tokens)",
        transcript.len(),
        estimate_tokens(transcript)
    );

    if estimate_tokens(transcript) <= max_chunk_tokens {
        info!("Transcript fits in single chunk");
        return vec![transcript.to_string()];
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = ChunkBuilder::default();
    let mut overlap_text = String::new();

    for paragraph in transcript.split('\n') {
        if paragraph.trim().is_empty() {
            continue;
        }

        if estimate_tokens(paragraph) > max_chunk_tokens {
            // Paragraph alone blows the budget: pack sentence by sentence.
            // A lone sentence still over budget stands as its own chunk.
            for sentence in split_sentences(paragraph) {
                if current.fits(sentence, max_chunk_tokens) {
                    current.push(sentence);
                } else {
                    if !current.is_empty() {
                        chunks.push(current.finish());
                    }
                    current.push(sentence);
                }
                overlap_text = sentence.to_string();
            }
        } else if !current.fits(paragraph, max_chunk_tokens) && !current.is_empty() {
            chunks.push(current.finish());
            if let Some(seed) = overlap_seed(&overlap_text, overlap_tokens) {
                // Seed only when the overlap still leaves room for the
                // paragraph that forced the split.
                if (seed.len() + 1 + paragraph.len()) / 4 <= max_chunk_tokens {
                    current.push(&seed);
                }
            }
            current.push(paragraph);
            overlap_text = paragraph.to_string();
        } else {
            current.push(paragraph);
            if estimate_tokens(paragraph) <= overlap_tokens {
                overlap_text = paragraph.to_string();
            } else if let Some(tail) = trailing_sentences(paragraph, overlap_tokens) {
                overlap_text = tail;
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current.finish());
    }

    cap_chunks(chunks)
}

/// Split on `.`, `!`, `?` followed by whitespace, keeping the terminator.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') {
            let mut j = i + 1;
            let mut saw_space = false;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                saw_space = true;
                j += 1;
            }
            if saw_space {
                sentences.push(&text[start..=i]);
                start = j;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Context carried into the next chunk, bounded by the overlap budget.
fn overlap_seed(overlap_text: &str, overlap_tokens: usize) -> Option<String> {
    if overlap_tokens == 0 || overlap_text.is_empty() {
        return None;
    }
    if estimate_tokens(overlap_text) <= overlap_tokens {
        return Some(overlap_text.to_string());
    }
    trailing_sentences(overlap_text, overlap_tokens)
}

/// Greedy suffix of trailing sentences that fits the overlap budget.
fn trailing_sentences(paragraph: &str, overlap_tokens: usize) -> Option<String> {
    let sentences = split_sentences(paragraph);
    let mut candidate = String::new();
    for sentence in sentences.iter().rev() {
        let extended = format!("{sentence} {candidate}");
        if estimate_tokens(&extended) <= overlap_tokens {
            candidate = extended;
        } else {
            break;
        }
    }
    let candidate = candidate.trim().to_string();
    (!candidate.is_empty()).then_some(candidate)
}

/// Merge adjacent chunks groupwise until at most `MAX_CHUNKS` remain.
fn cap_chunks(chunks: Vec<String>) -> Vec<String> {
    if chunks.len() <= MAX_CHUNKS {
        return chunks;
    }
    warn!("Consolidating {} chunks to {}", chunks.len(), MAX_CHUNKS);
    let group_size = chunks.len() / MAX_CHUNKS + usize::from(chunks.len() % MAX_CHUNKS > 0);
    let mut consolidated = Vec::new();
    for group in chunks.chunks(group_size) {
        consolidated.push(group.join("\n"));
        if consolidated.len() >= MAX_CHUNKS {
            break;
        }
    }
    consolidated
}
