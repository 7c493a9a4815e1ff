//! Transcript-to-minutes synthesis core.

pub mod chunker;
pub mod duration;
pub mod parser;
pub mod prompts;
pub mod record;
pub mod synthesizer;
pub mod tokens;

pub use chunker::{chunk_transcript, MAX_CHUNKS};
pub use duration::format_duration;
pub use parser::{parse_completion_json, ChunkExtract};
pub use record::MinutesRecord;
pub use synthesizer::{MinutesSynthesizer, SynthesisOptions, SUMMARY_UNAVAILABLE};
pub use tokens::estimate_tokens;
