//! The minutes synthesis orchestrator.
//!
//! One `synthesize` call takes a raw transcript plus speaker labels and a
//! duration, runs title extraction and either single-shot or two-stage
//! (chunk then consolidate) summarization against the completion backend,
//! and always hands back a complete `MinutesRecord`. Failures degrade:
//! a failed title falls back to a timestamp, a failed chunk contributes
//! nothing, and anything that escapes local handling collapses to the
//! fallback record. Nothing propagates to the caller.

use anyhow::Result;
use chrono::Local;
use std::sync::Arc;
use tracing::{error, info};

use crate::completion::{
    complete_with_retry, CompletionBackend, CompletionRequest, Message, RetryPolicy,
};
use crate::config::Config;

use super::chunker::chunk_transcript;
use super::duration::format_duration;
use super::parser::parse_completion_json;
use super::prompts::{self, ChunkPosition};
use super::record::MinutesRecord;
use super::tokens::estimate_tokens;

/// Shown as the summary when consolidation produced nothing usable.
pub const SUMMARY_UNAVAILABLE: &str = "A summary could not be generated due to API limitations. Please check the transcript for meeting content.";

/// Ceiling on the per-request transcript budget regardless of context size.
const MAX_SAFE_CHUNK_TOKENS: usize = 3000;

/// How much of the transcript head feeds title extraction.
const TITLE_SAMPLE_CHARS: usize = 1000;

const TITLE_OUTPUT_TOKENS: usize = 20;

const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Tunables read once at startup; owned by the hosting application.
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    pub model: String,
    pub context_limit: usize,
    pub max_output_tokens: usize,
    pub overlap_tokens: usize,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            context_limit: 8000,
            max_output_tokens: 800,
            overlap_tokens: 250,
        }
    }
}

impl SynthesisOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.openai.resolve_model(),
            context_limit: config.synthesis.context_limit,
            max_output_tokens: config.synthesis.max_output_tokens,
            overlap_tokens: config.synthesis.overlap_tokens,
        }
    }

    /// Largest transcript slice a single request may carry.
    fn safe_chunk_size(&self) -> usize {
        self.context_limit
            .saturating_sub(self.max_output_tokens)
            .min(MAX_SAFE_CHUNK_TOKENS)
    }
}

pub struct MinutesSynthesizer {
    backend: Arc<dyn CompletionBackend>,
    options: SynthesisOptions,
    retry: RetryPolicy,
}

impl MinutesSynthesizer {
    pub fn new(backend: Arc<dyn CompletionBackend>, options: SynthesisOptions) -> Self {
        Self {
            backend,
            options,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the backoff schedule (tests use a zero-delay policy).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Produce minutes for a transcript. Never fails: every path, including
    /// backend exhaustion and parse garbage, yields a complete record.
    pub async fn synthesize(
        &self,
        transcript: &str,
        speakers: &[String],
        duration_seconds: f64,
    ) -> MinutesRecord {
        if transcript.is_empty() {
            return MinutesRecord::fallback(transcript, speakers, duration_seconds);
        }
        if !self.backend.is_available() {
            error!(
                "Completion backend {} is not available (missing credential?)",
                self.backend.name()
            );
            return MinutesRecord::fallback(transcript, speakers, duration_seconds);
        }

        match self.run(transcript, speakers, duration_seconds).await {
            Ok(record) => record,
            Err(err) => {
                error!("Error generating meeting minutes: {err:#}");
                MinutesRecord::fallback(transcript, speakers, duration_seconds)
            }
        }
    }

    async fn run(
        &self,
        transcript: &str,
        speakers: &[String],
        duration_seconds: f64,
    ) -> Result<MinutesRecord> {
        let title = self.extract_title(transcript).await;
        let duration = format_duration(duration_seconds);
        let estimated_tokens = estimate_tokens(transcript);
        let safe_chunk_size = self.options.safe_chunk_size();

        if estimated_tokens > safe_chunk_size {
            info!(
                "Transcript too large ({} tokens), processing in two stages",
                estimated_tokens
            );
            self.two_stage(
                transcript,
                speakers,
                title,
                duration_seconds,
                safe_chunk_size,
            )
            .await
        } else {
            let content = self
                .complete(
                    prompts::FULL_TRANSCRIPT_PROMPT,
                    transcript,
                    self.options.max_output_tokens,
                )
                .await?;
            let extract = parse_completion_json(&content);
            Ok(MinutesRecord {
                title,
                duration,
                summary: extract.summary,
                action_points: extract.action_points,
                transcription: transcript.to_string(),
                speakers: speakers.to_vec(),
            })
        }
    }

    /// Chunked summarization followed by one consolidation pass.
    async fn two_stage(
        &self,
        transcript: &str,
        speakers: &[String],
        title: String,
        duration_seconds: f64,
        safe_chunk_size: usize,
    ) -> Result<MinutesRecord> {
        let duration = format_duration(duration_seconds);
        let chunks = chunk_transcript(transcript, safe_chunk_size, self.options.overlap_tokens);
        let total = chunks.len();

        let mut chunk_summaries: Vec<String> = Vec::new();
        let mut chunk_actions: Vec<String> = Vec::new();

        for (i, chunk) in chunks.iter().enumerate() {
            let position = ChunkPosition::for_index(i, total);
            let system = prompts::chunk_prompt(position);
            match self
                .complete(&system, chunk, self.options.max_output_tokens)
                .await
            {
                Ok(content) => {
                    let extract = parse_completion_json(&content);
                    if !extract.summary.trim().is_empty() {
                        chunk_summaries.push(extract.summary);
                    }
                    chunk_actions.extend(extract.action_points);
                }
                Err(err) => {
                    // A dead chunk contributes nothing; keep going.
                    error!("Error processing chunk {}/{}: {}", i + 1, total, err);
                }
            }
        }

        // If every chunk came back empty, treat the whole synthesis as
        // failed rather than returning a near-empty "successful" record.
        if chunk_summaries.is_empty() {
            return Ok(MinutesRecord::fallback(
                transcript,
                speakers,
                duration_seconds,
            ));
        }

        let joined = chunk_summaries.join(" ");
        let content = self
            .complete(
                prompts::CONSOLIDATION_PROMPT,
                &joined,
                self.options.max_output_tokens,
            )
            .await?;
        let consolidated = parse_completion_json(&content);

        let summary = if consolidated.summary.trim().is_empty() {
            SUMMARY_UNAVAILABLE.to_string()
        } else {
            consolidated.summary
        };
        let action_points = if chunk_actions.is_empty() {
            consolidated.action_points
        } else {
            dedup_preserving_order(chunk_actions)
        };

        Ok(MinutesRecord {
            title,
            duration,
            summary,
            action_points,
            transcription: transcript.to_string(),
            speakers: speakers.to_vec(),
        })
    }

    /// Title from the transcript head; any failure falls back to a
    /// timestamp-based title and does not abort synthesis.
    async fn extract_title(&self, transcript: &str) -> String {
        let sample = head(transcript, TITLE_SAMPLE_CHARS);
        match self
            .complete(prompts::TITLE_PROMPT, sample, TITLE_OUTPUT_TOKENS)
            .await
        {
            Ok(content) => content.trim().trim_matches('"').to_string(),
            Err(err) => {
                error!("Title generation failed: {err}");
                format!("Meeting {}", Local::now().format("%d %b %Y %H:%M"))
            }
        }
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_output_tokens: usize,
    ) -> Result<String, crate::completion::CompletionError> {
        let request = CompletionRequest {
            model: self.options.model.clone(),
            messages: vec![Message::system(system), Message::user(user)],
            max_output_tokens,
            temperature: Some(DEFAULT_TEMPERATURE),
        };
        complete_with_retry(self.backend.as_ref(), &request, &self.retry).await
    }
}

/// First occurrence wins; original order kept.
fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

/// Prefix of at most `max_chars` characters, respecting char boundaries.
fn head(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let items = vec!["b", "a", "b", "c", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedup_preserving_order(items), vec!["b", "a", "c"]);
    }

    #[test]
    fn head_respects_char_boundaries() {
        assert_eq!(head("abcdef", 3), "abc");
        assert_eq!(head("ab", 10), "ab");
        let accented = "café résumé";
        assert_eq!(head(accented, 4), "café");
    }

    #[test]
    fn safe_chunk_size_is_capped_at_3000() {
        let options = SynthesisOptions::default();
        // 8000 - 800 = 7200, capped.
        assert_eq!(options.safe_chunk_size(), 3000);

        let small = SynthesisOptions {
            context_limit: 2000,
            max_output_tokens: 800,
            ..SynthesisOptions::default()
        };
        assert_eq!(small.safe_chunk_size(), 1200);
    }
}
