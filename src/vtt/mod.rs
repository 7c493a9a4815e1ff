//! Teams WEBVTT caption parsing.
//!
//! Produces the speaker-attributed transcript text and the set of speaker
//! labels that the synthesis core consumes. Cue timing lines, cue numbers,
//! and the WEBVTT header are discarded; dialogue keeps its `Speaker: text`
//! attribution where one is recognised.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

fn speaker_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"^(Speaker \d+):\s*(.*)$").expect("valid regex"),
            Regex::new(r"^(Person [A-Z].*?):\s*(.*)$").expect("valid regex"),
            Regex::new(r"^([^:]+):\s*(.*)$").expect("valid regex"),
        ]
    })
}

/// Parse a Teams VTT caption file into `(transcript, speakers)`.
pub fn parse_vtt_file(path: &Path) -> Result<(String, Vec<String>)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read VTT file {path:?}"))?;
    Ok(parse_vtt_content(&content))
}

/// Parse VTT caption content. Speaker labels come back sorted; the
/// transcript is the space-joined dialogue in caption order.
pub fn parse_vtt_content(content: &str) -> (String, Vec<String>) {
    let mut transcript_lines: Vec<String> = Vec::new();
    let mut speakers: BTreeSet<String> = BTreeSet::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty()
            || line.contains("-->")
            || line.chars().all(|c| c.is_ascii_digit())
            || line == "WEBVTT"
        {
            continue;
        }

        let mut matched = false;
        for pattern in speaker_patterns() {
            if let Some(captures) = pattern.captures(line) {
                let speaker = captures[1].trim().to_string();
                let dialogue = &captures[2];
                transcript_lines.push(format!("{speaker}: {dialogue}"));
                speakers.insert(speaker);
                matched = true;
                break;
            }
        }
        if !matched {
            transcript_lines.push(line.to_string());
        }
    }

    let transcript = transcript_lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    (transcript, speakers.into_iter().collect())
}
