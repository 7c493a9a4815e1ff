//! Tolerant extraction of structured results from completion output.
//!
//! Generation backends routinely wrap the requested JSON object in prose or
//! code fences despite instructions. The parser pulls out the first balanced
//! looking `{...}` span before giving up, and a failed parse yields the empty
//! extract rather than an error — the caller decides how to degrade.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

/// Summary and action points extracted from one completion response.
#[derive(Debug, Clone, Default)]
pub struct ChunkExtract {
    pub summary: String,
    pub action_points: Vec<String>,
}

impl ChunkExtract {
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty() && self.action_points.is_empty()
    }
}

fn json_span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)(\{.*\})").expect("valid regex"))
}

/// Parse a completion response into a `ChunkExtract`. Never fails.
pub fn parse_completion_json(raw: &str) -> ChunkExtract {
    let candidate = json_span_regex()
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    match try_parse(candidate).or_else(|| try_parse(raw)) {
        Some(extract) => extract,
        None => {
            debug!("Unable to parse completion response as JSON: {:.200}", raw);
            ChunkExtract::default()
        }
    }
}

fn try_parse(text: &str) -> Option<ChunkExtract> {
    let value: Value = serde_json::from_str(text).ok()?;
    let obj = value.as_object()?;

    let summary = obj
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    // Non-list or mixed-type action_points degrade to whatever strings exist.
    let action_points = obj
        .get("action_points")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(ChunkExtract {
        summary,
        action_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_json() {
        let extract =
            parse_completion_json(r#"{"summary": "All good", "action_points": ["A", "B"]}"#);
        assert_eq!(extract.summary, "All good");
        assert_eq!(extract.action_points, vec!["A", "B"]);
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let raw = "Here are the minutes you asked for:\n```json\n{\"summary\": \"Quarterly review\", \"action_points\": []}\n```\nLet me know if you need more.";
        let extract = parse_completion_json(raw);
        assert_eq!(extract.summary, "Quarterly review");
        assert!(extract.action_points.is_empty());
    }

    #[test]
    fn garbage_yields_empty_extract() {
        let extract = parse_completion_json("I could not process that transcript, sorry.");
        assert!(extract.is_empty());
    }

    #[test]
    fn truncated_json_yields_empty_extract() {
        let extract = parse_completion_json(r#"{"summary": "cut off mid"#);
        assert!(extract.is_empty());
    }

    #[test]
    fn missing_fields_default() {
        let extract = parse_completion_json(r#"{"summary": "only summary"}"#);
        assert_eq!(extract.summary, "only summary");
        assert!(extract.action_points.is_empty());

        let extract = parse_completion_json(r#"{"action_points": ["do it"]}"#);
        assert_eq!(extract.summary, "");
        assert_eq!(extract.action_points, vec!["do it"]);
    }

    #[test]
    fn non_string_action_points_are_skipped() {
        let extract =
            parse_completion_json(r#"{"summary": "s", "action_points": ["ok", 42, null]}"#);
        assert_eq!(extract.action_points, vec!["ok"]);
    }
}
