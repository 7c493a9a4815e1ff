//! The structured minutes output.

use serde::{Deserialize, Serialize};

use super::duration::format_duration;

/// Completed meeting minutes.
///
/// Every synthesis path produces all six fields; a record with a missing
/// field is unrepresentable. Callers may persist or render the record but
/// the core never mutates one after returning it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinutesRecord {
    pub title: String,
    pub duration: String,
    pub summary: String,
    pub action_points: Vec<String>,
    pub transcription: String,
    pub speakers: Vec<String>,
}

impl MinutesRecord {
    /// Minimal record used whenever synthesis cannot produce anything
    /// better: empty title/summary/action points, inputs carried through.
    pub fn fallback(transcript: &str, speakers: &[String], duration_seconds: f64) -> Self {
        Self {
            title: String::new(),
            duration: format_duration(duration_seconds),
            summary: String::new(),
            action_points: Vec::new(),
            transcription: transcript.to_string(),
            speakers: speakers.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_carries_inputs_and_defaults() {
        let speakers = vec!["Speaker 1".to_string(), "Speaker 2".to_string()];
        let record = MinutesRecord::fallback("hello there", &speakers, 0.0);
        assert_eq!(record.title, "");
        assert_eq!(record.duration, "00:00");
        assert_eq!(record.summary, "");
        assert!(record.action_points.is_empty());
        assert_eq!(record.transcription, "hello there");
        assert_eq!(record.speakers, speakers);
    }

    #[test]
    fn record_serializes_with_all_six_fields() {
        let record = MinutesRecord::fallback("", &[], 90.0);
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "title",
            "duration",
            "summary",
            "action_points",
            "transcription",
            "speakers",
        ] {
            assert!(obj.contains_key(key), "missing field {key}");
        }
        assert_eq!(obj["duration"], "01:30");
    }
}
