//! Model-family quirks for the chat completions API.
//!
//! Newer model families renamed the token-limit request parameter and some
//! reject an explicit temperature. These tables are data, not logic — extend
//! the lists as new model identifiers appear rather than touching the
//! synthesizer.

/// Model-id substrings that take `max_completion_tokens`.
const NEWER_FAMILIES: &[&str] = &["o3", "gpt-4o", "gpt-4.5"];

/// Request parameter name for the output token limit.
pub fn token_param_name(model: &str) -> &'static str {
    if NEWER_FAMILIES.iter().any(|f| model.contains(f)) {
        "max_completion_tokens"
    } else {
        "max_tokens"
    }
}

/// Whether the model accepts an explicit `temperature`.
pub fn supports_temperature(model: &str) -> bool {
    !model.to_lowercase().contains("o3-mini")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn older_models_use_max_tokens() {
        assert_eq!(token_param_name("gpt-3.5-turbo"), "max_tokens");
        assert_eq!(token_param_name("gpt-4-turbo"), "max_tokens");
    }

    #[test]
    fn newer_families_use_max_completion_tokens() {
        assert_eq!(token_param_name("gpt-4o"), "max_completion_tokens");
        assert_eq!(token_param_name("gpt-4o-mini"), "max_completion_tokens");
        assert_eq!(token_param_name("gpt-4.5-preview"), "max_completion_tokens");
        assert_eq!(token_param_name("o3"), "max_completion_tokens");
        assert_eq!(token_param_name("o3-mini"), "max_completion_tokens");
    }

    #[test]
    fn temperature_dropped_for_o3_mini_only() {
        assert!(supports_temperature("gpt-4o"));
        assert!(supports_temperature("gpt-3.5-turbo"));
        assert!(supports_temperature("o3"));
        assert!(!supports_temperature("o3-mini"));
        assert!(!supports_temperature("O3-Mini"));
    }
}
