//! Approximate token counting for chunk sizing.
//!
//! One token is roughly four characters of English text. Callers use the
//! estimate only for sizing decisions and tolerate ±30% error; nothing here
//! is billing-accurate.

pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_zero_tokens() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn estimate_is_len_over_four() {
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcdefg"), 1);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        let text = "x".repeat(4000);
        assert_eq!(estimate_tokens(&text), 1000);
    }
}
