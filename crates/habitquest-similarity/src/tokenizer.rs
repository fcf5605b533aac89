//! Tag document tokenization.

use once_cell::sync::Lazy;
use regex::Regex;

// Words of two or more word characters; punctuation and single characters drop out.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w\w+\b").unwrap_or_else(|e| panic!("invalid token pattern: {}", e))
});

/// Splits a tag document into lowercase tokens, in order, keeping repeats.
///
/// `"Mental Health self-care"` yields `["mental", "health", "self", "care"]`.
pub fn tokenize(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits_multiword_tags() {
        assert_eq!(
            tokenize("Mental Health self-care"),
            vec!["mental", "health", "self", "care"]
        );
    }

    #[test]
    fn test_tokenize_drops_single_characters() {
        assert_eq!(tokenize("a b focus 5 x10"), vec!["focus", "x10"]);
    }

    #[test]
    fn test_tokenize_keeps_repeats_and_order() {
        assert_eq!(tokenize("calm focus calm"), vec!["calm", "focus", "calm"]);
    }

    #[test]
    fn test_tokenize_unicode_words() {
        assert_eq!(tokenize("Café Ruhe"), vec!["café", "ruhe"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  - / ").is_empty());
    }
}
