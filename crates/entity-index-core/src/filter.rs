//! Mention filter: rejects recognizer noise before scoring.
//!
//! Rules run on the trimmed surface text, in order, stopping at the first
//! rejection:
//!
//! 1. fewer than two characters
//! 2. first character is not uppercase
//! 3. lowercased text is a stopword (function words, weekdays, months)
//! 4. only ASCII digits once spaces, hyphens and apostrophes are removed
//! 5. two characters long and not an allow-listed acronym
//!
//! The filter is pure; the same text gets the same decision whichever
//! document or field it came from.

use std::collections::HashSet;

const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "be", "been", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
    "these", "those", "it", "its", "they", "them", "their", "there", "here", "where", "when",
    "what", "who", "which", "how", "why", "today", "yesterday", "tomorrow", "now", "then", "ago",
    "later", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "january", "february", "march", "april", "june", "july", "august", "september", "october",
    "november", "december",
];

/// Short acronyms accepted despite rule 5.
pub const DEFAULT_SHORT_ACRONYMS: &[&str] = &["US", "UK", "EU", "UN"];

#[derive(Debug, Clone)]
pub struct MentionFilter {
    stopwords: HashSet<String>,
    short_acronyms: HashSet<String>,
}

impl Default for MentionFilter {
    fn default() -> Self {
        Self::new(&[], DEFAULT_SHORT_ACRONYMS)
    }
}

impl MentionFilter {
    /// Build a filter from the default stopwords plus `extra_stopwords`,
    /// with `short_acronyms` as the rule-5 allow-list.
    pub fn new<S: AsRef<str>>(extra_stopwords: &[S], short_acronyms: &[S]) -> Self {
        let stopwords = DEFAULT_STOPWORDS
            .iter()
            .map(|s| s.to_string())
            .chain(extra_stopwords.iter().map(|s| s.as_ref().trim().to_lowercase()))
            .collect();
        let short_acronyms = short_acronyms
            .iter()
            .map(|s| s.as_ref().trim().to_string())
            .collect();
        Self {
            stopwords,
            short_acronyms,
        }
    }

    /// Returns the normalized text if the mention is accepted.
    pub fn accept(&self, text: &str) -> Option<String> {
        let text = text.trim();
        let len = text.chars().count();

        if len < 2 {
            return None;
        }

        if !text.chars().next().is_some_and(char::is_uppercase) {
            return None;
        }

        if self.stopwords.contains(&text.to_lowercase()) {
            return None;
        }

        if is_digit_residue(text) {
            return None;
        }

        if len <= 2 && !self.short_acronyms.contains(text) {
            return None;
        }

        Some(text.to_string())
    }
}

/// True when `text` is only ASCII digits once spaces, hyphens and
/// apostrophes are removed.
fn is_digit_residue(text: &str) -> bool {
    let mut residue = text
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '\''))
        .peekable();
    residue.peek().is_some() && residue.all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims() {
        let f = MentionFilter::default();
        assert_eq!(f.accept("  Acme Corp \n"), Some("Acme Corp".to_string()));
    }

    #[test]
    fn rejects_short_and_empty() {
        let f = MentionFilter::default();
        assert_eq!(f.accept(""), None);
        assert_eq!(f.accept("   "), None);
        assert_eq!(f.accept("A"), None);
    }

    #[test]
    fn rejects_lowercase_start() {
        let f = MentionFilter::default();
        assert_eq!(f.accept("acme"), None);
        assert_eq!(f.accept("'Acme"), None);
    }

    #[test]
    fn rejects_stopwords_case_insensitively() {
        let f = MentionFilter::default();
        assert_eq!(f.accept("The"), None);
        assert_eq!(f.accept("Monday"), None);
        assert_eq!(f.accept("DECEMBER"), None);
        assert_eq!(f.accept("Yesterday"), None);
    }

    #[test]
    fn rejects_numeric_residue() {
        let f = MentionFilter::new(&["x"], &["1-2"]);
        assert_eq!(f.accept("1-2"), None);
        assert_eq!(MentionFilter::default().accept("2024"), None);
    }

    #[test]
    fn digit_residue_is_decimal_only() {
        assert!(is_digit_residue("2024"));
        assert!(is_digit_residue("12-34 '56"));
        assert!(!is_digit_residue(" - "));
        assert!(!is_digit_residue("Ⅻ Ⅳ"));
        assert!(!is_digit_residue("F-16"));
    }

    #[test]
    fn roman_numerals_are_not_digits() {
        let f = MentionFilter::default();
        assert_eq!(f.accept("Ⅻ Ⅳ"), Some("Ⅻ Ⅳ".to_string()));
    }

    #[test]
    fn short_acronym_allow_list() {
        let f = MentionFilter::default();
        assert_eq!(f.accept("US"), Some("US".to_string()));
        assert_eq!(f.accept("EU"), Some("EU".to_string()));
        assert_eq!(f.accept("Us"), None);
        assert_eq!(f.accept("XY"), None);
        assert_eq!(f.accept("NYC"), Some("NYC".to_string()));
    }

    #[test]
    fn extra_stopwords() {
        let f = MentionFilter::new(&["Reuters"], DEFAULT_SHORT_ACRONYMS);
        assert_eq!(f.accept("Reuters"), None);
        assert_eq!(f.accept("Acme"), Some("Acme".to_string()));
    }

    #[test]
    fn refiltering_is_idempotent() {
        let f = MentionFilter::default();
        for raw in [" Jane Doe ", "US", "Monday", "x", "  NASA", "12 34", "Acme-Corp "] {
            if let Some(accepted) = f.accept(raw) {
                assert_eq!(f.accept(&accepted), Some(accepted.clone()));
            }
        }
    }
}
