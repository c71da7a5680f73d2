// mailsift - core/extract.rs
//
// Email address extraction from raw text, plus the order-preserving
// deduplication step that sits between extraction and classification.
// Core layer: pure string scanning, no I/O.

use crate::core::model::EmailAddress;
use crate::util::constants;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// The compiled extraction pattern, built once on first use.
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        // The pattern is a compile-time constant; the unit tests below
        // exercise it, so a mistake shows up as a failing test rather
        // than a runtime panic.
        Regex::new(constants::EMAIL_PATTERN).expect("email_regex: invalid pattern")
    })
}

/// Extract every email-like substring from `text`.
///
/// Returns all non-overlapping matches in left-to-right scan order,
/// duplicates retained. Substrings that do not match the pattern
/// (missing TLD, invalid characters) are simply not returned -- there is
/// no error path for "invalid" addresses.
pub fn extract_emails(text: &str) -> Vec<EmailAddress> {
    email_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Reduce concatenated extraction results to unique addresses,
/// preserving first-occurrence order.
///
/// Equality is case-sensitive and exact: no local-part normalisation
/// here. Domain case is normalised later by the classifier, so
/// `X@GMAIL.com` and `x@gmail.com` are distinct addresses that end up
/// under the same domain bucket.
pub fn dedup_emails(addresses: Vec<EmailAddress>) -> Vec<EmailAddress> {
    let mut seen: HashSet<String> = HashSet::with_capacity(addresses.len());
    addresses
        .into_iter()
        .filter(|address| seen.insert(address.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_empty_text() {
        assert!(extract_emails("").is_empty());
    }

    #[test]
    fn test_extract_no_matches() {
        assert!(extract_emails("no emails here").is_empty());
    }

    #[test]
    fn test_extract_two_addresses_in_document_order() {
        let found = extract_emails("a@b.com and c@d.org");
        assert_eq!(found, vec!["a@b.com", "c@d.org"]);
    }

    #[test]
    fn test_extract_retains_duplicates() {
        let found = extract_emails("ping a@b.com, then a@b.com again");
        assert_eq!(found, vec!["a@b.com", "a@b.com"]);
    }

    #[test]
    fn test_extract_skips_malformed_tokens() {
        // Missing TLD, bare @, leading/trailing @: none of these match.
        assert!(extract_emails("user@nodot and just-an-@-sign").is_empty());
        assert!(extract_emails("@leading.com trailing@").is_empty());
    }

    #[test]
    fn test_extract_from_surrounding_punctuation() {
        let found = extract_emails("Contact: <sales@acme.co.uk>; or (ops@acme.io).");
        assert_eq!(found, vec!["sales@acme.co.uk", "ops@acme.io"]);
    }

    #[test]
    fn test_extract_multiline_input() {
        let text = "line one bob@example.com\nline two alice@school.edu\n";
        assert_eq!(
            extract_emails(text),
            vec!["bob@example.com", "alice@school.edu"]
        );
    }

    #[test]
    fn test_dedup_preserves_first_occurrence_order() {
        let input = vec![
            "b@x.com".to_string(),
            "a@x.com".to_string(),
            "b@x.com".to_string(),
            "c@x.com".to_string(),
            "a@x.com".to_string(),
        ];
        assert_eq!(dedup_emails(input), vec!["b@x.com", "a@x.com", "c@x.com"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let input = vec!["A@x.com".to_string(), "a@x.com".to_string()];
        assert_eq!(dedup_emails(input), vec!["A@x.com", "a@x.com"]);
    }

    #[test]
    fn test_dedup_empty_input() {
        assert!(dedup_emails(Vec::new()).is_empty());
    }
}
