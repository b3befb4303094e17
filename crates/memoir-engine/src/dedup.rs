//! Pure helpers for the save coordinator: normalization, the structural
//! half of the dedup probe, and save-quality warnings. None of these touch
//! the store directly, which keeps them cheap to test in isolation.

use std::collections::HashSet;

use memoir_core::constants::{MAX_TITLE_LEN, MIN_DETAILS_LEN, RECOMMENDED_DETAIL_HEADINGS};
use memoir_core::models::Category;

/// Truncate to at most `MAX_TITLE_LEN` characters on a char boundary.
pub fn truncate_title(title: &str) -> String {
    title.trim().chars().take(MAX_TITLE_LEN).collect()
}

/// De-duplicate a list while preserving the order of first occurrence.
pub fn dedup_preserve_order(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert((*item).clone()))
        .cloned()
        .collect()
}

/// Union two lists, keeping `existing`'s order and appending any `incoming`
/// items not already present.
pub fn union_preserve_order(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut result = existing.to_vec();
    let mut seen: HashSet<&str> = existing.iter().map(String::as_str).collect();
    for item in incoming {
        if seen.insert(item.as_str()) {
            result.push(item.clone());
        }
    }
    result
}

/// True if the two titles share at least one non-trivial (3+ character)
/// token, case-insensitively.
pub fn shares_title_token(a: &str, b: &str) -> bool {
    let tokens_a: HashSet<String> = tokenize(a);
    tokenize(b).iter().any(|t| tokens_a.contains(t))
}

/// True if the two tag sets intersect.
pub fn tags_overlap(a: &[String], b: &[String]) -> bool {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    b.iter().any(|t| a.contains(t.as_str()))
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3)
        .map(|t| t.to_lowercase())
        .collect()
}

/// Non-fatal warnings surfaced back to the caller of `save`.
pub fn quality_warnings(category: Category, details: Option<&str>) -> Vec<String> {
    let mut warnings = Vec::new();

    let needs_details = matches!(category, Category::Decision | Category::Bug);
    match details {
        None => {
            if needs_details {
                warnings.push("should include details".to_string());
            }
        }
        Some(body) => {
            if body.len() < MIN_DETAILS_LEN {
                warnings.push("Details are brief".to_string());
            }
            let has_recommended_heading =
                RECOMMENDED_DETAIL_HEADINGS.iter().any(|h| body.contains(h));
            if !has_recommended_heading {
                warnings.push("details missing recommended sections".to_string());
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_title_cuts_at_max_len() {
        let long = "a".repeat(100);
        assert_eq!(truncate_title(&long).len(), MAX_TITLE_LEN);
    }

    #[test]
    fn dedup_preserve_order_keeps_first_occurrence_order() {
        let items = vec!["a".to_string(), "b".to_string(), "a".to_string(), "c".to_string()];
        assert_eq!(dedup_preserve_order(&items), vec!["a", "b", "c"]);
    }

    #[test]
    fn union_preserve_order_appends_only_new_items() {
        let existing = vec!["auth".to_string(), "session".to_string()];
        let incoming = vec!["auth".to_string(), "stytch".to_string()];
        assert_eq!(
            union_preserve_order(&existing, &incoming),
            vec!["auth", "session", "stytch"]
        );
    }

    #[test]
    fn shares_title_token_matches_case_insensitively() {
        assert!(shares_title_token("Fixed auth session expiry", "fixed AUTH bug"));
    }

    #[test]
    fn shares_title_token_ignores_trivial_tokens() {
        assert!(!shares_title_token("a to it", "a to be"));
    }

    #[test]
    fn tags_overlap_detects_shared_tag() {
        assert!(tags_overlap(&["auth".to_string()], &["auth".to_string(), "stytch".to_string()]));
        assert!(!tags_overlap(&["auth".to_string()], &["unrelated".to_string()]));
    }

    #[test]
    fn decision_without_details_warns() {
        let warnings = quality_warnings(Category::Decision, None);
        assert_eq!(warnings, vec!["should include details"]);
    }

    #[test]
    fn context_without_details_is_silent() {
        assert!(quality_warnings(Category::Context, None).is_empty());
    }

    #[test]
    fn brief_details_without_headings_warns_twice() {
        let warnings = quality_warnings(Category::Bug, Some("too short"));
        assert_eq!(
            warnings,
            vec!["Details are brief", "details missing recommended sections"]
        );
    }

    #[test]
    fn thorough_details_is_silent() {
        let body = format!(
            "Context: background info here that is long enough to pass the brevity check easily. Decision: {}",
            "x".repeat(80)
        );
        assert!(quality_warnings(Category::Bug, Some(&body)).is_empty());
    }
}
