use crate::markers;
use crate::patterns::{self, RawMatch};

const PLACEHOLDER: &str = "[REDACTED]";

/// Strips secrets and explicit redaction markers from text before it is
/// ever persisted, embedded, or written to the vault.
///
/// Sanitization is idempotent: running it twice never changes the output
/// of the first pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct Redactor;

impl Redactor {
    pub fn new() -> Self {
        Self
    }

    /// Run both redaction passes: explicit markers first (since they may
    /// wrap secrets the pattern pass would otherwise catch anyway), then
    /// pattern-based secret detection over what remains.
    pub fn redact(&self, text: &str) -> String {
        let marker_pass = markers::strip_explicit_markers(text, PLACEHOLDER);
        let matches = patterns::scan_all(&marker_pass);
        apply_replacements(&marker_pass, &matches)
    }
}

/// Apply placeholder replacements to the text. Matches must be sorted
/// ascending by start position on input; we replace from the end so
/// earlier offsets never shift.
fn apply_replacements(text: &str, matches: &[RawMatch]) -> String {
    let mut sorted: Vec<&RawMatch> = matches.iter().collect();
    sorted.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result = text.to_string();
    for m in sorted {
        if m.end > result.len() {
            continue;
        }
        // Idempotency guard: don't re-wrap text that is already a placeholder.
        if &result[m.start..m.end] == PLACEHOLDER {
            continue;
        }
        result.replace_range(m.start..m.end, PLACEHOLDER);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_api_key_in_prose() {
        let r = Redactor::new();
        let out = r.redact("Using API key sk_live_abc123xyz for payment");
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("sk_live_abc123xyz"));
    }

    #[test]
    fn redacts_explicit_marker_and_contents() {
        let r = Redactor::new();
        let out = r.redact(
            "Database config: <redacted>host=secret.db password=pass123</redacted> works now",
        );
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("<redacted>"));
        assert!(!out.contains("secret.db"));
        assert!(!out.contains("pass123"));
    }

    #[test]
    fn redaction_is_idempotent() {
        let r = Redactor::new();
        let once = r.redact("token = \"abcdefghijklmnopqrstuvwx\"");
        let twice = r.redact(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn clean_text_is_unchanged() {
        let r = Redactor::new();
        let input = "Configured FastAPI with async routes";
        assert_eq!(r.redact(input), input);
    }
}
