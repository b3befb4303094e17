use regex::Regex;
use std::sync::LazyLock;

static RE_EXPLICIT_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<redacted>.*?</redacted>").ok());

/// Replace every `<redacted>...</redacted>` span (tags included) with the
/// standard placeholder.
pub fn strip_explicit_markers(text: &str, placeholder: &str) -> String {
    match RE_EXPLICIT_MARKER.as_ref() {
        Some(re) => re.replace_all(text, placeholder).into_owned(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_marker_and_contents() {
        let input = "config: <redacted>host=secret.db password=pass123</redacted> works now";
        let out = strip_explicit_markers(input, "[REDACTED]");
        assert_eq!(out, "config: [REDACTED] works now");
    }

    #[test]
    fn leaves_unmarked_text_untouched() {
        let input = "no markers here";
        assert_eq!(strip_explicit_markers(input, "[REDACTED]"), input);
    }

    #[test]
    fn handles_multiple_markers() {
        let input = "<redacted>a</redacted> middle <redacted>b</redacted>";
        let out = strip_explicit_markers(input, "[REDACTED]");
        assert_eq!(out, "[REDACTED] middle [REDACTED]");
    }
}
