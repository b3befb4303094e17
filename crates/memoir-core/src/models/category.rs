use serde::{Deserialize, Serialize};

/// The closed set of memory categories. Any value outside this set
/// normalizes to `Context` rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Decision,
    Bug,
    Pattern,
    Learning,
    Context,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Decision => "decision",
            Category::Bug => "bug",
            Category::Pattern => "pattern",
            Category::Learning => "learning",
            Category::Context => "context",
        }
    }

    /// Parse a free-form string into a category, falling back to `Context`
    /// for anything unrecognized instead of failing.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "decision" => Category::Decision,
            "bug" => Category::Bug,
            "pattern" => Category::Pattern,
            "learning" => Category::Learning,
            _ => Category::Context,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Controls whether a retrieval path is allowed to fall back to lexical-only
/// search when vectors are unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticMode {
    /// Use vectors when available, degrade silently to FTS-only otherwise.
    Auto,
    /// Require vectors; fail with `VectorsUnavailable` if they are down.
    Always,
    /// Never consult vectors, even if available.
    Never,
}

impl Default for SemanticMode {
    fn default() -> Self {
        SemanticMode::Auto
    }
}

impl SemanticMode {
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "always" => SemanticMode::Always,
            "never" => SemanticMode::Never,
            _ => SemanticMode::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_falls_back_to_context() {
        assert_eq!(Category::parse_or_default("sonnet"), Category::Context);
    }

    #[test]
    fn known_categories_round_trip_through_as_str() {
        for c in [
            Category::Decision,
            Category::Bug,
            Category::Pattern,
            Category::Learning,
            Category::Context,
        ] {
            assert_eq!(Category::parse_or_default(c.as_str()), c);
        }
    }

    #[test]
    fn semantic_mode_defaults_to_auto() {
        assert_eq!(SemanticMode::default(), SemanticMode::Auto);
        assert_eq!(SemanticMode::parse_or_default("bogus"), SemanticMode::Auto);
    }
}
