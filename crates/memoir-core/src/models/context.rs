use super::category::Category;

/// A header-only summary of a memory, used for session-bootstrap context
/// requests. Carries no body text.
#[derive(Debug, Clone)]
pub struct ContextPointer {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub tags: Vec<String>,
    /// Short display date, e.g. `2026-08-01`.
    pub date_display: String,
    pub has_details: bool,
}
