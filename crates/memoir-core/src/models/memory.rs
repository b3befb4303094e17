use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;

/// Caller-supplied payload for a save. Fields have not yet been normalized
/// or redacted.
#[derive(Debug, Clone, Default)]
pub struct RawMemory {
    pub title: String,
    pub what: String,
    pub why: Option<String>,
    pub impact: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub related_files: Vec<String>,
    pub source: Option<String>,
    pub details: Option<String>,
}

/// A persisted memory, post-normalization and post-redaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// UUID v4 identifier.
    pub id: String,
    pub project: String,
    pub title: String,
    pub what: String,
    pub why: Option<String>,
    pub impact: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub related_files: Vec<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_count: u32,
    pub file_path: String,
}

impl Memory {
    /// Composite text used for embedding: title, what, why, and tags,
    /// concatenated in a stable order.
    pub fn composite_text(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            self.title,
            self.what,
            self.why.as_deref().unwrap_or(""),
            self.tags.join(" ")
        )
    }
}

/// The long-form body kept in the 1:0..1 details side table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDetails {
    pub memory_id: String,
    pub body: String,
}
