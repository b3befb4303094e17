/// Whether a save resulted in a brand new memory or updated an existing
/// near-duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Created,
    Updated,
}

impl SaveAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveAction::Created => "created",
            SaveAction::Updated => "updated",
        }
    }
}

/// Result of a save call, including any non-fatal quality warnings.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub action: SaveAction,
    pub id: String,
    pub file_path: String,
    pub warnings: Vec<String>,
}
