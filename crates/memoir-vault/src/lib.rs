//! # memoir-vault
//!
//! Appends human-readable markdown entries to per-project, per-day
//! session files. The vault is a write-ahead log for humans to skim —
//! the embedded index remains the source of truth for every query.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use memoir_core::errors::MemoryResult;
use memoir_core::models::{Memory, SaveAction};
use tracing::debug;

/// Writes append-only markdown session files under `<home>/vault/<project>/<date>-session.md`.
pub struct VaultWriter {
    home: PathBuf,
}

impl VaultWriter {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Path for today's session file in the given project, without
    /// creating anything on disk.
    pub fn session_path(&self, project: &str) -> PathBuf {
        let date = Utc::now().format("%Y-%m-%d");
        self.home.join("vault").join(project).join(format!("{date}-session.md"))
    }

    /// Append a markdown block describing the save. Creates parent
    /// directories as needed. Never rewrites or deletes existing content.
    pub fn append(
        &self,
        memory: &Memory,
        details: Option<&str>,
        action: SaveAction,
    ) -> MemoryResult<String> {
        let path = self.session_path(&memory.project);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let block = render_entry(memory, details, action);

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(block.as_bytes())?;
        file.flush()?;

        debug!(path = %path.display(), action = action.as_str(), "appended vault entry");
        Ok(path.to_string_lossy().into_owned())
    }
}

fn render_entry(memory: &Memory, details: Option<&str>, action: SaveAction) -> String {
    let mut out = String::new();
    out.push_str(&format!("### {}\n", memory.title));
    out.push_str(&format!("id: {}\n", memory.id));
    out.push_str(&format!("category: {}\n", memory.category));
    out.push_str(&format!("tags: {}\n", memory.tags.join(", ")));
    match action {
        SaveAction::Created => out.push_str(&format!("created_at: {}\n", memory.created_at.to_rfc3339())),
        SaveAction::Updated => out.push_str(&format!("updated_at: {}\n", memory.updated_at.to_rfc3339())),
    }
    out.push('\n');
    out.push_str(&format!("**What:** {}\n", memory.what));
    if let Some(why) = &memory.why {
        out.push_str(&format!("\n**Why:** {why}\n"));
    }
    if let Some(impact) = &memory.impact {
        out.push_str(&format!("\n**Impact:** {impact}\n"));
    }
    if let Some(details) = details {
        if !details.is_empty() {
            out.push_str(&format!("\n**Details:** {details}\n"));
        }
    }
    out.push_str("\n---\n\n");
    out
}
