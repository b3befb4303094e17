//! Header-only context pointers for session bootstrap.

use memoir_core::errors::MemoryResult;
use memoir_core::models::{ContextPointer, Memory};
use memoir_core::traits::IndexStore;

pub fn to_pointer(memory: Memory, has_details: bool) -> ContextPointer {
    ContextPointer {
        id: memory.id,
        title: memory.title,
        category: memory.category,
        tags: memory.tags,
        date_display: memory.updated_at.format("%Y-%m-%d").to_string(),
        has_details,
    }
}

pub fn recent_pointers(
    store: &dyn IndexStore,
    limit: usize,
    project: Option<&str>,
) -> MemoryResult<Vec<ContextPointer>> {
    store
        .recent(limit, project)?
        .into_iter()
        .map(|memory| {
            let has_details = store.get_details(&memory.id)?.is_some();
            Ok(to_pointer(memory, has_details))
        })
        .collect()
}
