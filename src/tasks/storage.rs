use std::path::Path;

use super::types::TasksData;
use crate::shared::errors::StorageError;
use crate::shared::paths::ensure_parent_dir;

/// Load the task snapshot from disk. A missing file yields the seeded
/// starter data (fresh install); counters are normalized on every load so
/// snapshots written before the counters existed keep unique ids.
pub fn load_data(path: &Path) -> Result<TasksData, StorageError> {
    if !path.exists() {
        tracing::info!(target: "tasks", "No task data at {:?}, starting from seed", path);
        return Ok(TasksData::seeded());
    }

    let content = std::fs::read_to_string(path)?;
    let mut data: TasksData = serde_json::from_str(&content)?;
    data.normalize_counters();
    Ok(data)
}

/// Write the whole snapshot. Every mutation persists wholesale; there is no
/// incremental diffing.
pub fn save_data(path: &Path, data: &TasksData) -> Result<(), StorageError> {
    ensure_parent_dir(path)?;
    let content = serde_json::to_string_pretty(data)?;
    std::fs::write(path, &content)?;
    Ok(())
}
