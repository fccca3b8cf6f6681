//! UI state carried across runs.
//!
//! Only the selected task row survives a restart. Task data itself always
//! comes fresh from the task source.

use crate::state::App;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taskboard_core::TaskId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub selected_task_id: Option<TaskId>,
}

impl PersistedState {
    pub fn capture(app: &App) -> Self {
        Self {
            selected_task_id: app.selected_task.clone(),
        }
    }

    /// Seed the selection. A task that no longer exists is replaced by the
    /// first row once the task list loads.
    pub fn restore(self, app: &mut App) {
        app.selected_task = self.selected_task_id;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to access UI state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("UI state file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

pub fn load(path: &Path) -> Result<Option<PersistedState>, PersistenceError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Write through a sibling temp file so an interrupted save never leaves a
/// truncated state file behind.
pub fn save(path: &Path, state: &PersistedState) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let staging = staging_path(path);
    std::fs::write(&staging, serde_json::to_vec_pretty(state)?)?;
    std::fs::rename(&staging, path)?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
