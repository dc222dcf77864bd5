//! JSON-file implementation of the [`StateStore`] port.

use std::path::PathBuf;

use hooksync_core::state::StateStore;
use hooksync_types::error::StateError;
use hooksync_types::state::NodeState;

/// Persists the node state record as pretty-printed JSON at a fixed path.
///
/// A missing file loads as the empty record; the file only appears once
/// something is saved.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateStore for FileStateStore {
    async fn load(&self) -> Result<NodeState, StateError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(NodeState::default());
            }
            Err(err) => {
                return Err(StateError::Storage(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(&content).map_err(|err| {
            StateError::Serialization(format!("failed to parse {}: {err}", self.path.display()))
        })
    }

    async fn save(&self, state: &NodeState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|err| {
                    StateError::Storage(format!(
                        "failed to create {}: {err}",
                        parent.display()
                    ))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(state)
            .map_err(|err| StateError::Serialization(err.to_string()))?;
        tokio::fs::write(&self.path, content).await.map_err(|err| {
            StateError::Storage(format!("failed to write {}: {err}", self.path.display()))
        })
    }
}
