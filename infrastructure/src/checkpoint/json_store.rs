//! JSON file checkpoint store.
//!
//! One file per run id under a configured directory. Writes go through a
//! temporary file and a rename, so a crash mid-write leaves the previous
//! checkpoint intact rather than a truncated one.

use async_trait::async_trait;
use council_application::{CheckpointError, CheckpointStore};
use council_domain::{WorkflowStage, WorkflowState};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Checkpoint store writing one JSON file per run.
pub struct JsonCheckpointStore {
    dir: PathBuf,
}

impl JsonCheckpointStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| CheckpointError::SaveFailed {
            run_id: String::new(),
            message: format!("could not create {}: {}", dir.display(), e),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, run_id: &str) -> PathBuf {
        // Run ids come from the operator; keep the file name safe.
        let safe: String = run_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

#[async_trait]
impl CheckpointStore for JsonCheckpointStore {
    async fn save(
        &self,
        run_id: &str,
        stage: WorkflowStage,
        state: &WorkflowState,
    ) -> Result<(), CheckpointError> {
        let save_failed = |message: String| CheckpointError::SaveFailed {
            run_id: run_id.to_string(),
            message,
        };

        let json = serde_json::to_vec_pretty(state).map_err(|e| save_failed(e.to_string()))?;
        let path = self.path_for(run_id);
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| save_failed(format!("writing {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| save_failed(format!("renaming into {}: {}", path.display(), e)))?;

        debug!(run_id, stage = %stage, path = %path.display(), "checkpoint written");
        Ok(())
    }

    async fn load(&self, run_id: &str) -> Result<Option<WorkflowState>, CheckpointError> {
        let path = self.path_for(run_id);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CheckpointError::LoadFailed {
                    run_id: run_id.to_string(),
                    message: format!("reading {}: {}", path.display(), e),
                });
            }
        };
        let state = serde_json::from_str(&json).map_err(|e| CheckpointError::LoadFailed {
            run_id: run_id.to_string(),
            message: format!("parsing {}: {}", path.display(), e),
        })?;
        Ok(Some(state))
    }
}
