//! Step status persistence.
//!
//! Every completed step is recorded so a later invocation can skip it.
//!
//! # Storage Layout
//!
//! ```text
//! parts/<name>/
//! └── state.json
//! ```
//!
//! # Example State File
//!
//! ```json
//! {
//!   "status": "built"
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::STATE_FILENAME;
use crate::part::StepStatus;

/// Persisted state of one part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartState {
  pub status: StepStatus,
}

impl PartState {
  pub fn new(status: StepStatus) -> Self {
    Self { status }
  }
}

/// Errors that can occur when working with part state.
#[derive(Debug, Error)]
pub enum StateError {
  #[error("failed to read part state {path}: {source}")]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to write part state {path}: {source}")]
  Write { path: PathBuf, source: io::Error },

  #[error("failed to create part directory {path}: {source}")]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to parse part state {path}: {source}")]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("failed to serialize part state: {0}")]
  Serialize(#[source] serde_json::Error),
}

/// Save part state after a step completed.
///
/// Writes atomically: temp file first, then rename over the state file.
pub fn save_part_state(part_dir: &Path, state: &PartState) -> Result<(), StateError> {
  let path = part_dir.join(STATE_FILENAME);

  fs::create_dir_all(part_dir).map_err(|source| StateError::CreateDir {
    path: part_dir.to_path_buf(),
    source,
  })?;

  let content = serde_json::to_string_pretty(state).map_err(StateError::Serialize)?;

  let temp_path = part_dir.join(format!("{STATE_FILENAME}.tmp"));
  fs::write(&temp_path, &content).map_err(|source| StateError::Write {
    path: temp_path.clone(),
    source,
  })?;
  fs::rename(&temp_path, &path).map_err(|source| StateError::Write {
    path: path.clone(),
    source,
  })?;

  debug!(path = %path.display(), status = %state.status, "part state saved");
  Ok(())
}

/// Load part state.
///
/// Returns `Ok(None)` if the part never completed a step or was cleaned.
pub fn load_part_state(part_dir: &Path) -> Result<Option<PartState>, StateError> {
  let path = part_dir.join(STATE_FILENAME);

  let content = match fs::read_to_string(&path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(source) => return Err(StateError::Read { path, source }),
  };

  let state: PartState = serde_json::from_str(&content).map_err(|source| StateError::Parse {
    path: path.clone(),
    source,
  })?;
  debug!(path = %path.display(), status = %state.status, "part state loaded");
  Ok(Some(state))
}
