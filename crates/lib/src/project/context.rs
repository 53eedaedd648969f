//! Where a project lives on disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{LOCK_FILENAME, PARTS_DIRNAME, PRIME_DIRNAME, PROJECT_DIR_ENV, PROJECT_FILENAME, STAGE_DIRNAME};
use crate::error::ConfigError;
use crate::part::PartDirs;

/// Directories of one project, passed explicitly to everything that needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
  project_dir: PathBuf,
  parts_dir: PathBuf,
  stage_dir: PathBuf,
  prime_dir: PathBuf,
}

impl ProjectContext {
  /// Use the conventional layout under `project_dir`.
  pub fn new(project_dir: impl Into<PathBuf>) -> Self {
    let project_dir = project_dir.into();
    Self {
      parts_dir: project_dir.join(PARTS_DIRNAME),
      stage_dir: project_dir.join(STAGE_DIRNAME),
      prime_dir: project_dir.join(PRIME_DIRNAME),
      project_dir,
    }
  }

  /// Locate the project directory.
  ///
  /// Precedence: `explicit`, then `PARTWRIGHT_PROJECT_DIR`, then the current
  /// directory. The result is canonicalized.
  pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    let dir = match explicit {
      Some(dir) => dir.to_path_buf(),
      None => match std::env::var_os(PROJECT_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::current_dir().map_err(|source| ConfigError::ProjectDir {
          path: PathBuf::from("."),
          source,
        })?,
      },
    };

    let dir = dunce::canonicalize(&dir).map_err(|source| ConfigError::ProjectDir { path: dir, source })?;
    debug!(project = %dir.display(), "using project directory");
    Ok(Self::new(dir))
  }

  pub fn project_dir(&self) -> &Path {
    &self.project_dir
  }

  pub fn parts_dir(&self) -> &Path {
    &self.parts_dir
  }

  pub fn stage_dir(&self) -> &Path {
    &self.stage_dir
  }

  pub fn prime_dir(&self) -> &Path {
    &self.prime_dir
  }

  pub fn project_file(&self) -> PathBuf {
    self.project_dir.join(PROJECT_FILENAME)
  }

  pub fn lock_file(&self) -> PathBuf {
    self.project_dir.join(LOCK_FILENAME)
  }

  pub fn part_dirs(&self, name: &str) -> PartDirs {
    PartDirs::new(&self.parts_dir, name)
  }
}
