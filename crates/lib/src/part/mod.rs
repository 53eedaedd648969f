//! Parts: one buildable component each.
//!
//! A part owns its working directories under `parts/<name>/` and a persisted
//! step status. Its plugin is opaque to the lifecycle beyond the `Plugin`
//! capability interface.

pub mod state;
pub mod types;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use state::{PartState, StateError, load_part_state, save_part_state};
pub use types::{PartDescriptor, Properties, Step, StepStatus};

use crate::consts::{BUILD_DIRNAME, INSTALL_DIRNAME, SOURCE_DIRNAME};
use crate::error::LifecycleError;
use crate::fileset::{FilesetError, ResolvedFileset, resolve_fileset};
use crate::plugin::Plugin;
use crate::project::ProjectContext;

/// Working directories owned by one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDirs {
  /// `parts/<name>`, also holding the state file and scratch data.
  pub part: PathBuf,
  pub source: PathBuf,
  pub build: PathBuf,
  /// Private install tree, migrated into the stage tree.
  pub install: PathBuf,
}

impl PartDirs {
  pub fn new(parts_dir: &Path, name: &str) -> Self {
    let part = parts_dir.join(name);
    Self {
      source: part.join(SOURCE_DIRNAME),
      build: part.join(BUILD_DIRNAME),
      install: part.join(INSTALL_DIRNAME),
      part,
    }
  }
}

pub struct Part {
  descriptor: PartDescriptor,
  plugin: Box<dyn Plugin>,
  dirs: PartDirs,
  stage_fileset: ResolvedFileset,
  prime_fileset: ResolvedFileset,
  status: StepStatus,
}

impl fmt::Debug for Part {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Part")
      .field("name", &self.descriptor.name)
      .field("plugin", &self.descriptor.plugin)
      .field("status", &self.status)
      .finish_non_exhaustive()
  }
}

impl Part {
  /// Create a part from its descriptor and the plugin built for it.
  ///
  /// Both filesets are resolved and compiled here so that a bad pattern is
  /// reported before anything touches the filesystem. The persisted status
  /// is loaded from the part directory.
  pub fn new(
    descriptor: PartDescriptor,
    plugin: Box<dyn Plugin>,
    context: &ProjectContext,
  ) -> Result<Self, LifecycleError> {
    let stage_fileset = checked_fileset(&descriptor.stage)?;
    let prime_fileset = checked_fileset(&descriptor.prime)?;
    let dirs = context.part_dirs(&descriptor.name);
    let status = load_part_state(&dirs.part)?.map(|state| state.status).unwrap_or_default();

    debug!(part = %descriptor.name, status = %status, "loaded part");

    Ok(Self {
      descriptor,
      plugin,
      dirs,
      stage_fileset,
      prime_fileset,
      status,
    })
  }

  pub fn name(&self) -> &str {
    &self.descriptor.name
  }

  pub fn descriptor(&self) -> &PartDescriptor {
    &self.descriptor
  }

  pub fn plugin(&self) -> &dyn Plugin {
    self.plugin.as_ref()
  }

  pub fn dirs(&self) -> &PartDirs {
    &self.dirs
  }

  pub fn after(&self) -> &[String] {
    &self.descriptor.after
  }

  pub fn status(&self) -> StepStatus {
    self.status
  }

  pub fn stage_fileset(&self) -> &ResolvedFileset {
    &self.stage_fileset
  }

  pub fn prime_fileset(&self) -> &ResolvedFileset {
    &self.prime_fileset
  }

  pub fn is_done(&self, step: Step) -> bool {
    self.status.has_reached(step)
  }

  /// Create the part's directories and the shared stage and prime trees.
  pub(crate) fn makedirs(&self, context: &ProjectContext) -> Result<(), LifecycleError> {
    let dirs = [
      &self.dirs.part,
      &self.dirs.source,
      &self.dirs.build,
      &self.dirs.install,
      context.stage_dir(),
      context.prime_dir(),
    ];
    for dir in dirs {
      fs::create_dir_all(dir).map_err(|source| LifecycleError::Io {
        path: dir.to_path_buf(),
        source,
      })?;
    }
    Ok(())
  }

  /// Record `step` as completed. The status never moves backwards.
  pub(crate) fn mark_done(&mut self, step: Step) -> Result<(), StateError> {
    let status = step.status();
    if status > self.status {
      save_part_state(&self.dirs.part, &PartState::new(status))?;
      self.status = status;
    }
    Ok(())
  }

  /// Delete the working directories and reset the status.
  ///
  /// Returns whether there was anything to delete.
  pub(crate) fn remove_working_dirs(&mut self) -> Result<bool, LifecycleError> {
    let removed = match fs::remove_dir_all(&self.dirs.part) {
      Ok(()) => true,
      Err(e) if e.kind() == io::ErrorKind::NotFound => false,
      Err(source) => {
        return Err(LifecycleError::Io {
          path: self.dirs.part.clone(),
          source,
        });
      }
    };
    self.status = StepStatus::NotRun;

    if removed {
      info!(part = %self.name(), path = %self.dirs.part.display(), "removed part directory");
    }
    Ok(removed)
  }
}

fn checked_fileset(entries: &[String]) -> Result<ResolvedFileset, FilesetError> {
  let fileset = resolve_fileset(entries)?;
  fileset.matcher()?;
  Ok(fileset)
}
