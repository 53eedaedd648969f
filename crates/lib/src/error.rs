//! Error taxonomy of the lifecycle engine.
//!
//! Each module owns a `thiserror` enum; [`LifecycleError`] composes them into
//! the categories a caller reacts to.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::collision::CollisionError;
use crate::fileset::FilesetError;
use crate::migrate::MigrateError;
use crate::part::{StateError, Step};
use crate::plugin::PluginError;
use crate::project::lock::LockError;

/// Invalid or inconsistent configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("unknown plugin: {0}")]
  UnknownPlugin(String),

  #[error("The part named '{0}' is not defined")]
  UnknownPart(String),

  #[error("part '{0}' is defined more than once")]
  DuplicatePart(String),

  #[error("invalid project directory {path}: {source}")]
  ProjectDir { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Fileset(#[from] FilesetError),

  #[error("invalid properties for part '{part}' ({plugin}): {message}")]
  InvalidProperties {
    part: String,
    plugin: String,
    message: String,
  },

  #[error("failed to read project file {path}: {source}")]
  ReadProject { path: PathBuf, source: io::Error },

  #[error("failed to parse project file {path}: {message}")]
  ParseProject { path: PathBuf, message: String },
}

/// Problems with the prerequisite graph.
#[derive(Debug, Error)]
pub enum DependencyError {
  #[error(
    "Requested '{step}' of '{part}' but there are unsatisfied prerequisites: '{}'",
    .missing.join(" ")
  )]
  Unsatisfied {
    step: Step,
    part: String,
    missing: Vec<String>,
  },

  #[error("circular dependency chain found in parts definition: {}", .parts.join(" -> "))]
  Cycle { parts: Vec<String> },

  #[error("part '{part}' depends on '{prerequisite}', which is not defined")]
  UnknownPrerequisite { part: String, prerequisite: String },
}

/// Top-level error of every lifecycle operation.
#[derive(Debug, Error)]
pub enum LifecycleError {
  #[error(transparent)]
  Configuration(#[from] ConfigError),

  #[error(transparent)]
  Dependency(#[from] DependencyError),

  #[error(transparent)]
  Collision(#[from] CollisionError),

  #[error("Unable to find package path: \"{}\"", .path.display())]
  MissingResource { path: PathBuf },

  #[error("{source}")]
  PluginExecution {
    part: String,
    step: Step,
    #[source]
    source: PluginError,
  },

  /// A plugin failed to release what it keeps outside the part directory.
  #[error("{source}")]
  PluginClean {
    part: String,
    #[source]
    source: PluginError,
  },

  #[error(transparent)]
  State(#[from] StateError),

  #[error(transparent)]
  Migrate(#[from] MigrateError),

  #[error(transparent)]
  Lock(#[from] LockError),

  #[error("I/O error at {path}: {source}")]
  Io { path: PathBuf, source: io::Error },
}

impl LifecycleError {
  /// Wrap a plugin failure. Missing sources keep their own category.
  pub fn plugin(part: &str, step: Step, err: PluginError) -> Self {
    match err {
      PluginError::MissingResource(path) => LifecycleError::MissingResource { path },
      source => LifecycleError::PluginExecution {
        part: part.to_string(),
        step,
        source,
      },
    }
  }
}

impl From<FilesetError> for LifecycleError {
  fn from(err: FilesetError) -> Self {
    LifecycleError::Configuration(ConfigError::Fileset(err))
  }
}
