//! Plugin capability interface.
//!
//! The lifecycle knows nothing about how a part is fetched or compiled. It
//! hands each part's plugin a [`PluginContext`] and calls `pull` and `build`;
//! staging and priming are handled by the lifecycle itself.
//!
//! Plugins are created by factories registered in a [`PluginRegistry`] under
//! their kind string. Nothing is discovered implicitly: a plugin kind that was
//! not registered is a configuration error.

pub mod command;
pub mod copy;
pub mod nil;
pub mod registry;
pub mod runner;

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub use registry::{PluginFactory, PluginRegistry};
pub use runner::{CommandRunner, Invocation, ShellRunner};

use crate::migrate::MigrateError;
use crate::part::{PartDirs, Properties};

/// Errors reported by plugins.
#[derive(Debug, Error)]
pub enum PluginError {
  /// A source path the plugin needs does not exist.
  #[error("Unable to find package path: \"{}\"", .0.display())]
  MissingResource(PathBuf),

  #[error("command '{command}' failed with exit code {}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
  CommandFailed { command: String, code: Option<i32> },

  #[error("{0}")]
  InvalidProperties(String),

  #[error("I/O error at {path}: {source}")]
  Io { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Migrate(#[from] MigrateError),

  #[error("{0}")]
  Other(String),
}

impl PluginError {
  pub(crate) fn io(path: &Path, source: io::Error) -> Self {
    PluginError::Io {
      path: path.to_path_buf(),
      source,
    }
  }
}

/// Configuration keys a plugin kind accepts, as a JSON schema fragment.
///
/// The lifecycle never interprets it; it is published for validators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginSchema {
  pub properties: serde_json::Value,
  pub required: Vec<String>,
}

impl PluginSchema {
  pub fn empty() -> Self {
    Self {
      properties: serde_json::json!({}),
      required: Vec::new(),
    }
  }
}

/// Input to a plugin factory.
#[derive(Debug, Clone, Copy)]
pub struct PluginOptions<'a> {
  pub part_name: &'a str,
  pub properties: &'a Properties,
}

impl PluginOptions<'_> {
  /// Deserialize the properties into a plugin's option struct.
  pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, PluginError> {
    let value = serde_json::to_value(self.properties).map_err(|e| PluginError::InvalidProperties(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| PluginError::InvalidProperties(e.to_string()))
  }
}

/// Everything a plugin may touch while running a step.
pub struct PluginContext<'a> {
  pub part_name: &'a str,
  pub project_dir: &'a Path,
  pub dirs: &'a PartDirs,
  pub stage_dir: &'a Path,
  pub prime_dir: &'a Path,
  /// `NAME=value` shell assignments, in the order they must be applied.
  pub env: &'a [String],
  pub runner: &'a dyn CommandRunner,
}

impl PluginContext<'_> {
  /// Run a shell command with `env` applied, usually `self.env` plus extras.
  pub fn run(&self, command: &str, cwd: &Path, env: &[String]) -> Result<String, PluginError> {
    self.runner.run(&Invocation { command, cwd, env })
  }
}

/// The capabilities the lifecycle needs from a build-tool plugin.
pub trait Plugin {
  /// Fetch sources into `dirs.source`.
  fn pull(&self, ctx: &PluginContext<'_>) -> Result<(), PluginError>;

  /// Build from the sources and install into `dirs.install`.
  fn build(&self, ctx: &PluginContext<'_>) -> Result<(), PluginError>;

  /// Release anything the plugin keeps outside the part directory.
  fn clean(&self, _ctx: &PluginContext<'_>) -> Result<(), PluginError> {
    Ok(())
  }

  /// Runtime environment the built artifact needs when installed under `root`.
  fn env(&self, _root: &Path) -> Vec<String> {
    Vec::new()
  }
}
