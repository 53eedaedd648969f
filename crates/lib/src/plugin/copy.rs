//! The `copy` plugin: install files straight from the project directory.
//!
//! ```yaml
//! parts:
//!   config:
//!     plugin: copy
//!     files:
//!       conf/app.toml: etc/app.toml
//!       assets: share/app
//! ```
//!
//! Sources are relative to the project directory, destinations relative to
//! the part's install directory. A source directory is copied recursively.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{Plugin, PluginContext, PluginError, PluginFactory, PluginOptions, PluginSchema};
use crate::fileset::ResolvedFileset;
use crate::migrate::migrate;

#[derive(Debug, Clone, Deserialize)]
struct CopyOptions {
  files: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct CopyPlugin {
  files: BTreeMap<String, String>,
}

impl Plugin for CopyPlugin {
  fn pull(&self, ctx: &PluginContext<'_>) -> Result<(), PluginError> {
    for src in self.files.keys() {
      let path = ctx.project_dir.join(src);
      if fs::symlink_metadata(&path).is_err() {
        return Err(PluginError::MissingResource(path));
      }
    }
    Ok(())
  }

  fn build(&self, ctx: &PluginContext<'_>) -> Result<(), PluginError> {
    for (src, dst) in &self.files {
      let from = ctx.project_dir.join(src);
      let to = ctx.dirs.install.join(dst);
      debug!(part = %ctx.part_name, from = %from.display(), to = %to.display(), "copying");

      if from.is_dir() {
        migrate(&ResolvedFileset::everything(), &from, &to)?;
      } else {
        copy_file(&from, &to)?;
      }
    }
    Ok(())
  }
}

fn copy_file(from: &Path, to: &Path) -> Result<(), PluginError> {
  if !from.exists() {
    return Err(PluginError::MissingResource(from.to_path_buf()));
  }
  if let Some(parent) = to.parent() {
    fs::create_dir_all(parent).map_err(|e| PluginError::io(parent, e))?;
  }
  fs::copy(from, to).map_err(|e| PluginError::io(from, e))?;
  Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CopyFactory;

impl PluginFactory for CopyFactory {
  fn schema(&self) -> PluginSchema {
    PluginSchema {
      properties: serde_json::json!({
        "files": {
          "type": "object",
          "additionalProperties": {"type": "string"},
        },
      }),
      required: vec!["files".to_string()],
    }
  }

  fn create(&self, options: &PluginOptions<'_>) -> Result<Box<dyn Plugin>, PluginError> {
    let CopyOptions { files } = options.parse()?;
    Ok(Box::new(CopyPlugin { files }))
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;
  use crate::part::{PartDirs, Properties};
  use crate::plugin::runner::recording::RecordingRunner;
  use crate::util::testutil::{list_tree, write_file};

  fn plugin(files: &[(&str, &str)]) -> Box<dyn Plugin> {
    let mut properties = Properties::new();
    let map: BTreeMap<&str, &str> = files.iter().copied().collect();
    properties.insert("files".to_string(), serde_json::json!(map));
    CopyFactory
      .create(&PluginOptions {
        part_name: "copier",
        properties: &properties,
      })
      .ok()
      .unwrap()
  }

  fn with_context<F: FnOnce(&PluginContext<'_>)>(project: &Path, f: F) {
    let dirs = PartDirs::new(&project.join("parts"), "copier");
    let runner = RecordingRunner::default();
    let ctx = PluginContext {
      part_name: "copier",
      project_dir: project,
      dirs: &dirs,
      stage_dir: &project.join("stage"),
      prime_dir: &project.join("prime"),
      env: &[],
      runner: &runner,
    };
    f(&ctx);
  }

  #[test]
  fn copies_files_and_directories() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "app.toml", "x = 1");
    write_file(temp.path(), "assets/logo.svg", "<svg/>");
    let plugin = plugin(&[("app.toml", "etc/app.toml"), ("assets", "share/app")]);

    with_context(temp.path(), |ctx| {
      plugin.pull(ctx).unwrap();
      plugin.build(ctx).unwrap();
      assert_eq!(
        list_tree(&ctx.dirs.install),
        vec!["etc", "etc/app.toml", "share", "share/app", "share/app/logo.svg"]
      );
    });
  }

  #[test]
  fn pull_reports_missing_source() {
    let temp = TempDir::new().unwrap();
    let plugin = plugin(&[("missing", "x")]);

    with_context(temp.path(), |ctx| {
      let err = plugin.pull(ctx).unwrap_err();
      assert!(matches!(err, PluginError::MissingResource(ref path) if path == &temp.path().join("missing")));
    });
  }

  #[test]
  fn files_is_required() {
    let properties = Properties::new();
    let result = CopyFactory.create(&PluginOptions {
      part_name: "copier",
      properties: &properties,
    });
    assert!(matches!(result, Err(PluginError::InvalidProperties(_))));
  }
}
