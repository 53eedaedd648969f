//! The `command` plugin: build a local source tree with shell commands.
//!
//! ```yaml
//! parts:
//!   hello:
//!     plugin: command
//!     source: hello
//!     build-commands:
//!       - make
//!       - make install PREFIX="$INSTALLDIR"
//! ```
//!
//! Pull copies `source` (relative to the project directory, default `.`)
//! into the part's source directory. Build copies the sources into the build
//! directory and runs every command there, in `source-subdir` if given, with
//! `INSTALLDIR` pointing at the part's install directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use super::{Plugin, PluginContext, PluginError, PluginFactory, PluginOptions, PluginSchema};
use crate::consts::{LOCK_FILENAME, PARTS_DIRNAME, PRIME_DIRNAME, STAGE_DIRNAME};
use crate::fileset::{ResolvedFileset, resolve_fileset};
use crate::migrate::migrate;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CommandOptions {
  #[serde(default = "default_source")]
  source: String,
  #[serde(default)]
  source_subdir: Option<String>,
  #[serde(default)]
  build_commands: Vec<String>,
}

fn default_source() -> String {
  ".".to_string()
}

#[derive(Debug, Clone)]
pub struct CommandPlugin {
  source: String,
  source_subdir: Option<String>,
  build_commands: Vec<String>,
}

impl CommandPlugin {
  fn source_path(&self, project_dir: &Path) -> Result<PathBuf, PluginError> {
    let path = project_dir.join(&self.source);
    if !path.is_dir() {
      return Err(PluginError::MissingResource(path));
    }
    dunce::canonicalize(&path).map_err(|e| PluginError::io(&path, e))
  }

  /// What to take from the source tree. When the source is the project
  /// itself, the lifecycle's own directories are left out.
  fn source_fileset(source: &Path, project_dir: &Path) -> Result<ResolvedFileset, PluginError> {
    let is_project = dunce::canonicalize(project_dir).is_ok_and(|project| project == source);
    if !is_project {
      return Ok(ResolvedFileset::everything());
    }
    let entries = [PARTS_DIRNAME, STAGE_DIRNAME, PRIME_DIRNAME, LOCK_FILENAME].map(|name| format!("-{name}"));
    resolve_fileset(&entries).map_err(|e| PluginError::Other(e.to_string()))
  }
}

impl Plugin for CommandPlugin {
  fn pull(&self, ctx: &PluginContext<'_>) -> Result<(), PluginError> {
    let source = self.source_path(ctx.project_dir)?;
    let fileset = Self::source_fileset(&source, ctx.project_dir)?;

    reset_dir(&ctx.dirs.source)?;
    let plan = migrate(&fileset, &source, &ctx.dirs.source)?;

    debug!(part = %ctx.part_name, files = plan.files.len(), "pulled local source");
    Ok(())
  }

  fn build(&self, ctx: &PluginContext<'_>) -> Result<(), PluginError> {
    reset_dir(&ctx.dirs.build)?;
    migrate(&ResolvedFileset::everything(), &ctx.dirs.source, &ctx.dirs.build)?;

    let cwd = match &self.source_subdir {
      Some(subdir) => ctx.dirs.build.join(subdir),
      None => ctx.dirs.build.clone(),
    };
    if !cwd.is_dir() {
      return Err(PluginError::MissingResource(cwd));
    }

    let mut env = ctx.env.to_vec();
    env.push(format!("INSTALLDIR=\"{}\"", ctx.dirs.install.display()));

    for command in &self.build_commands {
      info!(part = %ctx.part_name, cmd = %command, "running build command");
      ctx.run(command, &cwd, &env)?;
    }
    Ok(())
  }
}

fn reset_dir(dir: &Path) -> Result<(), PluginError> {
  match fs::remove_dir_all(dir) {
    Ok(()) => {}
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => return Err(PluginError::io(dir, e)),
  }
  fs::create_dir_all(dir).map_err(|e| PluginError::io(dir, e))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandFactory;

impl PluginFactory for CommandFactory {
  fn schema(&self) -> PluginSchema {
    PluginSchema {
      properties: serde_json::json!({
        "source": {"type": "string"},
        "source-subdir": {"type": "string"},
        "build-commands": {
          "type": "array",
          "items": {"type": "string"},
        },
      }),
      required: Vec::new(),
    }
  }

  fn create(&self, options: &PluginOptions<'_>) -> Result<Box<dyn Plugin>, PluginError> {
    let CommandOptions {
      source,
      source_subdir,
      build_commands,
    } = options.parse()?;
    Ok(Box::new(CommandPlugin {
      source,
      source_subdir,
      build_commands,
    }))
  }
}
