//! Tree migration.
//!
//! Applies a resolved fileset to a source tree: every entry under the source
//! root is classified as migrated or skipped, then the migrated entries are
//! recreated under the destination root. Ancestors of selected entries are
//! created as needed without selecting their siblings.
//!
//! There is no rollback: when a copy fails, entries already written stay in
//! the destination.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::fileset::{FilesetError, ResolvedFileset};

/// Errors that can occur while planning or applying a migration.
#[derive(Debug, Error)]
pub enum MigrateError {
  #[error(transparent)]
  Fileset(#[from] FilesetError),

  #[error("failed to walk {root}: {message}")]
  Walk { root: PathBuf, message: String },

  #[error("failed to create directory {path}: {source}")]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {from} to {to}: {source}")]
  Copy { from: PathBuf, to: PathBuf, source: io::Error },
}

/// The outcome of classifying a tree against a fileset.
///
/// Paths are relative to the source root. Every entry of the tree appears in
/// exactly one of `files`, `dirs` and `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPlan {
  /// Non-directory entries to copy (regular files and symlinks).
  pub files: BTreeSet<PathBuf>,

  /// Directories to create, including implicit ancestors of selected entries.
  pub dirs: BTreeSet<PathBuf>,

  /// Entries left behind.
  pub skipped: BTreeSet<PathBuf>,
}

impl MigrationPlan {
  pub fn is_empty(&self) -> bool {
    self.files.is_empty() && self.dirs.is_empty()
  }

  /// Keep only the entries also selected by `allowed`; the rest are skipped.
  pub fn restrict_to(&self, allowed: &MigrationPlan) -> MigrationPlan {
    let mut restricted = MigrationPlan {
      skipped: self.skipped.clone(),
      ..MigrationPlan::default()
    };

    for file in &self.files {
      if allowed.files.contains(file) {
        restricted.files.insert(file.clone());
      } else {
        restricted.skipped.insert(file.clone());
      }
    }
    for dir in &self.dirs {
      if allowed.dirs.contains(dir) {
        restricted.dirs.insert(dir.clone());
      } else {
        restricted.skipped.insert(dir.clone());
      }
    }

    restricted
  }
}

/// Classify every entry under `root` against `fileset`.
///
/// Symlinks are not followed. A missing root yields an empty plan.
pub fn migratable_filesets(fileset: &ResolvedFileset, root: &Path) -> Result<MigrationPlan, MigrateError> {
  let matcher = fileset.matcher()?;
  let mut plan = MigrationPlan::default();

  if !root.is_dir() {
    debug!(root = %root.display(), "migration source does not exist");
    return Ok(plan);
  }

  let mut unselected = Vec::new();

  for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
    let entry = entry.map_err(|e| MigrateError::Walk {
      root: root.to_path_buf(),
      message: e.to_string(),
    })?;
    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path()).to_path_buf();

    if matcher.is_selected(&relative) {
      if entry.file_type().is_dir() {
        plan.dirs.insert(relative);
      } else {
        plan.files.insert(relative);
      }
    } else {
      unselected.push(relative);
    }
  }

  let ancestors: Vec<PathBuf> = plan
    .files
    .iter()
    .chain(plan.dirs.iter())
    .flat_map(|path| path.ancestors().skip(1))
    .filter(|ancestor| !ancestor.as_os_str().is_empty())
    .map(Path::to_path_buf)
    .collect();
  plan.dirs.extend(ancestors);

  plan.skipped = unselected.into_iter().filter(|path| !plan.dirs.contains(path)).collect();

  Ok(plan)
}

/// Recreate the planned entries of `src` under `dst`.
///
/// Directories are created idempotently. Files keep their type and
/// permission bits; an existing destination file is replaced.
pub fn migrate_files(plan: &MigrationPlan, src: &Path, dst: &Path) -> Result<(), MigrateError> {
  // Sorted order creates parents before children
  for dir in &plan.dirs {
    let path = dst.join(dir);
    fs::create_dir_all(&path).map_err(|source| MigrateError::CreateDir { path, source })?;
  }

  for file in &plan.files {
    let from = src.join(file);
    let to = dst.join(file);
    copy_entry(&from, &to).map_err(|source| MigrateError::Copy { from, to, source })?;
  }

  Ok(())
}

/// Plan and apply a migration in one go.
pub fn migrate(fileset: &ResolvedFileset, src: &Path, dst: &Path) -> Result<MigrationPlan, MigrateError> {
  let plan = migratable_filesets(fileset, src)?;
  fs::create_dir_all(dst).map_err(|source| MigrateError::CreateDir {
    path: dst.to_path_buf(),
    source,
  })?;
  migrate_files(&plan, src, dst)?;

  info!(
    src = %src.display(),
    dst = %dst.display(),
    files = plan.files.len(),
    dirs = plan.dirs.len(),
    "migrated files"
  );

  Ok(plan)
}

fn copy_entry(from: &Path, to: &Path) -> io::Result<()> {
  let metadata = fs::symlink_metadata(from)?;

  if fs::symlink_metadata(to).is_ok() {
    fs::remove_file(to)?;
  }

  if metadata.file_type().is_symlink() {
    let target = fs::read_link(from)?;
    return make_symlink(&target, to);
  }

  // fs::copy carries the permission bits over, executable bit included
  fs::copy(from, to)?;
  Ok(())
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
  std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
  std::os::windows::fs::symlink_file(target, link)
}
