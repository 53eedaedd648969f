//! Cross-part collision detection.
//!
//! Before anything is merged into the shared stage tree, every pair of parts
//! is compared over their whole install trees: a relative path both parts
//! install with different content, or as different kinds of entry, is a
//! collision. Identical content is expected (shared libraries and the like)
//! and is not reported.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::fileset::{ResolvedFileset, slash_path};
use crate::migrate::{MigrateError, migratable_filesets};
use crate::util::hash::{Fingerprint, HashError, fingerprint};

/// A part whose install tree is about to be merged.
#[derive(Debug, Clone, Copy)]
pub struct CollisionCandidate<'a> {
  pub name: &'a str,
  pub install_dir: &'a Path,
}

/// Paths two parts both provide with different content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartCollision {
  pub first: String,
  pub second: String,
  /// Sorted relative paths.
  pub paths: Vec<String>,
}

impl fmt::Display for PartCollision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Parts '{}' and '{}' have the following file paths in common which have different contents:",
      self.first, self.second
    )?;
    for path in &self.paths {
      write!(f, "\n{path}")?;
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum CollisionError {
  #[error("{}", format_collisions(.0))]
  Conflicts(Vec<PartCollision>),

  #[error(transparent)]
  Scan(#[from] MigrateError),

  #[error(transparent)]
  Hash(#[from] HashError),
}

fn format_collisions(collisions: &[PartCollision]) -> String {
  collisions.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

/// Find every pair of candidates providing a common path with different content.
///
/// Pairs are visited in declaration order and reported independently: a path
/// differing across three parts shows up once per differing pair.
pub fn find_collisions(candidates: &[CollisionCandidate<'_>]) -> Result<Vec<PartCollision>, CollisionError> {
  let everything = ResolvedFileset::everything();
  let mut entries: Vec<BTreeSet<PathBuf>> = Vec::with_capacity(candidates.len());
  for candidate in candidates {
    let plan = migratable_filesets(&everything, candidate.install_dir)?;
    entries.push(plan.files.into_iter().chain(plan.dirs).collect());
  }

  let mut cache: HashMap<(usize, PathBuf), Fingerprint> = HashMap::new();
  let mut collisions = Vec::new();

  for (i, first) in candidates.iter().enumerate() {
    for (j, second) in candidates.iter().enumerate().skip(i + 1) {
      let mut paths = Vec::new();

      for path in entries[i].intersection(&entries[j]) {
        let left = cached_fingerprint(&mut cache, i, first.install_dir, path)?;
        let right = cached_fingerprint(&mut cache, j, second.install_dir, path)?;
        if left != right {
          paths.push(slash_path(path));
        }
      }

      if !paths.is_empty() {
        paths.sort();
        debug!(first = %first.name, second = %second.name, paths = paths.len(), "parts collide");
        collisions.push(PartCollision {
          first: first.name.to_string(),
          second: second.name.to_string(),
          paths,
        });
      }
    }
  }

  Ok(collisions)
}

/// Fail with [`CollisionError::Conflicts`] if any pair collides.
pub fn check_for_collisions(candidates: &[CollisionCandidate<'_>]) -> Result<(), CollisionError> {
  let collisions = find_collisions(candidates)?;
  if collisions.is_empty() {
    Ok(())
  } else {
    Err(CollisionError::Conflicts(collisions))
  }
}

fn cached_fingerprint(
  cache: &mut HashMap<(usize, PathBuf), Fingerprint>,
  index: usize,
  root: &Path,
  relative: &Path,
) -> Result<Fingerprint, HashError> {
  let key = (index, relative.to_path_buf());
  if let Some(found) = cache.get(&key) {
    return Ok(found.clone());
  }
  let found = fingerprint(&root.join(relative))?;
  cache.insert(key, found.clone());
  Ok(found)
}
