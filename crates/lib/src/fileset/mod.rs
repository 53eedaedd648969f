//! Declarative include/exclude filesets.
//!
//! A fileset is an ordered list of glob patterns controlling what a migration
//! selects. Entries starting with `-` exclude; `\-` and `\\` escape a literal
//! leading `-` or `\` in an include. Without any include entry the fileset
//! includes everything (`*`).
//!
//! Globs are matched against `/`-separated paths relative to the tree root,
//! and `*` never crosses a separator: `usr/lib/*.a` matches `usr/lib/libfoo.a`
//! but not `usr/lib/static/libfoo.a`.

use std::path::Path;

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

/// Errors raised while resolving or compiling a fileset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilesetError {
  /// A glob was given as an absolute path.
  #[error("path \"{0}\" must be relative")]
  AbsolutePath(String),

  /// A glob could not be compiled.
  #[error("invalid pattern \"{pattern}\": {message}")]
  InvalidPattern { pattern: String, message: String },
}

/// A fileset split into its include and exclude globs, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFileset {
  pub includes: Vec<String>,
  pub excludes: Vec<String>,
}

impl ResolvedFileset {
  /// The fileset selecting every entry of a tree.
  pub fn everything() -> Self {
    Self {
      includes: vec!["*".to_string()],
      excludes: Vec::new(),
    }
  }

  /// Compile the globs into a matcher.
  pub fn matcher(&self) -> Result<FilesetMatcher, FilesetError> {
    FilesetMatcher::new(self)
  }
}

impl Default for ResolvedFileset {
  fn default() -> Self {
    Self::everything()
  }
}

/// Classify raw fileset entries into includes and excludes.
///
/// # Errors
///
/// Returns `FilesetError::AbsolutePath` naming the first absolute glob.
pub fn resolve_fileset<S: AsRef<str>>(entries: &[S]) -> Result<ResolvedFileset, FilesetError> {
  let mut includes = Vec::new();
  let mut excludes = Vec::new();

  for entry in entries {
    let entry = entry.as_ref();
    if let Some(exclude) = entry.strip_prefix('-') {
      excludes.push(exclude.to_string());
    } else if entry.starts_with("\\-") || entry.starts_with("\\\\") {
      // Only the escape character is consumed
      includes.push(entry[1..].to_string());
    } else {
      includes.push(entry.to_string());
    }
  }

  if includes.is_empty() {
    includes.push("*".to_string());
  }

  for path in includes.iter().chain(excludes.iter()) {
    if path.starts_with('/') || Path::new(path).is_absolute() {
      return Err(FilesetError::AbsolutePath(path.clone()));
    }
  }

  Ok(ResolvedFileset { includes, excludes })
}

/// Compiled form of a [`ResolvedFileset`].
#[derive(Debug, Clone)]
pub struct FilesetMatcher {
  includes: Vec<Pattern>,
  excludes: Vec<Pattern>,
}

impl FilesetMatcher {
  pub fn new(fileset: &ResolvedFileset) -> Result<Self, FilesetError> {
    Ok(Self {
      includes: compile(&fileset.includes)?,
      excludes: compile(&fileset.excludes)?,
    })
  }

  /// Whether a relative path is selected.
  ///
  /// A path is selected when it or one of its ancestors matches an include
  /// glob and neither it nor any ancestor matches an exclude glob.
  pub fn is_selected(&self, relative: &Path) -> bool {
    let mut included = false;

    for ancestor in relative.ancestors() {
      if ancestor.as_os_str().is_empty() {
        continue;
      }
      let candidate = slash_path(ancestor);
      if self.excludes.iter().any(|p| p.matches_with(&candidate, MATCH_OPTIONS)) {
        return false;
      }
      if !included {
        included = self.includes.iter().any(|p| p.matches_with(&candidate, MATCH_OPTIONS));
      }
    }

    included
  }
}

fn compile(globs: &[String]) -> Result<Vec<Pattern>, FilesetError> {
  globs
    .iter()
    .map(|glob| {
      Pattern::new(glob).map_err(|e| FilesetError::InvalidPattern {
        pattern: glob.clone(),
        message: e.msg.to_string(),
      })
    })
    .collect()
}

/// Render a relative path with `/` separators regardless of platform.
pub(crate) fn slash_path(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}
