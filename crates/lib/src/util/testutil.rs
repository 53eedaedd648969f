//! Test utilities for partwright-lib.
//!
//! Helpers for building small directory trees and listing them back.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::fileset::slash_path;

/// Create the sample tree used by migration tests.
///
/// ```text
/// a  b  1/a  3/a          (files)
/// 1/1a/1b  2/2a  3        (directories)
/// ```
pub fn make_sample_tree(root: &Path) {
  fs::create_dir_all(root.join("1/1a/1b")).unwrap();
  fs::create_dir_all(root.join("2/2a")).unwrap();
  fs::create_dir_all(root.join("3")).unwrap();
  for file in ["a", "b", "1/a", "3/a"] {
    fs::write(root.join(file), "").unwrap();
  }
}

/// Write a file relative to `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, content).unwrap();
}

/// Every entry under `root` as a sorted list of `/`-separated relative paths.
pub fn list_tree(root: &Path) -> Vec<String> {
  let mut entries: Vec<String> = WalkDir::new(root)
    .min_depth(1)
    .into_iter()
    .map(|entry| {
      let entry = entry.unwrap();
      slash_path(entry.path().strip_prefix(root).unwrap())
    })
    .collect();
  entries.sort();
  entries
}
