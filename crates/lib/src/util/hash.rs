//! Content hashing for comparing files across trees.
//!
//! - `ContentHash`: a full 64-character SHA-256 hash
//! - `hash_file()`: hash a file's bytes
//! - `hash_bytes()`: hash arbitrary bytes
//! - `fingerprint()`: identity of a tree entry, by kind then content

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A full 64-character SHA256 hash for content comparison.
///
/// The hash is a lowercase hexadecimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Error while hashing a tree entry.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
  #[error("failed to read file {path}: {message}")]
  ReadFile { path: String, message: String },

  #[error("failed to read symlink {path}: {message}")]
  ReadSymlink { path: String, message: String },
}

/// Hash a file's contents.
///
/// Returns the full 64-character SHA256 hash of the file.
pub fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
  let mut file = fs::File::open(path).map_err(|e| HashError::ReadFile {
    path: path.display().to_string(),
    message: e.to_string(),
  })?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer).map_err(|e| HashError::ReadFile {
      path: path.display().to_string(),
      message: e.to_string(),
    })?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  ContentHash(hex::encode(Sha256::digest(data)))
}

/// Identity of a tree entry. Entries of different kinds never compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
  Directory,
  File(ContentHash),
  Symlink(PathBuf),
}

/// Identify a tree entry by kind and content.
///
/// Symlinks are identified by their target rather than followed, so two
/// links pointing at the same relative path compare equal even if the
/// target is absent.
pub fn fingerprint(path: &Path) -> Result<Fingerprint, HashError> {
  let file_type = fs::symlink_metadata(path)
    .map(|m| m.file_type())
    .map_err(|e| HashError::ReadFile {
      path: path.display().to_string(),
      message: e.to_string(),
    })?;

  if file_type.is_symlink() {
    let target = fs::read_link(path).map_err(|e| HashError::ReadSymlink {
      path: path.display().to_string(),
      message: e.to_string(),
    })?;
    return Ok(Fingerprint::Symlink(target));
  }
  if file_type.is_dir() {
    return Ok(Fingerprint::Directory);
  }

  hash_file(path).map(Fingerprint::File)
}
