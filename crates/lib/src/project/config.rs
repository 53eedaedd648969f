//! Loading part descriptors from `parts.yaml`.
//!
//! ```yaml
//! name: hello
//! parts:
//!   libgreet:
//!     plugin: command
//!     source: libgreet
//!     build-commands: [make, make install]
//!   hello:
//!     plugin: command
//!     after: [libgreet]
//!     stage: [bin, -share/doc]
//! ```
//!
//! Parts keep the order they are written in; it breaks ties when ordering
//! parts for execution. Keys other than `plugin`, `after`, `stage` and `prime`
//! are handed to the plugin as properties.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::part::PartDescriptor;

/// Parsed contents of a project file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig {
  pub name: Option<String>,
  pub parts: Vec<PartDescriptor>,
}

#[derive(Deserialize)]
struct RawProject {
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  parts: serde_yaml::Mapping,
}

impl ProjectConfig {
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadProject {
      path: path.to_path_buf(),
      source,
    })?;
    let config = Self::parse(&content, path)?;
    debug!(path = %path.display(), parts = config.parts.len(), "loaded project file");
    Ok(config)
  }

  /// Parse project file text; `path` is only used in error messages.
  pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
    let parse_error = |message: String| ConfigError::ParseProject {
      path: path.to_path_buf(),
      message,
    };

    let raw: RawProject = serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

    let mut parts = Vec::with_capacity(raw.parts.len());
    for (key, value) in raw.parts {
      let name = key
        .as_str()
        .ok_or_else(|| parse_error(format!("part names must be strings, found {key:?}")))?
        .to_string();
      let mut descriptor: PartDescriptor =
        serde_yaml::from_value(value).map_err(|e| parse_error(format!("part '{name}': {e}")))?;
      descriptor.name = name;
      parts.push(descriptor);
    }

    Ok(Self { name: raw.name, parts })
  }
}
