use std::fs;
use std::path::{Path, PathBuf};

use partwright_lib::{PluginRegistry, Project, ProjectContext};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A throwaway project directory with a `parts.yaml`.
pub struct TestProject {
  pub temp: TempDir,
}

impl TestProject {
  pub fn new(parts_yaml: &str) -> Self {
    let project = Self {
      temp: TempDir::new().unwrap(),
    };
    project.write("parts.yaml", parts_yaml);
    project
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn join(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  pub fn write(&self, relative: &str, content: &str) {
    let path = self.join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
  }

  pub fn load(&self) -> Project {
    Project::load(ProjectContext::new(self.path()), &PluginRegistry::with_builtins()).unwrap()
  }

  /// Sorted `/`-separated entries under `relative`.
  pub fn tree(&self, relative: &str) -> Vec<String> {
    let root = self.join(relative);
    let mut entries: Vec<String> = WalkDir::new(&root)
      .min_depth(1)
      .into_iter()
      .map(|entry| {
        let entry = entry.unwrap();
        let rel = entry.path().strip_prefix(&root).unwrap();
        rel.components()
          .map(|c| c.as_os_str().to_string_lossy().into_owned())
          .collect::<Vec<_>>()
          .join("/")
      })
      .collect();
    entries.sort();
    entries
  }
}
