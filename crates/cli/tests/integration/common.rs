//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// A project with two command parts: `hello` builds after `libgreet`.
pub const GREET_PROJECT: &str = r#"
name: greet
parts:
  libgreet:
    plugin: command
    source: libgreet
    build-commands:
      - mkdir -p "$INSTALLDIR/lib" "$INSTALLDIR/share/doc"
      - cp greet.txt "$INSTALLDIR/lib/"
      - cp README "$INSTALLDIR/share/doc/"
    stage: [-share]
  hello:
    plugin: command
    source: hello
    after: [libgreet]
    build-commands:
      - mkdir -p "$INSTALLDIR/bin"
      - cp hello.sh "$INSTALLDIR/bin/hello"
    prime: [bin]
"#;

/// Isolated test environment.
///
/// Each test gets its own project directory; commands run with `-C` pointing at it.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create a project from `parts.yaml` content.
  pub fn new(parts_yaml: &str) -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    env.write_file("parts.yaml", parts_yaml);
    env
  }

  /// The greet project with its sources in place.
  pub fn greet() -> Self {
    let env = Self::new(GREET_PROJECT);
    env.write_file("libgreet/greet.txt", "hello\n");
    env.write_file("libgreet/README", "docs\n");
    env.write_file("hello/hello.sh", "#!/bin/sh\necho hello\n");
    env
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn join(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Get a Command for partwright operating on this project.
  pub fn pw_cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("partwright");
    cmd.arg("-C").arg(self.path());
    cmd.env_remove("PARTWRIGHT_PROJECT_DIR");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd
  }

  /// Parse the JSON printed by a command run with `-o json`.
  pub fn json(&self, args: &[&str]) -> serde_json::Value {
    let output = self.pw_cmd().args(["-o", "json"]).args(args).output().unwrap();
    assert!(
      output.status.success(),
      "partwright {args:?} failed: {}",
      String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
  }
}
