//! External command execution.
//!
//! Plugins never spawn processes directly; they go through a
//! [`CommandRunner`] so the lifecycle can be exercised without a shell.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use super::PluginError;

/// One shell command to run.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
  pub command: &'a str,
  pub cwd: &'a Path,
  /// `NAME=value` shell assignments applied in order before the command.
  pub env: &'a [String],
}

/// Runs shell commands on behalf of plugins.
pub trait CommandRunner {
  /// Run the command and return its trimmed stdout.
  fn run(&self, call: &Invocation<'_>) -> Result<String, PluginError>;
}

/// Runs commands through the system shell.
///
/// The process environment is inherited; the invocation's assignments are exported
/// by the shell itself so values may refer to earlier ones (`PATH="...:$PATH"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
  fn run(&self, call: &Invocation<'_>) -> Result<String, PluginError> {
    info!(cmd = %call.command, "executing command");

    let script = shell_script(call);
    let (shell, args) = get_shell();

    debug!(shell = %shell, working_dir = ?call.cwd, "spawning process");

    let output = Command::new(shell)
      .args(args)
      .arg(&script)
      .current_dir(call.cwd)
      .output()
      .map_err(|e| PluginError::io(call.cwd, e))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      let stdout = String::from_utf8_lossy(&output.stdout);

      if !stderr.is_empty() {
        debug!(stderr = %stderr, "command stderr");
      }
      if !stdout.is_empty() {
        debug!(stdout = %stdout, "command stdout");
      }

      return Err(PluginError::CommandFailed {
        command: call.command.to_string(),
        code: output.status.code(),
      });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command output");
    }

    Ok(stdout)
  }
}

/// Prefix the command with `export` lines for every well-formed assignment.
fn shell_script(call: &Invocation<'_>) -> String {
  let mut script = String::new();
  for entry in call.env {
    match entry.split_once('=') {
      Some((name, _)) if is_identifier(name) => {
        script.push_str("export ");
        script.push_str(entry);
        script.push('\n');
      }
      _ => debug!(entry = %entry, "ignoring malformed environment entry"),
    }
  }
  script.push_str(call.command);
  script
}

fn is_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
    && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// `/bin/sh` rather than `$SHELL`, which may source user profiles.
fn get_shell() -> (&'static str, &'static [&'static str]) {
  #[cfg(unix)]
  {
    ("/bin/sh", &["-c"])
  }

  #[cfg(windows)]
  {
    ("sh", &["-c"])
  }
}
