//! Implementation of `partwright pull|build|stage|prime`.

use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use partwright_lib::{ProjectContext, ShellRunner, Step, execute};

use super::load_project;
use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

/// Run `step` for the given parts (all when empty).
///
/// Earlier steps run first where needed; completed steps are skipped.
pub fn cmd_run(context: ProjectContext, step: Step, parts: &[String], output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let mut project = load_project(context)?;
  debug!(step = %step, requested = parts.len(), "loaded project");

  let report = execute(&mut project, &ShellRunner, step, parts)?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    let performed = report.performed().count();
    let skipped = report.skipped().count();

    println!();
    print_success(&format!("{} complete", capitalize(step.as_str())));
    print_stat("Steps run", &performed.to_string());
    print_stat("Steps skipped", &skipped.to_string());
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}

fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn capitalizes_step_names() {
    assert_eq!(capitalize("prime"), "Prime");
    assert_eq!(capitalize(""), "");
  }
}
