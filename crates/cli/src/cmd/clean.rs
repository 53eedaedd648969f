//! Implementation of `partwright clean`.

use anyhow::Result;

use partwright_lib::{ProjectContext, ShellRunner, clean};

use super::load_project;
use crate::output::{OutputFormat, print_json, print_success, print_warning};

/// Remove the working directories of the given parts (all when empty).
///
/// Parts depending on a cleaned part keep their state.
pub fn cmd_clean(context: ProjectContext, parts: &[String], output: OutputFormat) -> Result<()> {
  let mut project = load_project(context)?;
  let cleaned = clean(&mut project, &ShellRunner, parts)?;

  if output.is_json() {
    print_json(&serde_json::json!({ "cleaned": cleaned }))?;
  } else if cleaned.is_empty() {
    print_warning("No parts to clean");
  } else {
    print_success(&format!("Cleaned {}", cleaned.join(", ")));
  }

  Ok(())
}
