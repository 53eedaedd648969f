//! Implementation of `partwright status`.
//!
//! Lists every part in execution order with the last step it completed.

use std::fs;
use std::time::SystemTime;

use anyhow::Result;
use serde::Serialize;

use partwright_lib::consts::STATE_FILENAME;
use partwright_lib::{Part, ProjectContext, StepStatus};

use super::load_project;
use crate::output::{self, OutputFormat, format_age, print_info, print_json, status_symbol};

#[derive(Serialize)]
struct PartStatus<'a> {
  name: &'a str,
  plugin: &'a str,
  status: StepStatus,
  after: &'a [String],
  #[serde(skip_serializing_if = "Option::is_none")]
  updated: Option<String>,
}

pub fn cmd_status(context: ProjectContext, verbose: bool, output: OutputFormat) -> Result<()> {
  let project = load_project(context)?;
  let now = SystemTime::now();

  let parts: Vec<PartStatus<'_>> = project
    .graph()
    .order()
    .into_iter()
    .filter_map(|name| project.part(name))
    .map(|part| PartStatus {
      name: part.name(),
      plugin: &part.descriptor().plugin,
      status: part.status(),
      after: part.after(),
      updated: last_update(part).map(|time| format_age(time, now)),
    })
    .collect();

  if output.is_json() {
    print_json(&serde_json::json!({ "project": project.name(), "parts": parts }))?;
    return Ok(());
  }

  if parts.is_empty() {
    print_info("No parts defined.");
    return Ok(());
  }

  if let Some(name) = project.name() {
    print_info(&format!("Project {name}"));
  }
  for part in &parts {
    let updated = part.updated.as_deref().map(|age| format!(" ({age})")).unwrap_or_default();
    println!("  {} {:<20} {}{}", status_symbol(part.status), part.name, part.status, updated);

    if verbose {
      println!("      plugin: {}", part.plugin);
      if !part.after.is_empty() {
        println!("      {} after: {}", output::symbols::ARROW, part.after.join(", "));
      }
    }
  }

  Ok(())
}

/// When the part's state file was last written.
fn last_update(part: &Part) -> Option<SystemTime> {
  fs::metadata(part.dirs().part.join(STATE_FILENAME))
    .and_then(|m| m.modified())
    .ok()
}
