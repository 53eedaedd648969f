//! Implementation of `partwright env`.
//!
//! Prints `NAME=value` lines ready to be `eval`ed by a POSIX shell.

use anyhow::Result;

use partwright_lib::ProjectContext;

use super::load_project;
use crate::output::{OutputFormat, print_json};

pub fn cmd_env(context: ProjectContext, part: Option<&str>, output: OutputFormat) -> Result<()> {
  let project = load_project(context)?;

  let env = match part {
    Some(name) => {
      project.select(&[name])?;
      project.build_environment(name)
    }
    None => project.runtime_environment(),
  };

  if output.is_json() {
    print_json(&env)?;
  } else {
    for entry in env {
      println!("export {entry}");
    }
  }

  Ok(())
}
