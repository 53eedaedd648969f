mod clean;
mod env;
mod run;
mod status;

pub use clean::cmd_clean;
pub use env::cmd_env;
pub use run::cmd_run;
pub use status::cmd_status;

use anyhow::Result;

use partwright_lib::{PluginRegistry, Project, ProjectContext};

/// Load `parts.yaml` with the built-in plugins.
fn load_project(context: ProjectContext) -> Result<Project> {
  Ok(Project::load(context, &PluginRegistry::with_builtins())?)
}
