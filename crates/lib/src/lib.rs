//! partwright-lib: lifecycle engine for building a package out of parts.
//!
//! Each part advances through `pull`, `build`, `stage` and `prime`:
//! - `fileset`: include/exclude glob declarations and their matcher
//! - `migrate`: copies the selected subset of one tree into another
//! - `collision`: detects parts staging divergent content at the same path
//! - `part`: descriptor, working directories and persisted step status
//! - `lifecycle`: dependency graph and the step executor
//! - `plugin`: the build-tool capability interface and its registry
//! - `project`: project directory, `parts.yaml` loading and the project lock

pub mod collision;
pub mod consts;
pub mod env;
pub mod error;
pub mod fileset;
pub mod lifecycle;
pub mod migrate;
pub mod part;
pub mod plugin;
pub mod project;
pub mod util;

pub use error::LifecycleError;
pub use lifecycle::{Executor, RunReport, StepEvent, clean, execute};
pub use part::{Part, Step, StepStatus};
pub use plugin::{CommandRunner, PluginRegistry, ShellRunner};
pub use project::{Project, ProjectContext};
