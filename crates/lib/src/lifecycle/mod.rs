//! Driving parts through pull, build, stage and prime.
//!
//! A run requests one step for a set of parts. Every earlier step is run
//! first, one pass per step over the requested parts in dependency order.
//! A step a part already completed, in this or an earlier invocation, is
//! skipped. Before a part does anything, its prerequisites must have been
//! staged; those that were not are staged on the spot when they are part of
//! the run, and make the run fail otherwise.
//!
//! Every stage pass is preceded by a collision check over all parts, so no
//! two parts ever write different content to the same path in the stage
//! tree.

pub mod graph;
pub mod types;

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

pub use graph::PartGraph;
pub use types::{RunReport, StepEvent};

use crate::collision::{CollisionCandidate, check_for_collisions};
use crate::consts::APP_NAME;
use crate::error::{ConfigError, DependencyError, LifecycleError};
use crate::migrate::{migratable_filesets, migrate, migrate_files};
use crate::part::{Part, Step};
use crate::plugin::{CommandRunner, PluginContext};
use crate::project::{Project, ProjectContext, ProjectLock};

/// Runs lifecycle steps against a loaded project.
pub struct Executor<'a> {
  project: &'a mut Project,
  runner: &'a dyn CommandRunner,
  report: RunReport,
}

impl<'a> Executor<'a> {
  pub fn new(project: &'a mut Project, runner: &'a dyn CommandRunner) -> Self {
    Self {
      project,
      runner,
      report: RunReport::default(),
    }
  }

  /// Advance the named parts (all when empty) through `step`.
  pub fn run<S: AsRef<str>>(&mut self, step: Step, names: &[S]) -> Result<RunReport, LifecycleError> {
    let selected = self.project.select(names)?;
    info!(step = %step, parts = selected.len(), "starting run");

    self.run_parts(step, &selected)?;
    Ok(std::mem::take(&mut self.report))
  }

  fn run_parts(&mut self, step: Step, names: &[String]) -> Result<(), LifecycleError> {
    for current in step.through() {
      if current == Step::Stage {
        self.check_collisions()?;
      }
      for name in names {
        self.run_step(current, name, names)?;
      }
    }
    Ok(())
  }

  fn run_step(&mut self, step: Step, name: &str, run: &[String]) -> Result<(), LifecycleError> {
    let part = self.part(name)?;
    if part.is_done(step) {
      info!(part = %name, step = %step, "Skipping {step} {name} (already ran)");
      self.report.record(step, name, true);
      return Ok(());
    }

    let pending = self.unstaged_prerequisites(name);
    if !pending.is_empty() {
      let missing: Vec<String> = pending.iter().filter(|p| !run.contains(p)).cloned().collect();
      if !missing.is_empty() {
        return Err(
          DependencyError::Unsatisfied {
            step,
            part: name.to_string(),
            missing,
          }
          .into(),
        );
      }

      info!(
        part = %name,
        "'{name}' has prerequisites that need to be staged: {}",
        pending.join(" ")
      );
      let refs: Vec<&str> = pending.iter().map(String::as_str).collect();
      let ordered: Vec<String> = self.project.graph().sorted(&refs).into_iter().map(str::to_string).collect();
      self.run_parts(Step::Stage, &ordered)?;
    }

    self.perform(step, name)
  }

  /// Prerequisites of `name`, direct or not, that have not been staged yet.
  fn unstaged_prerequisites(&self, name: &str) -> Vec<String> {
    self
      .project
      .graph()
      .prerequisites(name)
      .into_iter()
      .filter(|prerequisite| {
        self
          .project
          .part(prerequisite)
          .is_some_and(|part| !part.is_done(Step::Stage))
      })
      .map(str::to_string)
      .collect()
  }

  fn perform(&mut self, step: Step, name: &str) -> Result<(), LifecycleError> {
    let env = self.project.build_environment(name);
    let context = self.project.context();
    let part = self.part(name)?;

    part.makedirs(context)?;
    info!(part = %name, step = %step, "{} {name}", step.progress());

    match step {
      Step::Pull | Step::Build => {
        let ctx = plugin_context(part, context, &env, self.runner);
        let result = if step == Step::Pull {
          part.plugin().pull(&ctx)
        } else {
          part.plugin().build(&ctx)
        };
        result.map_err(|e| LifecycleError::plugin(name, step, e))?;
      }
      Step::Stage => {
        migrate(part.stage_fileset(), &part.dirs().install, context.stage_dir())?;
      }
      Step::Prime => prime(part, context)?,
    }

    if let Some(part) = self.project.part_mut(name) {
      part.mark_done(step)?;
    }
    self.report.record(step, name, false);
    Ok(())
  }

  fn check_collisions(&self) -> Result<(), LifecycleError> {
    let candidates: Vec<CollisionCandidate<'_>> = self
      .project
      .parts()
      .iter()
      .map(|part| CollisionCandidate {
        name: part.name(),
        install_dir: &part.dirs().install,
      })
      .collect();

    check_for_collisions(&candidates)?;
    debug!(parts = candidates.len(), "no collisions");
    Ok(())
  }

  /// Remove the working directories of the named parts (all when empty).
  ///
  /// Dependents are left alone. Cleaning every part also removes the shared
  /// stage and prime trees. Returns the parts cleaned, in graph order.
  pub fn clean<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<String>, LifecycleError> {
    let selected = self.project.select(names)?;

    for name in &selected {
      let stale: Vec<&str> = self
        .project
        .graph()
        .dependents(name)
        .into_iter()
        .filter(|dependent| !selected.iter().any(|s| s == dependent))
        .filter(|dependent| self.project.part(dependent).is_some_and(|p| p.is_done(Step::Stage)))
        .collect();
      if !stale.is_empty() {
        warn!(part = %name, dependents = %stale.join(" "), "cleaning a part other staged parts depend on");
      }

      let context = self.project.context();
      let part = self.part(name)?;
      let ctx = plugin_context(part, context, &[], self.runner);
      part
        .plugin()
        .clean(&ctx)
        .map_err(|source| LifecycleError::PluginClean {
          part: name.clone(),
          source,
        })?;

      if let Some(part) = self.project.part_mut(name) {
        part.remove_working_dirs()?;
      }
      info!(part = %name, "Cleaned {name}");
    }

    if names.is_empty() {
      let context = self.project.context();
      for dir in [context.stage_dir(), context.prime_dir(), context.parts_dir()] {
        remove_dir(dir)?;
      }
    }

    Ok(selected)
  }

  fn part(&self, name: &str) -> Result<&Part, LifecycleError> {
    self
      .project
      .part(name)
      .ok_or_else(|| ConfigError::UnknownPart(name.to_string()).into())
  }
}

fn plugin_context<'a>(
  part: &'a Part,
  context: &'a ProjectContext,
  env: &'a [String],
  runner: &'a dyn CommandRunner,
) -> PluginContext<'a> {
  PluginContext {
    part_name: part.name(),
    project_dir: context.project_dir(),
    dirs: part.dirs(),
    stage_dir: context.stage_dir(),
    prime_dir: context.prime_dir(),
    env,
    runner,
  }
}

/// Copy into the prime tree what the part staged and its prime fileset selects.
fn prime(part: &Part, context: &ProjectContext) -> Result<(), LifecycleError> {
  let staged = migratable_filesets(part.stage_fileset(), &part.dirs().install)?;
  let primable = migratable_filesets(part.prime_fileset(), context.stage_dir())?;
  let plan = staged.restrict_to(&primable);

  migrate_files(&plan, context.stage_dir(), context.prime_dir())?;
  debug!(part = %part.name(), files = plan.files.len(), "primed files");
  Ok(())
}

fn remove_dir(dir: &Path) -> Result<(), LifecycleError> {
  match fs::remove_dir_all(dir) {
    Ok(()) => {
      debug!(path = %dir.display(), "removed directory");
      Ok(())
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(LifecycleError::Io {
      path: dir.to_path_buf(),
      source,
    }),
  }
}

/// Run `step` for the named parts while holding the project lock.
pub fn execute<S: AsRef<str>>(
  project: &mut Project,
  runner: &dyn CommandRunner,
  step: Step,
  names: &[S],
) -> Result<RunReport, LifecycleError> {
  let _lock = ProjectLock::acquire(project.context(), &format!("{APP_NAME} {step}"))?;
  Executor::new(project, runner).run(step, names)
}

/// Clean the named parts while holding the project lock.
pub fn clean<S: AsRef<str>>(
  project: &mut Project,
  runner: &dyn CommandRunner,
  names: &[S],
) -> Result<Vec<String>, LifecycleError> {
  let _lock = ProjectLock::acquire(project.context(), &format!("{APP_NAME} clean"))?;
  Executor::new(project, runner).clean(names)
}
