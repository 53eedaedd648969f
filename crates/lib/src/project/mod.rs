//! A loaded project: its context, its parts and their prerequisite graph.

pub mod config;
pub mod context;
pub mod lock;

use std::collections::{HashMap, HashSet};

use tracing::debug;

pub use config::ProjectConfig;
pub use context::ProjectContext;
pub use lock::{LockError, ProjectLock};

use crate::env::{build_env, runtime_env};
use crate::error::{ConfigError, LifecycleError};
use crate::lifecycle::graph::PartGraph;
use crate::part::{Part, PartDescriptor};
use crate::plugin::PluginRegistry;

/// Every part of a project, validated and ready to run.
#[derive(Debug)]
pub struct Project {
  context: ProjectContext,
  name: Option<String>,
  parts: Vec<Part>,
  index: HashMap<String, usize>,
  graph: PartGraph,
}

impl Project {
  /// Validate the descriptors and create their parts.
  ///
  /// Plugins, filesets and the prerequisite graph are all checked before
  /// anything is written to disk.
  pub fn new(
    context: ProjectContext,
    descriptors: Vec<PartDescriptor>,
    registry: &PluginRegistry,
  ) -> Result<Self, LifecycleError> {
    let mut seen = HashSet::new();
    for descriptor in &descriptors {
      if !seen.insert(descriptor.name.as_str()) {
        return Err(ConfigError::DuplicatePart(descriptor.name.clone()).into());
      }
    }

    let graph = PartGraph::new(&descriptors)?;

    let mut parts = Vec::with_capacity(descriptors.len());
    let mut index = HashMap::with_capacity(descriptors.len());
    for descriptor in descriptors {
      let plugin = registry.create(&descriptor)?;
      index.insert(descriptor.name.clone(), parts.len());
      parts.push(Part::new(descriptor, plugin, &context)?);
    }

    debug!(project = %context.project_dir().display(), parts = parts.len(), "loaded project");

    Ok(Self {
      context,
      name: None,
      parts,
      index,
      graph,
    })
  }

  /// Load `parts.yaml` from the project directory.
  pub fn load(context: ProjectContext, registry: &PluginRegistry) -> Result<Self, LifecycleError> {
    let config = ProjectConfig::load(&context.project_file())?;
    let mut project = Self::new(context, config.parts, registry)?;
    project.name = config.name;
    Ok(project)
  }

  pub fn context(&self) -> &ProjectContext {
    &self.context
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn graph(&self) -> &PartGraph {
    &self.graph
  }

  /// Parts in declaration order.
  pub fn parts(&self) -> &[Part] {
    &self.parts
  }

  pub fn part(&self, name: &str) -> Option<&Part> {
    self.index.get(name).map(|&i| &self.parts[i])
  }

  pub(crate) fn part_mut(&mut self, name: &str) -> Option<&mut Part> {
    self.index.get(name).map(|&i| &mut self.parts[i])
  }

  /// Resolve requested part names into graph order.
  ///
  /// No names means every part.
  pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>, ConfigError> {
    if names.is_empty() {
      return Ok(self.graph.order().into_iter().map(str::to_string).collect());
    }

    let mut requested = Vec::with_capacity(names.len());
    for name in names {
      let name = name.as_ref();
      if !self.graph.contains(name) {
        return Err(ConfigError::UnknownPart(name.to_string()));
      }
      requested.push(name);
    }
    Ok(self.graph.sorted(&requested).into_iter().map(str::to_string).collect())
  }

  /// Environment a part's plugin runs with.
  ///
  /// Runtime and build variables rooted at the stage tree, then what each
  /// prerequisite's plugin needs there, then the part's own install tree.
  pub fn build_environment(&self, name: &str) -> Vec<String> {
    let stage = self.context.stage_dir();
    let mut env = runtime_env(stage);
    env.extend(build_env(stage));

    for prerequisite in self.graph.prerequisites(name) {
      if let Some(part) = self.part(prerequisite) {
        env.extend(part.plugin().env(stage));
      }
    }
    if let Some(part) = self.part(name) {
      env.extend(part.plugin().env(&part.dirs().install));
    }
    env
  }

  /// Environment for running the primed artifact: the runtime variables
  /// rooted at the prime tree plus what each plugin asks for.
  pub fn runtime_environment(&self) -> Vec<String> {
    let root = self.context.prime_dir();
    let mut env = runtime_env(root);
    for name in self.graph.order() {
      if let Some(part) = self.part(name) {
        env.extend(part.plugin().env(root));
      }
    }
    env
  }
}
