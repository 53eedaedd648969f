//! Plugin kinds and their factories.

use std::collections::BTreeMap;

use tracing::debug;

use super::command::CommandFactory;
use super::copy::CopyFactory;
use super::nil::NilFactory;
use super::{Plugin, PluginError, PluginOptions, PluginSchema};
use crate::error::ConfigError;
use crate::part::PartDescriptor;

/// Creates plugins of one kind.
pub trait PluginFactory {
  /// The configuration keys this kind accepts.
  fn schema(&self) -> PluginSchema;

  /// Build a plugin for one part from its properties.
  fn create(&self, options: &PluginOptions<'_>) -> Result<Box<dyn Plugin>, PluginError>;
}

/// Maps plugin kind strings to factories.
#[derive(Default)]
pub struct PluginRegistry {
  factories: BTreeMap<String, Box<dyn PluginFactory>>,
}

impl PluginRegistry {
  /// An empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry holding the built-in `nil`, `copy` and `command` kinds.
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    registry.register("nil", NilFactory);
    registry.register("copy", CopyFactory);
    registry.register("command", CommandFactory);
    registry
  }

  /// Register a factory, replacing any previous one of the same kind.
  pub fn register(&mut self, kind: impl Into<String>, factory: impl PluginFactory + 'static) {
    let kind = kind.into();
    debug!(kind = %kind, "registered plugin");
    self.factories.insert(kind, Box::new(factory));
  }

  /// Registered kinds, sorted.
  pub fn kinds(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }

  pub fn schema(&self, kind: &str) -> Result<PluginSchema, ConfigError> {
    self
      .factories
      .get(kind)
      .map(|factory| factory.schema())
      .ok_or_else(|| ConfigError::UnknownPlugin(kind.to_string()))
  }

  /// Create the plugin a part descriptor asks for.
  pub fn create(&self, descriptor: &PartDescriptor) -> Result<Box<dyn Plugin>, ConfigError> {
    let factory = self
      .factories
      .get(&descriptor.plugin)
      .ok_or_else(|| ConfigError::UnknownPlugin(descriptor.plugin.clone()))?;

    let options = PluginOptions {
      part_name: &descriptor.name,
      properties: &descriptor.properties,
    };
    factory.create(&options).map_err(|e| ConfigError::InvalidProperties {
      part: descriptor.name.clone(),
      plugin: descriptor.plugin.clone(),
      message: e.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtins_are_registered() {
    let registry = PluginRegistry::with_builtins();
    assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["command", "copy", "nil"]);
  }

  #[test]
  fn unknown_kind() {
    let registry = PluginRegistry::with_builtins();
    let err = registry.create(&PartDescriptor::new("p", "does-not-exist")).err().unwrap();
    assert_eq!(err.to_string(), "unknown plugin: does-not-exist");

    let err = registry.schema("does-not-exist").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownPlugin(kind) if kind == "does-not-exist"));
  }

  #[test]
  fn bad_properties_name_the_part() {
    let registry = PluginRegistry::with_builtins();
    let descriptor = PartDescriptor::new("copier", "copy").property("files", serde_json::json!(["not", "a", "map"]));

    let err = registry.create(&descriptor).err().unwrap();
    assert!(matches!(err, ConfigError::InvalidProperties { ref part, .. } if part == "copier"));
  }

  #[test]
  fn custom_factory() {
    struct Custom;
    impl PluginFactory for Custom {
      fn schema(&self) -> PluginSchema {
        PluginSchema {
          properties: serde_json::json!({"flavour": {"type": "string"}}),
          required: vec!["flavour".to_string()],
        }
      }
      fn create(&self, _options: &PluginOptions<'_>) -> Result<Box<dyn Plugin>, PluginError> {
        Ok(Box::new(crate::plugin::nil::NilPlugin))
      }
    }

    let mut registry = PluginRegistry::new();
    registry.register("custom", Custom);

    assert_eq!(registry.schema("custom").unwrap().required, vec!["flavour"]);
    assert!(registry.create(&PartDescriptor::new("p", "custom")).is_ok());
  }
}
