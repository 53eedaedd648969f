//! The `nil` plugin: a part with nothing to fetch or build.
//!
//! Useful for parts that only exist to order others via `after`.

use super::{Plugin, PluginContext, PluginError, PluginFactory, PluginOptions, PluginSchema};

#[derive(Debug, Clone, Copy, Default)]
pub struct NilPlugin;

impl Plugin for NilPlugin {
  fn pull(&self, _ctx: &PluginContext<'_>) -> Result<(), PluginError> {
    Ok(())
  }

  fn build(&self, _ctx: &PluginContext<'_>) -> Result<(), PluginError> {
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NilFactory;

impl PluginFactory for NilFactory {
  fn schema(&self) -> PluginSchema {
    PluginSchema::empty()
  }

  fn create(&self, _options: &PluginOptions<'_>) -> Result<Box<dyn Plugin>, PluginError> {
    Ok(Box::new(NilPlugin))
  }
}
