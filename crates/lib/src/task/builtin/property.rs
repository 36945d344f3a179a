//! The `property` task: define a context property.

use serde::Deserialize;
use tracing::debug;

use crate::context::ExecutionContext;
use crate::project::Attributes;
use crate::task::{Task, TaskFault};

use super::from_attributes;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PropertyAttrs {
  name: String,
  value: String,
}

/// Sets a property in the execution context.
///
/// Properties are first-set-wins, so redefining an existing key is a quiet
/// no-op rather than an override.
#[derive(Debug, Default)]
pub struct PropertyTask {
  name: String,
  value: String,
}

impl Task for PropertyTask {
  fn name(&self) -> &str {
    "property"
  }

  fn configure(&mut self, attributes: &Attributes, _context: &ExecutionContext) -> Result<(), TaskFault> {
    let attrs: PropertyAttrs = from_attributes(attributes)?;
    self.name = attrs.name;
    self.value = attrs.value;
    Ok(())
  }

  fn run(&mut self, context: &mut ExecutionContext) -> Result<(), TaskFault> {
    let value = context.expand(&self.value);
    if !context.set_property(&self.name, value) {
      debug!(name = %self.name, "property override ignored");
    }
    Ok(())
  }
}
