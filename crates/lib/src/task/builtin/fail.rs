//! The `fail` task: abort the build on purpose.

use serde::Deserialize;
use thiserror::Error;

use crate::context::ExecutionContext;
use crate::project::Attributes;
use crate::task::{Task, TaskFault};

use super::from_attributes;

/// The fault a `fail` task raises.
#[derive(Debug, Error)]
#[error("{}", .message.as_deref().unwrap_or("explicit failure, no message given"))]
pub struct ExplicitFailure {
  pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FailAttrs {
  message: Option<String>,
}

/// Always fails, with an optional (property-expanded) message.
///
/// The declarative way to stop a build when a guard target detects a bad
/// state.
#[derive(Debug, Default)]
pub struct FailTask {
  message: Option<String>,
}

impl Task for FailTask {
  fn name(&self) -> &str {
    "fail"
  }

  fn configure(&mut self, attributes: &Attributes, _context: &ExecutionContext) -> Result<(), TaskFault> {
    let attrs: FailAttrs = from_attributes(attributes)?;
    self.message = attrs.message;
    Ok(())
  }

  fn run(&mut self, context: &mut ExecutionContext) -> Result<(), TaskFault> {
    let message = self.message.as_ref().map(|m| context.expand(m));
    Err(Box::new(ExplicitFailure { message }))
  }
}
