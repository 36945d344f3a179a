//! The task capability and its collaborators.
//!
//! A task is one unit of build work. The engine never interprets what a task
//! does; it only drives the lifecycle (create, contextualize, configure,
//! run) and wraps whatever fault the task raises.

pub mod builtin;
mod registry;

use std::error::Error;

use crate::context::ExecutionContext;
use crate::project::Attributes;

pub use registry::{TaskRegistry, UnknownKind};

/// Whatever a task or collaborator raises. Opaque to the engine.
pub type TaskFault = Box<dyn Error + Send + Sync>;

/// A unit of build work.
///
/// Instances are created blank by the [`TaskRegistry`], bound to the run's
/// context, configured from their declared attributes, and finally run.
pub trait Task: Send {
  /// The task's kind name, for diagnostics and events.
  fn name(&self) -> &str;

  /// Bind the run's context to this instance. A task that cannot work with
  /// the context rejects it here, before configuration.
  fn contextualize(&mut self, _context: &ExecutionContext) -> Result<(), TaskFault> {
    Ok(())
  }

  /// Apply declared attributes. The default accepts only an empty attribute
  /// map; tasks that take attributes override this.
  fn configure(&mut self, attributes: &Attributes, _context: &ExecutionContext) -> Result<(), TaskFault> {
    if attributes.is_empty() {
      Ok(())
    } else {
      Err(format!("task \"{}\" takes no attributes", self.name()).into())
    }
  }

  /// Do the work.
  fn run(&mut self, context: &mut ExecutionContext) -> Result<(), TaskFault>;
}

/// Applies a task's declared attributes during the configure phase.
///
/// Kept as a seam so embedders can swap in their own binding strategy; the
/// engine treats it as a black box that may fail.
pub trait Configurer: Send {
  fn configure(
    &self,
    task: &mut dyn Task,
    attributes: &Attributes,
    context: &ExecutionContext,
  ) -> Result<(), TaskFault>;
}

/// The standard configurer: hand the task its own attributes and let it
/// deserialize them.
#[derive(Debug, Default)]
pub struct DefaultConfigurer;

impl Configurer for DefaultConfigurer {
  fn configure(
    &self,
    task: &mut dyn Task,
    attributes: &Attributes,
    context: &ExecutionContext,
  ) -> Result<(), TaskFault> {
    task.configure(attributes, context)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Noop;

  impl Task for Noop {
    fn name(&self) -> &str {
      "noop"
    }

    fn run(&mut self, _context: &mut ExecutionContext) -> Result<(), TaskFault> {
      Ok(())
    }
  }

  #[test]
  fn default_configure_accepts_empty_attributes() {
    let ctx = ExecutionContext::new("/base");
    let mut task = Noop;
    assert!(task.configure(&Attributes::new(), &ctx).is_ok());
  }

  #[test]
  fn default_configure_rejects_attributes() {
    let ctx = ExecutionContext::new("/base");
    let mut task = Noop;

    let mut attributes = Attributes::new();
    attributes.insert("surprise".to_string(), serde_json::Value::Bool(true));

    let err = task.configure(&attributes, &ctx).unwrap_err();
    assert!(err.to_string().contains("takes no attributes"));
  }

  #[test]
  fn default_configurer_delegates_to_task() {
    let ctx = ExecutionContext::new("/base");
    let mut task = Noop;

    let configurer = DefaultConfigurer;
    assert!(configurer.configure(&mut task, &Attributes::new(), &ctx).is_ok());
  }
}
