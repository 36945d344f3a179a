//! The `echo` task: print a message.

use serde::Deserialize;
use tracing::debug;

use crate::context::ExecutionContext;
use crate::project::Attributes;
use crate::task::{Task, TaskFault};

use super::from_attributes;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EchoAttrs {
  message: String,
}

/// Prints its (property-expanded) message to standard output.
#[derive(Debug, Default)]
pub struct EchoTask {
  message: String,
}

impl Task for EchoTask {
  fn name(&self) -> &str {
    "echo"
  }

  fn configure(&mut self, attributes: &Attributes, _context: &ExecutionContext) -> Result<(), TaskFault> {
    let attrs: EchoAttrs = from_attributes(attributes)?;
    self.message = attrs.message;
    Ok(())
  }

  fn run(&mut self, context: &mut ExecutionContext) -> Result<(), TaskFault> {
    let message = context.expand(&self.message);
    debug!(message = %message, "echo");
    println!("{message}");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::project::TaskSpec;

  #[test]
  fn configure_requires_message() {
    let ctx = ExecutionContext::new("/base");
    let mut task = EchoTask::default();

    let err = task.configure(&Attributes::new(), &ctx).unwrap_err();
    assert!(err.to_string().contains("message"));
  }

  #[test]
  fn configure_rejects_unknown_attributes() {
    let ctx = ExecutionContext::new("/base");
    let mut task = EchoTask::default();

    let spec = TaskSpec::new("echo")
      .with_attribute("message", "hi")
      .with_attribute("volume", 11);

    assert!(task.configure(&spec.attributes, &ctx).is_err());
  }

  #[test]
  fn runs_with_expanded_message() {
    let mut ctx = ExecutionContext::new("/base");
    ctx.set_property("who", "world");

    let mut task = EchoTask::default();
    let spec = TaskSpec::new("echo").with_attribute("message", "hello ${who}");
    task.configure(&spec.attributes, &ctx).unwrap();

    assert!(task.run(&mut ctx).is_ok());
  }
}
