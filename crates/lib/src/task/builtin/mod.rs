//! Built-in task kinds.
//!
//! A small standard library of tasks, each configured from its declared
//! attributes via serde. Embedders register their own kinds alongside these
//! through [`TaskRegistry::register`](super::TaskRegistry::register).

mod echo;
mod exec;
mod fail;
mod property;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::project::Attributes;
use crate::task::{TaskFault, TaskRegistry};

pub use echo::EchoTask;
pub use exec::{CommandFailed, ExecTask};
pub use fail::FailTask;
pub use property::PropertyTask;

/// Register every built-in kind.
pub fn register_builtins(registry: &mut TaskRegistry) {
  registry.register("echo", || Box::new(EchoTask::default()));
  registry.register("exec", || Box::new(ExecTask::default()));
  registry.register("fail", || Box::new(FailTask::default()));
  registry.register("property", || Box::new(PropertyTask::default()));
}

/// Deserialize an attribute map into a task's typed attribute struct.
fn from_attributes<T: DeserializeOwned>(attributes: &Attributes) -> Result<T, TaskFault> {
  serde_json::from_value(Value::Object(attributes.clone())).map_err(Into::into)
}
