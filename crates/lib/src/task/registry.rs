//! Task kind registry.
//!
//! Maps kind names to factories producing blank task instances. The registry
//! is passed into the executor explicitly; there are no global factories.

use std::collections::BTreeMap;

use thiserror::Error;

use super::Task;

/// Create-phase failure: nobody registered the requested kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no task kind \"{0}\" is registered")]
pub struct UnknownKind(pub String);

type Factory = Box<dyn Fn() -> Box<dyn Task> + Send + Sync>;

/// Registry of task kinds available to a build.
#[derive(Default)]
pub struct TaskRegistry {
  factories: BTreeMap<String, Factory>,
}

impl TaskRegistry {
  /// An empty registry; useful for embedders with a fully custom task set.
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry with the built-in task kinds registered.
  pub fn builtin() -> Self {
    let mut registry = Self::new();
    super::builtin::register_builtins(&mut registry);
    registry
  }

  /// Register a kind. The last registration for a name wins.
  pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
  where
    F: Fn() -> Box<dyn Task> + Send + Sync + 'static,
  {
    self.factories.insert(kind.into(), Box::new(factory));
  }

  /// Create a blank instance of `kind`.
  pub fn create(&self, kind: &str) -> Result<Box<dyn Task>, UnknownKind> {
    self
      .factories
      .get(kind)
      .map(|factory| factory())
      .ok_or_else(|| UnknownKind(kind.to_string()))
  }

  /// Registered kind names, sorted.
  pub fn kinds(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }
}
