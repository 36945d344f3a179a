//! The target graph: a project owns the set of targets a build can request.

pub mod load;
mod target;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use load::{LoadError, load_project};
pub use target::{Attributes, Target, TaskSpec};

/// Errors raised while assembling a project.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectError {
  /// A second target tried to claim an existing name.
  #[error("target \"{0}\" is already defined")]
  DuplicateTarget(String),
}

/// The in-memory target graph for one build file.
///
/// Owns every [`Target`]; targets refer to each other by name only and are
/// looked up through the project. The target map is read-only during a run:
/// no task may add or remove targets mid-build.
#[derive(Debug, Clone)]
pub struct Project {
  name: Option<String>,
  targets: BTreeMap<String, Target>,
  default_target: Option<String>,
  base_dir: PathBuf,
}

impl Project {
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      name: None,
      targets: BTreeMap::new(),
      default_target: None,
      base_dir: base_dir.into(),
    }
  }

  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn with_default(mut self, target: impl Into<String>) -> Self {
    self.default_target = Some(target.into());
    self
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }

  /// The target run when the caller requests none.
  pub fn default_target(&self) -> Option<&str> {
    self.default_target.as_deref()
  }

  pub fn add_target(&mut self, target: Target) -> Result<(), ProjectError> {
    if self.targets.contains_key(target.name()) {
      return Err(ProjectError::DuplicateTarget(target.name().to_string()));
    }
    self.targets.insert(target.name().to_string(), target);
    Ok(())
  }

  pub fn target(&self, name: &str) -> Option<&Target> {
    self.targets.get(name)
  }

  /// Iterate over all targets in name order, so diagnostics are stable.
  pub fn targets(&self) -> impl Iterator<Item = &Target> {
    self.targets.values()
  }

  pub fn target_count(&self) -> usize {
    self.targets.len()
  }
}
