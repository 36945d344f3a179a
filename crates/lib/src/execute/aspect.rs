//! Cross-cutting hooks around the task lifecycle.
//!
//! Aspects let a concern observe or veto lifecycle phases, and intercept a
//! task failure without the task knowing. The hook points are a closed set
//! of callback slots; there is no string-keyed dispatch.

use crate::project::TaskSpec;
use crate::task::{Task, TaskFault};

use super::types::TaskError;

/// What an aspect's error hook decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
  /// The aspect claims the failure; the executor reports success.
  Handled,
  /// Pass the failure on unchanged.
  Propagate,
}

/// A cross-cutting lifecycle hook.
///
/// Every hook defaults to a no-op. A hook that returns an error fails the
/// phase it wraps, exactly like the task itself failing there.
pub trait Aspect: Send {
  /// Before the registry creates the task instance.
  fn pre_create(&self, _spec: &TaskSpec) -> Result<(), TaskFault> {
    Ok(())
  }

  /// After creation, before contextualization.
  fn post_create(&self, _spec: &TaskSpec, _task: &dyn Task) -> Result<(), TaskFault> {
    Ok(())
  }

  /// Before the configurer applies attributes.
  fn pre_configure(&self, _spec: &TaskSpec, _task: &dyn Task) -> Result<(), TaskFault> {
    Ok(())
  }

  /// Before the task body runs.
  fn pre_execute(&self, _spec: &TaskSpec, _task: &dyn Task) -> Result<(), TaskFault> {
    Ok(())
  }

  /// After the task body, before the instance is dropped. Runs whether or
  /// not the body succeeded.
  fn pre_destroy(&self, _spec: &TaskSpec, _task: &dyn Task) -> Result<(), TaskFault> {
    Ok(())
  }

  /// First refusal on an execution failure.
  ///
  /// Called once per registered aspect when the task body raises; the first
  /// `Handled` absorbs the failure. Lifecycle failures are never offered.
  fn error(&self, _error: &TaskError) -> ErrorDisposition {
    ErrorDisposition::Propagate
  }
}
