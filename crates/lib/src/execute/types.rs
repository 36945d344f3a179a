//! Types for resolution and execution.
//!
//! This module defines the error taxonomy, the per-run result, and the
//! options that shape a driver run.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::task::TaskFault;

/// Lifecycle phase of a task invocation. Identifies where a failure struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Create,
  Contextualize,
  Configure,
  Execute,
  Destroy,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Phase::Create => "create",
      Phase::Contextualize => "contextualize",
      Phase::Configure => "configure",
      Phase::Execute => "execute",
      Phase::Destroy => "destroy",
    };
    f.write_str(name)
  }
}

/// Errors that abort resolution, before any task runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
  /// A requested or depended-on name no target carries.
  #[error(
    "target \"{name}\" does not exist in the project{}",
    .referrer.as_ref().map(|r| format!(", used from \"{r}\"")).unwrap_or_default()
  )]
  UnknownTarget {
    name: String,
    /// The target whose `depends` named it; `None` for a requested root.
    referrer: Option<String>,
  },

  /// A dependency chain closed back on itself.
  ///
  /// `cycle` runs from the repeated target through the chain back to
  /// itself, e.g. `[a, b, a]`.
  #[error("circular dependency: {}", .cycle.join(" <- "))]
  CircularDependency { cycle: Vec<String> },
}

/// Errors caught at the executor boundary, wrapped with task identity.
#[derive(Debug, Error)]
pub enum TaskError {
  /// The task never reached its run phase.
  #[error("task \"{task}\" failed during {phase}: {source}")]
  Lifecycle {
    phase: Phase,
    task: String,
    #[source]
    source: TaskFault,
  },

  /// The task body raised.
  #[error("task \"{task}\" in target \"{target}\" failed: {source}")]
  Execution {
    task: String,
    target: String,
    #[source]
    source: TaskFault,
  },
}

/// Anything a build run can fail with.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Task(#[from] TaskError),
}

/// Outcome of a full driver run.
#[derive(Debug, Default)]
pub struct BuildResult {
  /// Every failure recorded, in the order it happened. Empty means success.
  pub failures: Vec<BuildError>,

  /// Targets whose tasks were executed.
  pub targets_run: usize,

  /// Targets skipped because their `if`/`unless` condition did not hold.
  pub targets_skipped: usize,

  /// Tasks that completed (including failures absorbed by an aspect).
  pub tasks_run: usize,

  /// Wall-clock time of the run.
  pub elapsed: Duration,
}

impl BuildResult {
  pub fn is_success(&self) -> bool {
    self.failures.is_empty()
  }
}

/// Options for a driver run.
#[derive(Debug, Clone)]
pub struct RunOptions {
  /// Stop at the first task failure instead of continuing with later
  /// targets. Remaining tasks of a failed target are skipped either way.
  pub fail_fast: bool,
}

impl Default for RunOptions {
  fn default() -> Self {
    Self { fail_fast: true }
  }
}
