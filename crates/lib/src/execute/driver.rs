//! Top-level build orchestration.
//!
//! The driver resolves the requested targets into execution order, runs each
//! target's tasks through the executor, and aggregates failures according to
//! the fail-fast policy. Everything happens on the caller's thread; events
//! reach listeners synchronously at every transition.

use std::error::Error;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::context::ExecutionContext;
use crate::event::{BuildListener, EventDispatcher, MessagePriority};
use crate::project::Project;
use crate::task::{DefaultConfigurer, TaskRegistry};

use super::executor::{DefaultExecutor, Executor};
use super::order::resolve;
use super::types::{BuildError, BuildResult, RunOptions};

/// Runs builds against a project.
///
/// Collaborators (executor, and through it the registry and configurer) are
/// injected at construction; listeners are registered before [`run`] and
/// never change mid-run.
///
/// [`run`]: BuildDriver::run
pub struct BuildDriver {
  executor: Box<dyn Executor>,
  events: EventDispatcher,
}

impl BuildDriver {
  pub fn new(executor: Box<dyn Executor>) -> Self {
    Self {
      executor,
      events: EventDispatcher::new(),
    }
  }

  /// A driver with the standard setup: default executor, built-in task
  /// kinds, default configurer.
  pub fn with_defaults() -> Self {
    Self::new(Box::new(DefaultExecutor::new(
      TaskRegistry::builtin(),
      Box::new(DefaultConfigurer),
    )))
  }

  /// Register a listener. Must happen before [`BuildDriver::run`].
  pub fn add_listener(&mut self, listener: Box<dyn BuildListener>) {
    self.events.add_listener(listener);
  }

  /// Execute `requested` (or the project's default target when empty).
  ///
  /// Resolution errors are fatal: no task runs. Task failures follow
  /// `options.fail_fast`: abort everything remaining, or keep going with
  /// later targets and accumulate.
  pub fn run<S: AsRef<str>>(
    &mut self,
    project: &Project,
    requested: &[S],
    context: &mut ExecutionContext,
    options: &RunOptions,
  ) -> BuildResult {
    let started = Instant::now();
    let mut result = BuildResult::default();

    self.events.build_started();

    let requested: Vec<&str> = if requested.is_empty() {
      project.default_target().into_iter().collect()
    } else {
      requested.iter().map(S::as_ref).collect()
    };

    info!(targets = ?requested, "starting build");

    let order = match resolve(project, &requested) {
      Ok(order) => order,
      Err(resolve_error) => {
        error!(error = %resolve_error, "resolution failed");
        result.failures.push(BuildError::Resolve(resolve_error));
        return self.finish(result, started);
      }
    };

    if !order.is_empty() {
      let sequence = order.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ");
      self
        .events
        .message(&format!("build sequence: {sequence}"), MessagePriority::Verbose);
    }

    for target in order {
      if !target.should_run(context) {
        debug!(target = %target.name(), "condition not met, skipping");
        self.events.message(
          &format!("skipping target \"{}\": condition not met", target.name()),
          MessagePriority::Verbose,
        );
        result.targets_skipped += 1;
        continue;
      }

      self.events.target_started(target.name());

      let mut target_failed = false;
      for spec in target.tasks() {
        match self.executor.execute(spec, target.name(), context, &mut self.events) {
          Ok(()) => result.tasks_run += 1,
          Err(task_error) => {
            error!(target = %target.name(), error = %task_error, "task failed");
            result.failures.push(BuildError::Task(task_error));
            target_failed = true;
            // Remaining tasks of this target never run.
            break;
          }
        }
      }

      let cause = if target_failed {
        result.failures.last().map(|e| e as &dyn Error)
      } else {
        None
      };
      self.events.target_finished(target.name(), cause);
      result.targets_run += 1;

      if target_failed && options.fail_fast {
        debug!("fail-fast: aborting remaining targets");
        break;
      }
    }

    self.finish(result, started)
  }

  fn finish(&mut self, mut result: BuildResult, started: Instant) -> BuildResult {
    result.elapsed = started.elapsed();
    self
      .events
      .build_finished(result.failures.first().map(|e| e as &dyn Error));

    if result.is_success() {
      info!(
        targets = result.targets_run,
        tasks = result.tasks_run,
        elapsed = ?result.elapsed,
        "build finished"
      );
    } else {
      error!(failures = result.failures.len(), elapsed = ?result.elapsed, "build failed");
    }

    result
  }
}
