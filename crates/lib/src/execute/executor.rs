//! Task lifecycle execution.
//!
//! An executor drives one declared task through the lifecycle state machine
//!
//! ```text
//! Created -> Contextualized -> Configured -> Executing -> Done
//!                \________________\_____________\______-> Failed
//! ```
//!
//! wrapping every failure with the task's identity and emitting task events
//! to the listeners before returning to the driver.

use tracing::{trace, warn};

use crate::context::ExecutionContext;
use crate::event::EventDispatcher;
use crate::project::TaskSpec;
use crate::task::{Configurer, TaskFault, TaskRegistry};

use super::aspect::{Aspect, ErrorDisposition};
use super::types::{Phase, TaskError};

/// States of one task invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
  Created,
  Contextualized,
  Configured,
  Executing,
  Done,
  Failed,
}

/// Drives one task through its lifecycle.
pub trait Executor: Send {
  /// Execute `spec` inside `target`.
  ///
  /// Emits `TaskStarted`/`TaskFinished` events; a returned error has already
  /// been reported to listeners.
  fn execute(
    &self,
    spec: &TaskSpec,
    target: &str,
    context: &mut ExecutionContext,
    events: &mut EventDispatcher,
  ) -> Result<(), TaskError>;
}

/// The plain lifecycle, no hooks.
pub struct DefaultExecutor {
  registry: TaskRegistry,
  configurer: Box<dyn Configurer>,
}

impl DefaultExecutor {
  pub fn new(registry: TaskRegistry, configurer: Box<dyn Configurer>) -> Self {
    Self { registry, configurer }
  }
}

impl Executor for DefaultExecutor {
  fn execute(
    &self,
    spec: &TaskSpec,
    target: &str,
    context: &mut ExecutionContext,
    events: &mut EventDispatcher,
  ) -> Result<(), TaskError> {
    drive(&self.registry, self.configurer.as_ref(), &[], spec, target, context, events)
  }
}

/// The lifecycle with aspect hooks around every phase.
///
/// Aspects run in registration order at each hook point, and their error
/// hooks get first refusal on execution failures.
pub struct AspectExecutor {
  registry: TaskRegistry,
  configurer: Box<dyn Configurer>,
  aspects: Vec<Box<dyn Aspect>>,
}

impl AspectExecutor {
  pub fn new(registry: TaskRegistry, configurer: Box<dyn Configurer>, aspects: Vec<Box<dyn Aspect>>) -> Self {
    Self {
      registry,
      configurer,
      aspects,
    }
  }
}

impl Executor for AspectExecutor {
  fn execute(
    &self,
    spec: &TaskSpec,
    target: &str,
    context: &mut ExecutionContext,
    events: &mut EventDispatcher,
  ) -> Result<(), TaskError> {
    drive(
      &self.registry,
      self.configurer.as_ref(),
      &self.aspects,
      spec,
      target,
      context,
      events,
    )
  }
}

fn lifecycle(phase: Phase, spec: &TaskSpec, source: TaskFault) -> TaskError {
  TaskError::Lifecycle {
    phase,
    task: spec.kind.clone(),
    source,
  }
}

fn advance(state: &mut TaskState, to: TaskState, task: &str) {
  trace!(task = %task, from = ?state, to = ?to, "lifecycle");
  *state = to;
}

fn drive(
  registry: &TaskRegistry,
  configurer: &dyn Configurer,
  aspects: &[Box<dyn Aspect>],
  spec: &TaskSpec,
  target: &str,
  context: &mut ExecutionContext,
  events: &mut EventDispatcher,
) -> Result<(), TaskError> {
  match run_phases(registry, configurer, aspects, spec, target, context, events) {
    Ok(()) => {
      events.task_finished(target, &spec.kind, None);
      Ok(())
    }
    Err(error) => {
      // Only execution failures are offered to the error hooks; lifecycle
      // failures always propagate.
      let absorbed = matches!(error, TaskError::Execution { .. })
        && aspects.iter().any(|a| a.error(&error) == ErrorDisposition::Handled);

      events.task_finished(target, &spec.kind, Some(&error as &dyn std::error::Error));

      if absorbed {
        warn!(task = %spec.kind, target = %target, error = %error, "task failure absorbed by aspect");
        Ok(())
      } else {
        Err(error)
      }
    }
  }
}

fn run_phases(
  registry: &TaskRegistry,
  configurer: &dyn Configurer,
  aspects: &[Box<dyn Aspect>],
  spec: &TaskSpec,
  target: &str,
  context: &mut ExecutionContext,
  events: &mut EventDispatcher,
) -> Result<(), TaskError> {
  let mut state = TaskState::Created;

  for aspect in aspects {
    aspect
      .pre_create(spec)
      .map_err(|fault| lifecycle(Phase::Create, spec, fault))?;
  }

  let mut task = registry
    .create(&spec.kind)
    .map_err(|err| lifecycle(Phase::Create, spec, Box::new(err)))?;

  for aspect in aspects {
    aspect
      .post_create(spec, task.as_ref())
      .map_err(|fault| lifecycle(Phase::Create, spec, fault))?;
  }

  task
    .contextualize(context)
    .map_err(|fault| lifecycle(Phase::Contextualize, spec, fault))?;
  advance(&mut state, TaskState::Contextualized, &spec.kind);

  for aspect in aspects {
    aspect
      .pre_configure(spec, task.as_ref())
      .map_err(|fault| lifecycle(Phase::Configure, spec, fault))?;
  }

  configurer
    .configure(task.as_mut(), &spec.attributes, context)
    .map_err(|fault| lifecycle(Phase::Configure, spec, fault))?;
  advance(&mut state, TaskState::Configured, &spec.kind);

  for aspect in aspects {
    aspect
      .pre_execute(spec, task.as_ref())
      .map_err(|fault| lifecycle(Phase::Execute, spec, fault))?;
  }

  events.task_started(target, &spec.kind);
  advance(&mut state, TaskState::Executing, &spec.kind);

  let outcome = task.run(context);
  match outcome {
    Ok(()) => advance(&mut state, TaskState::Done, &spec.kind),
    Err(_) => advance(&mut state, TaskState::Failed, &spec.kind),
  }

  // Destroy hooks run on both paths; their failures only surface when the
  // body itself succeeded.
  for aspect in aspects {
    if let Err(fault) = aspect.pre_destroy(spec, task.as_ref()) {
      if outcome.is_ok() {
        return Err(lifecycle(Phase::Destroy, spec, fault));
      }
      warn!(task = %spec.kind, "destroy hook failed after task failure: {fault}");
    }
  }

  outcome.map_err(|fault| TaskError::Execution {
    task: spec.kind.clone(),
    target: target.to_string(),
    source: fault,
  })
}
