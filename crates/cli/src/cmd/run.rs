//! Implementation of the `gantry run` command.
//!
//! Loads the project file, seeds the context with `-D` defines, and drives
//! the requested targets (or the project default). With `--timeout` the
//! build runs on a worker thread and is abandoned at the deadline.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use gantry_lib::context::ExecutionContext;
use gantry_lib::execute::driver::BuildDriver;
use gantry_lib::execute::types::{BuildError, BuildResult, RunOptions};
use gantry_lib::execute::worker::run_with_deadline;
use gantry_lib::project::load_project;

use crate::listener::ConsoleListener;
use crate::output;

pub fn cmd_run(
  file: &Path,
  targets: &[String],
  defines: &[String],
  keep_going: bool,
  timeout: Option<Duration>,
  verbose: bool,
) -> Result<bool> {
  let project = load_project(file).with_context(|| format!("Failed to load project: {}", file.display()))?;
  tracing::debug!(targets = project.target_count(), "project loaded");

  // Defines first so they win over everything set later in the run.
  let mut context = ExecutionContext::new(project.base_dir());
  for define in defines {
    let Some((key, value)) = define.split_once('=') else {
      bail!("invalid define \"{define}\", expected KEY=VALUE");
    };
    context.set_property(key, value);
  }
  context.seed_env("env");

  let mut driver = BuildDriver::with_defaults();
  driver.add_listener(Box::new(ConsoleListener::new(verbose)));

  let options = RunOptions {
    fail_fast: !keep_going,
  };

  let targets = targets.to_vec();
  let result = match timeout {
    Some(deadline) => run_with_deadline(deadline, move || {
      driver.run(&project, &targets, &mut context, &options)
    })
    .with_context(|| format!("Build abandoned after {}", output::format_duration(deadline)))?,
    None => driver.run(&project, &targets, &mut context, &options),
  };

  report(&result);
  Ok(result.is_success())
}

fn report(result: &BuildResult) {
  // Task failures were already shown by the listener as they happened;
  // resolution failures produce no task events, so they are printed here.
  for failure in &result.failures {
    if let BuildError::Resolve(error) = failure {
      output::print_error(&error.to_string());
    }
  }

  println!();
  if result.is_success() {
    output::print_success(&format!(
      "BUILD SUCCESSFUL in {} ({} target(s), {} task(s))",
      output::format_duration(result.elapsed),
      result.targets_run,
      result.tasks_run
    ));
  } else {
    output::print_error(&format!(
      "BUILD FAILED in {} ({} failure(s))",
      output::format_duration(result.elapsed),
      result.failures.len()
    ));
  }
}
