//! Implementation of the `gantry plan` command.
//!
//! Resolves the requested targets into execution order and prints it
//! without running anything. Resolution errors (unknown targets, cycles)
//! surface here the same way `run` would hit them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use gantry_lib::execute::order::resolve;
use gantry_lib::project::load_project;

use crate::output::{self, OutputFormat};

#[derive(Serialize)]
struct PlanEntry<'a> {
  position: usize,
  target: &'a str,
  tasks: usize,
}

pub fn cmd_plan(file: &Path, targets: &[String], format: OutputFormat) -> Result<bool> {
  let project = load_project(file).with_context(|| format!("Failed to load project: {}", file.display()))?;

  let requested: Vec<String> = if targets.is_empty() {
    project.default_target().map(str::to_string).into_iter().collect()
  } else {
    targets.to_vec()
  };

  let order = match resolve(&project, &requested) {
    Ok(order) => order,
    Err(error) => {
      output::print_error(&error.to_string());
      return Ok(false);
    }
  };

  if format.is_json() {
    let entries: Vec<PlanEntry<'_>> = order
      .iter()
      .enumerate()
      .map(|(i, target)| PlanEntry {
        position: i + 1,
        target: target.name(),
        tasks: target.tasks().len(),
      })
      .collect();
    output::print_json(&entries)?;
    return Ok(true);
  }

  if order.is_empty() {
    output::print_info("Nothing to do");
    return Ok(true);
  }

  output::print_info(&format!("Execution order for {}:", requested.join(", ")));
  for (i, target) in order.iter().enumerate() {
    println!("  {}. {} ({} task(s))", i + 1, target.name(), target.tasks().len());
  }

  Ok(true)
}
