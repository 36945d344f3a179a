//! Implementation of the `gantry list` command.
//!
//! Prints every target with its description and dependencies, marking the
//! project default.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use gantry_lib::project::load_project;

use crate::output::{self, OutputFormat};

#[derive(Serialize)]
struct TargetInfo<'a> {
  name: &'a str,
  description: Option<&'a str>,
  depends: &'a [String],
  default: bool,
}

pub fn cmd_list(file: &Path, format: OutputFormat) -> Result<()> {
  let project = load_project(file).with_context(|| format!("Failed to load project: {}", file.display()))?;

  let infos: Vec<TargetInfo<'_>> = project
    .targets()
    .map(|target| TargetInfo {
      name: target.name(),
      description: target.description(),
      depends: target.depends(),
      default: project.default_target() == Some(target.name()),
    })
    .collect();

  if format.is_json() {
    return output::print_json(&infos);
  }

  match project.name() {
    Some(name) => output::print_info(&format!("Targets in {}:", name)),
    None => output::print_info("Targets:"),
  }

  for info in &infos {
    let marker = if info.default { "*" } else { " " };
    let mut line = format!("{} {}", marker, info.name);
    if let Some(description) = info.description {
      line.push_str(&format!("  - {description}"));
    }
    if !info.depends.is_empty() {
      line.push_str(&format!(
        " {} {}",
        output::symbols::ARROW,
        info.depends.join(", ")
      ));
    }
    println!(
      "  {}",
      line.if_supports_color(Stream::Stdout, |s| s.white())
    );
  }

  if project.default_target().is_some() {
    println!();
    println!("  * = default target");
  }

  Ok(())
}
