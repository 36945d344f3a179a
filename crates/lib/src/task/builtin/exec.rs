//! The `exec` task: run a shell command.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::context::ExecutionContext;
use crate::project::Attributes;
use crate::task::{Task, TaskFault};

use super::from_attributes;

/// The command ran and exited non-zero (or died to a signal).
#[derive(Debug, Error)]
#[error("command failed with exit code {code:?}: {command}")]
pub struct CommandFailed {
  pub command: String,
  pub code: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExecAttrs {
  command: String,
  cwd: Option<String>,
  #[serde(default)]
  env: BTreeMap<String, String>,
}

/// Runs a command line through the platform shell.
///
/// The command and working directory are property-expanded; the working
/// directory defaults to the context base dir. The child inherits the
/// engine's environment plus any `env` attributes, and its output streams
/// straight through.
#[derive(Debug, Default)]
pub struct ExecTask {
  command: String,
  cwd: Option<String>,
  env: BTreeMap<String, String>,
}

impl Task for ExecTask {
  fn name(&self) -> &str {
    "exec"
  }

  fn configure(&mut self, attributes: &Attributes, _context: &ExecutionContext) -> Result<(), TaskFault> {
    let attrs: ExecAttrs = from_attributes(attributes)?;
    self.command = attrs.command;
    self.cwd = attrs.cwd;
    self.env = attrs.env;
    Ok(())
  }

  fn run(&mut self, context: &mut ExecutionContext) -> Result<(), TaskFault> {
    let command_line = context.expand(&self.command);
    let cwd = match &self.cwd {
      Some(dir) => {
        let dir = context.expand(dir);
        let dir = Path::new(&dir);
        if dir.is_absolute() {
          dir.to_path_buf()
        } else {
          context.base_dir().join(dir)
        }
      }
      None => context.base_dir().to_path_buf(),
    };

    let (shell, shell_args) = get_shell();

    info!(command = %command_line, cwd = %cwd.display(), "exec");

    let mut command = Command::new(shell);
    command.args(shell_args).arg(&command_line).current_dir(&cwd);
    for (key, value) in &self.env {
      command.env(key, value);
    }

    let status = command.status()?;

    debug!(command = %command_line, code = ?status.code(), "exec finished");

    if status.success() {
      Ok(())
    } else {
      Err(Box::new(CommandFailed {
        command: command_line,
        code: status.code(),
      }))
    }
  }
}

/// The platform shell and the flag that takes a command string.
fn get_shell() -> (&'static str, &'static [&'static str]) {
  #[cfg(unix)]
  {
    ("/bin/sh", &["-c"])
  }

  #[cfg(windows)]
  {
    ("cmd.exe", &["/C"])
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::project::TaskSpec;

  fn configured(spec: &TaskSpec, ctx: &ExecutionContext) -> ExecTask {
    let mut task = ExecTask::default();
    task.configure(&spec.attributes, ctx).unwrap();
    task
  }

  #[test]
  fn configure_requires_command() {
    let ctx = ExecutionContext::new("/base");
    let mut task = ExecTask::default();
    assert!(task.configure(&Attributes::new(), &ctx).is_err());
  }

  #[test]
  #[cfg(unix)]
  fn successful_command() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut ctx = ExecutionContext::new(dir.path());

    let spec = TaskSpec::new("exec").with_attribute("command", "true");
    let mut task = configured(&spec, &ctx);

    assert!(task.run(&mut ctx).is_ok());
  }

  #[test]
  #[cfg(unix)]
  fn failing_command_reports_exit_code() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut ctx = ExecutionContext::new(dir.path());

    let spec = TaskSpec::new("exec").with_attribute("command", "exit 3");
    let mut task = configured(&spec, &ctx);

    let err = task.run(&mut ctx).unwrap_err();
    let failed = err.downcast_ref::<CommandFailed>().unwrap();
    assert_eq!(failed.code, Some(3));
  }

  #[test]
  #[cfg(unix)]
  fn command_is_property_expanded() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut ctx = ExecutionContext::new(dir.path());
    ctx.set_property("stamp", "ready");

    let spec = TaskSpec::new("exec").with_attribute("command", "touch ${stamp}.marker");
    let mut task = configured(&spec, &ctx);

    task.run(&mut ctx).unwrap();
    assert!(dir.path().join("ready.marker").exists());
  }

  #[test]
  #[cfg(unix)]
  fn cwd_resolves_against_base_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let mut ctx = ExecutionContext::new(dir.path());

    let spec = TaskSpec::new("exec")
      .with_attribute("command", "touch here.marker")
      .with_attribute("cwd", "sub");
    let mut task = configured(&spec, &ctx);

    task.run(&mut ctx).unwrap();
    assert!(dir.path().join("sub/here.marker").exists());
  }

  #[test]
  #[cfg(unix)]
  fn env_attributes_reach_the_child() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut ctx = ExecutionContext::new(dir.path());

    let spec = TaskSpec::new("exec")
      .with_attribute("command", "printf '%s' \"$GREETING\" > env.marker")
      .with_attribute("env", serde_json::json!({ "GREETING": "hello" }));
    let mut task = configured(&spec, &ctx);

    task.run(&mut ctx).unwrap();
    assert_eq!(
      std::fs::read_to_string(dir.path().join("env.marker")).unwrap(),
      "hello"
    );
  }
}
