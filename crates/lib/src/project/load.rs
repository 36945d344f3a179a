//! Declarative project files.
//!
//! A project file is TOML: top-level metadata plus a table of targets, each
//! with optional dependencies, conditions, and an ordered task list. Task
//! attributes are carried through untyped; whether a `kind` exists is the
//! task registry's call at execution time, and dangling dependency names
//! surface during resolution.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::{Project, ProjectError, Target, TaskSpec};

/// Errors raised while loading a project file.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("project file not found: {0}")]
  NotFound(PathBuf),

  #[error("failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: Box<toml::de::Error>,
  },

  /// A task attribute did not survive conversion to a plain value.
  #[error("invalid attribute \"{attribute}\" on task \"{kind}\": {source}")]
  Attribute {
    kind: String,
    attribute: String,
    #[source]
    source: serde_json::Error,
  },

  #[error(transparent)]
  Project(#[from] ProjectError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectFile {
  name: Option<String>,
  default: Option<String>,
  basedir: Option<PathBuf>,
  #[serde(default)]
  targets: BTreeMap<String, TargetFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetFile {
  #[serde(default)]
  depends: Vec<String>,
  description: Option<String>,
  #[serde(rename = "if")]
  if_property: Option<String>,
  unless: Option<String>,
  #[serde(default)]
  tasks: Vec<TaskFile>,
}

#[derive(Debug, Deserialize)]
struct TaskFile {
  kind: String,
  #[serde(flatten)]
  attributes: BTreeMap<String, toml::Value>,
}

/// Load a project from a TOML file.
///
/// The project's base directory is the file's parent, unless the file sets
/// `basedir` (resolved against the parent when relative).
pub fn load_project(path: &Path) -> Result<Project, LoadError> {
  if !path.exists() {
    return Err(LoadError::NotFound(path.to_path_buf()));
  }

  let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
    path: path.to_path_buf(),
    source,
  })?;

  let file: ProjectFile = toml::from_str(&text).map_err(|source| LoadError::Parse {
    path: path.to_path_buf(),
    source: Box::new(source),
  })?;

  let parent = path.parent().unwrap_or_else(|| Path::new("."));
  let base_dir = match file.basedir {
    Some(dir) if dir.is_absolute() => dir,
    Some(dir) => parent.join(dir),
    None => parent.to_path_buf(),
  };

  let mut project = Project::new(base_dir);
  if let Some(name) = file.name {
    project = project.named(name);
  }
  if let Some(default) = file.default {
    project = project.with_default(default);
  }

  for (name, spec) in file.targets {
    let mut target = Target::new(name);
    for dep in spec.depends {
      target = target.depends_on(dep);
    }
    if let Some(text) = spec.description {
      target = target.describe(text);
    }
    if let Some(property) = spec.if_property {
      target = target.only_if(property);
    }
    if let Some(property) = spec.unless {
      target = target.unless(property);
    }
    for task in spec.tasks {
      target = target.task(convert_task(task)?);
    }
    project.add_target(target)?;
  }

  debug!(
    path = %path.display(),
    targets = project.target_count(),
    "loaded project"
  );

  Ok(project)
}

fn convert_task(file: TaskFile) -> Result<TaskSpec, LoadError> {
  let mut spec = TaskSpec::new(&file.kind);
  for (key, value) in file.attributes {
    let value = serde_json::to_value(value).map_err(|source| LoadError::Attribute {
      kind: file.kind.clone(),
      attribute: key.clone(),
      source,
    })?;
    spec.attributes.insert(key, value);
  }
  Ok(spec)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write_project(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("gantry.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
  }

  #[test]
  fn loads_targets_tasks_and_metadata() {
    let (dir, path) = write_project(
      r#"
        name = "demo"
        default = "build"

        [targets.init]
        description = "prepare the tree"

        [[targets.init.tasks]]
        kind = "echo"
        message = "initializing"

        [targets.build]
        depends = ["init"]
        if = "have-sources"

        [[targets.build.tasks]]
        kind = "exec"
        command = "make all"

        [[targets.build.tasks]]
        kind = "echo"
        message = "done"
      "#,
    );

    let project = load_project(&path).unwrap();

    assert_eq!(project.name(), Some("demo"));
    assert_eq!(project.default_target(), Some("build"));
    assert_eq!(project.base_dir(), dir.path());
    assert_eq!(project.target_count(), 2);

    let init = project.target("init").unwrap();
    assert_eq!(init.description(), Some("prepare the tree"));
    assert_eq!(init.tasks().len(), 1);
    assert_eq!(init.tasks()[0].kind, "echo");
    assert_eq!(
      init.tasks()[0].attributes.get("message").and_then(|v| v.as_str()),
      Some("initializing")
    );

    let build = project.target("build").unwrap();
    assert_eq!(build.depends(), ["init"]);
    assert_eq!(build.tasks().len(), 2);
    assert_eq!(build.tasks()[0].kind, "exec");
  }

  #[test]
  fn missing_file_is_not_found() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = load_project(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
  }

  #[test]
  fn syntax_error_is_a_parse_error() {
    let (_dir, path) = write_project("targets = not toml");
    let err = load_project(&path).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
  }

  #[test]
  fn unknown_top_level_key_is_rejected() {
    let (_dir, path) = write_project("unknown = 1");
    let err = load_project(&path).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
  }

  #[test]
  fn conditions_map_to_target_fields() {
    let (_dir, path) = write_project(
      r#"
        [targets.docs]
        if = "have-doc-tools"
        unless = "skip-docs"
      "#,
    );

    let project = load_project(&path).unwrap();
    let docs = project.target("docs").unwrap();

    let mut ctx = crate::context::ExecutionContext::new("/base");
    assert!(!docs.should_run(&ctx));
    ctx.set_property("have-doc-tools", "1");
    assert!(docs.should_run(&ctx));
    ctx.set_property("skip-docs", "1");
    assert!(!docs.should_run(&ctx));
  }

  #[test]
  fn empty_file_yields_empty_project() {
    let (_dir, path) = write_project("");
    let project = load_project(&path).unwrap();
    assert_eq!(project.target_count(), 0);
    assert_eq!(project.default_target(), None);
  }

  #[test]
  fn relative_basedir_resolves_against_file_parent() {
    let (dir, path) = write_project(r#"basedir = "sub""#);
    let project = load_project(&path).unwrap();
    assert_eq!(project.base_dir(), dir.path().join("sub"));
  }
}
