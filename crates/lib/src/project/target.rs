//! Targets and their declared tasks.

use serde_json::Value;

use crate::context::ExecutionContext;

/// Attribute map a task is configured from.
pub type Attributes = serde_json::Map<String, Value>;

/// A task as declared in a target: a kind plus its attributes.
///
/// Specs stay declarative so the [`Project`](super::Project) can remain
/// immutable during a run; the executor materializes a live task from the
/// spec each time the target executes.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
  pub kind: String,
  pub attributes: Attributes,
}

impl TaskSpec {
  pub fn new(kind: impl Into<String>) -> Self {
    Self {
      kind: kind.into(),
      attributes: Attributes::new(),
    }
  }

  pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.attributes.insert(key.into(), value.into());
    self
  }
}

/// A named node in the dependency graph: an ordered list of tasks plus the
/// names of the targets that must run first.
///
/// Targets are built once, during project loading, and never change during a
/// resolution + execution pass.
#[derive(Debug, Clone)]
pub struct Target {
  name: String,
  depends: Vec<String>,
  tasks: Vec<TaskSpec>,
  description: Option<String>,
  if_property: Option<String>,
  unless_property: Option<String>,
}

impl Target {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      depends: Vec::new(),
      tasks: Vec::new(),
      description: None,
      if_property: None,
      unless_property: None,
    }
  }

  /// Add a dependency. Declaration order is execution-relevant: dependencies
  /// resolve in the order they were added.
  pub fn depends_on(mut self, name: impl Into<String>) -> Self {
    self.depends.push(name.into());
    self
  }

  pub fn task(mut self, spec: TaskSpec) -> Self {
    self.tasks.push(spec);
    self
  }

  pub fn describe(mut self, text: impl Into<String>) -> Self {
    self.description = Some(text.into());
    self
  }

  /// Only run this target's tasks when `property` is set in the context.
  pub fn only_if(mut self, property: impl Into<String>) -> Self {
    self.if_property = Some(property.into());
    self
  }

  /// Skip this target's tasks when `property` is set in the context.
  pub fn unless(mut self, property: impl Into<String>) -> Self {
    self.unless_property = Some(property.into());
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn depends(&self) -> &[String] {
    &self.depends
  }

  pub fn tasks(&self) -> &[TaskSpec] {
    &self.tasks
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  /// Evaluate the `if`/`unless` conditions against the context.
  ///
  /// Only whether the property is set matters, never its value. A target
  /// whose condition fails still satisfies its dependents; only its own
  /// tasks are skipped.
  pub fn should_run(&self, context: &ExecutionContext) -> bool {
    if let Some(required) = &self.if_property
      && !context.has_property(required)
    {
      return false;
    }
    if let Some(blocker) = &self.unless_property
      && context.has_property(blocker)
    {
      return false;
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builder_collects_in_declaration_order() {
    let target = Target::new("dist")
      .depends_on("compile")
      .depends_on("test")
      .describe("assemble the distribution")
      .task(TaskSpec::new("echo").with_attribute("message", "packaging"))
      .task(TaskSpec::new("exec").with_attribute("command", "tar cf dist.tar out"));

    assert_eq!(target.name(), "dist");
    assert_eq!(target.depends(), ["compile", "test"]);
    assert_eq!(target.tasks().len(), 2);
    assert_eq!(target.tasks()[0].kind, "echo");
    assert_eq!(target.description(), Some("assemble the distribution"));
  }

  #[test]
  fn unconditioned_target_always_runs() {
    let ctx = ExecutionContext::new("/base");
    assert!(Target::new("a").should_run(&ctx));
  }

  #[test]
  fn if_condition_requires_property() {
    let target = Target::new("docs").only_if("have-doc-tools");

    let mut ctx = ExecutionContext::new("/base");
    assert!(!target.should_run(&ctx));

    // Any value satisfies the condition, including the empty string.
    ctx.set_property("have-doc-tools", "");
    assert!(target.should_run(&ctx));
  }

  #[test]
  fn unless_condition_blocks_on_property() {
    let target = Target::new("fetch").unless("offline");

    let mut ctx = ExecutionContext::new("/base");
    assert!(target.should_run(&ctx));

    ctx.set_property("offline", "true");
    assert!(!target.should_run(&ctx));
  }

  #[test]
  fn both_conditions_must_allow() {
    let target = Target::new("deploy").only_if("release").unless("dry-run");

    let mut ctx = ExecutionContext::new("/base");
    ctx.set_property("release", "1");
    assert!(target.should_run(&ctx));

    ctx.set_property("dry-run", "1");
    assert!(!target.should_run(&ctx));
  }
}
