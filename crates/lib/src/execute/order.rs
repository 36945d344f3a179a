//! Dependency-order resolution.
//!
//! Computes the linear execution order for a set of requested targets with a
//! depth-first walk over the `depends` lists. Order is determined purely by
//! declaration order and first discovery; every dependency lands before its
//! dependents and every target appears at most once. A name that is still on
//! the in-progress stack when re-encountered is a cycle, reported with the
//! full chain.

use std::collections::HashMap;

use tracing::debug;

use crate::project::{Project, Target};

use super::types::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
  /// On the stack, currently being expanded.
  Visiting,
  /// Fully expanded and already in the output order.
  Visited,
}

/// Transient bookkeeping for one resolution pass.
#[derive(Debug, Default)]
struct ResolutionState {
  marks: HashMap<String, Mark>,
  visiting: Vec<String>,
}

/// Resolve `requested` into execution order.
///
/// Requesting nothing is legal and yields an empty order. Choosing a default
/// target for an empty request is the caller's job.
pub fn resolve<'a, S: AsRef<str>>(
  project: &'a Project,
  requested: &[S],
) -> Result<Vec<&'a Target>, ResolveError> {
  let mut state = ResolutionState::default();
  let mut order = Vec::new();

  for name in requested {
    // A root seen via an earlier root's dependencies is already done; the
    // stack is always empty between roots, so Visiting cannot occur here.
    if state.marks.get(name.as_ref()) != Some(&Mark::Visited) {
      visit(project, name.as_ref(), &mut state, &mut order)?;
    }
  }

  debug!(
    order = ?order.iter().map(|t| t.name()).collect::<Vec<_>>(),
    "resolved build sequence"
  );

  Ok(order)
}

fn visit<'a>(
  project: &'a Project,
  name: &str,
  state: &mut ResolutionState,
  order: &mut Vec<&'a Target>,
) -> Result<(), ResolveError> {
  state.marks.insert(name.to_string(), Mark::Visiting);
  state.visiting.push(name.to_string());

  let Some(target) = project.target(name) else {
    state.visiting.pop();
    return Err(ResolveError::UnknownTarget {
      name: name.to_string(),
      referrer: state.visiting.last().cloned(),
    });
  };

  for dep in target.depends() {
    match state.marks.get(dep.as_str()) {
      None => visit(project, dep, state, order)?,
      Some(Mark::Visiting) => return Err(cycle_error(dep, &state.visiting)),
      Some(Mark::Visited) => {}
    }
  }

  state.visiting.pop();
  state.marks.insert(name.to_string(), Mark::Visited);
  order.push(target);
  Ok(())
}

/// Build the cycle path: from the repeated name, through the stack, back to
/// itself.
fn cycle_error(name: &str, visiting: &[String]) -> ResolveError {
  let start = visiting.iter().position(|n| n == name).unwrap_or(0);
  let mut cycle: Vec<String> = visiting[start..].to_vec();
  cycle.push(name.to_string());
  ResolveError::CircularDependency { cycle }
}
