//! Execution context shared by every task in a run.
//!
//! The context is a property bag plus a base directory. Properties follow
//! first-set-wins semantics: once a key holds a value, later writes are
//! ignored. This keeps repeated builds deterministic no matter which target
//! happens to define a property first.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Mutable state scoped to a single build invocation.
///
/// One context is created per top-level run and handed to every task. It is
/// never shared across concurrent builds.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
  properties: BTreeMap<String, String>,
  base_dir: PathBuf,
}

impl ExecutionContext {
  /// Create an empty context rooted at `base_dir`.
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      properties: BTreeMap::new(),
      base_dir: base_dir.into(),
    }
  }

  /// The directory paths in this run are resolved against.
  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }

  /// Set a property. Returns `false` (and leaves the old value in place)
  /// when the key is already defined.
  pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
    let key = key.into();
    if self.properties.contains_key(&key) {
      debug!(key = %key, "property already set, ignoring");
      return false;
    }
    self.properties.insert(key, value.into());
    true
  }

  /// Look up a property value.
  pub fn property(&self, key: &str) -> Option<&str> {
    self.properties.get(key).map(String::as_str)
  }

  /// Whether a property is defined, regardless of its value.
  pub fn has_property(&self, key: &str) -> bool {
    self.properties.contains_key(key)
  }

  /// Iterate over all properties in key order.
  pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
    self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Expand `${name}` references against the property map.
  ///
  /// Unknown references are left verbatim, so diagnostics show exactly what
  /// failed to resolve.
  pub fn expand(&self, input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
      out.push_str(&rest[..start]);
      let after = &rest[start + 2..];
      match after.find('}') {
        Some(end) => {
          let key = &after[..end];
          match self.properties.get(key) {
            Some(value) => out.push_str(value),
            None => {
              out.push_str("${");
              out.push_str(key);
              out.push('}');
            }
          }
          rest = &after[end + 1..];
        }
        // Unterminated reference, keep the tail as-is.
        None => {
          out.push_str(&rest[start..]);
          rest = "";
        }
      }
    }

    out.push_str(rest);
    out
  }

  /// Seed `<prefix>.<VAR>` properties from the process environment.
  ///
  /// Existing properties win, like every other write.
  pub fn seed_env(&mut self, prefix: &str) {
    for (key, value) in std::env::vars_os() {
      if let (Ok(key), Ok(value)) = (key.into_string(), value.into_string()) {
        self.set_property(format!("{prefix}.{key}"), value);
      }
    }
  }
}
