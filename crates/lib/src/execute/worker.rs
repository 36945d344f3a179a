//! Deadline wrapper for build runs.
//!
//! The engine has no cancellation of its own; a caller that wants a timeout
//! runs the build on a worker thread and stops waiting when the deadline
//! passes. The worker itself is not interrupted, it is abandoned: its thread
//! keeps running until the current task returns, and its result is dropped.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use super::types::BuildResult;

#[derive(Debug, Error)]
pub enum WorkerError {
  /// The deadline passed; the build thread was abandoned.
  #[error("build did not finish within {0:?}")]
  TimedOut(Duration),

  /// The build thread died without producing a result.
  #[error("build worker terminated abnormally")]
  Died,

  /// The worker thread could not be spawned.
  #[error("failed to spawn build worker: {0}")]
  Spawn(#[from] std::io::Error),
}

/// Run `build` on a worker thread, waiting at most `deadline` for it.
pub fn run_with_deadline<F>(deadline: Duration, build: F) -> Result<BuildResult, WorkerError>
where
  F: FnOnce() -> BuildResult + Send + 'static,
{
  let (sender, receiver) = mpsc::channel();

  thread::Builder::new().name("build-worker".to_string()).spawn(move || {
    // The receiver may be gone already if the deadline passed.
    let _ = sender.send(build());
  })?;

  match receiver.recv_timeout(deadline) {
    Ok(result) => Ok(result),
    Err(mpsc::RecvTimeoutError::Timeout) => {
      warn!(deadline = ?deadline, "build timed out, abandoning worker");
      Err(WorkerError::TimedOut(deadline))
    }
    Err(mpsc::RecvTimeoutError::Disconnected) => Err(WorkerError::Died),
  }
}
