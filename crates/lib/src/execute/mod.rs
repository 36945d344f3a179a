//! Resolution and execution.
//!
//! This module is the engine proper:
//! - dependency-order resolution with cycle detection ([`order`])
//! - the task lifecycle state machine, with and without aspect hooks
//!   ([`executor`], [`aspect`])
//! - the top-level driver that ties resolution, execution, and event
//!   dispatch together ([`driver`])
//! - a deadline wrapper for callers that need a timeout ([`worker`])

pub mod aspect;
pub mod driver;
pub mod executor;
pub mod order;
pub mod types;
pub mod worker;

pub use aspect::{Aspect, ErrorDisposition};
pub use driver::BuildDriver;
pub use executor::{AspectExecutor, DefaultExecutor, Executor, TaskState};
pub use order::resolve;
pub use types::{BuildError, BuildResult, Phase, ResolveError, RunOptions, TaskError};
pub use worker::{WorkerError, run_with_deadline};
