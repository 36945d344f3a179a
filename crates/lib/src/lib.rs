//! gantry-lib: a target-graph build engine.
//!
//! This crate provides the fundamental pieces of a build run:
//! - `Project`/`Target`: the dependency graph of named build steps
//! - `ExecutionContext`: the first-write-wins property bag a run owns
//! - `execute`: dependency-order resolution, the task lifecycle state
//!   machine with aspect hooks, and the top-level build driver
//! - `task`: the task capability, its registry, and the built-in kinds
//! - `event`: synchronous listener notification of build progress

pub mod context;
pub mod event;
pub mod execute;
pub mod project;
pub mod task;
