// src/engine/mod.rs

//! Job delivery engine.
//!
//! This module ties together:
//! - the job and outcome types shared with the executor
//! - the closeable job queue the scheduler streams second-wave work through
//! - the executor backend abstraction (real processes in production, fakes
//!   in tests)
//! - the async runtime shell that feeds completions back into the scheduler
//!
//! The scheduler itself stays pure and synchronous; everything async lives
//! here.

use crate::types::Input;

pub mod backend;
pub mod queue;
pub mod runtime;

pub use backend::{ExecutorBackend, ProcessExecutorBackend};
pub use queue::JobQueue;
pub use runtime::Runtime;

/// One unit of work handed to the executor.
///
/// Compile jobs carry the inputs they compile as `primary_inputs`;
/// post-compile jobs (link, merge-modules) may carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Short human-readable description, used in logs and reports.
    pub description: String,
    /// Command line to execute. May be empty for fakes and dry runs.
    pub argv: Vec<String>,
    /// The inputs this job compiles.
    pub primary_inputs: Vec<Input>,
}

impl Job {
    pub fn new(
        description: impl Into<String>,
        argv: Vec<String>,
        primary_inputs: Vec<Input>,
    ) -> Self {
        Self {
            description: description.into(),
            argv,
            primary_inputs,
        }
    }

    /// A compile job for a single input, with no command line attached.
    pub fn compiling(input: Input) -> Self {
        Self {
            description: format!("compile {input}"),
            argv: Vec::new(),
            primary_inputs: vec![input],
        }
    }
}

/// Outcome of a job process for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    Failed(i32),
}

impl JobOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, JobOutcome::Success)
    }
}

/// Events flowing into the runtime from the executor.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A job process exited with a concrete outcome.
    JobCompleted { job: Job, outcome: JobOutcome },
    /// Graceful shutdown requested.
    ShutdownRequested,
}
