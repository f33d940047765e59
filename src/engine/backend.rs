// src/engine/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of spawning processes
//! itself. This keeps the production executor in one place and lets tests
//! substitute a fake that completes jobs instantly.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::{Job, JobOutcome, RuntimeEvent};
use crate::errors::Result;

/// Trait abstracting how jobs are executed.
///
/// The implementation is free to:
/// - spawn OS processes (production)
/// - simulate completion and emit `RuntimeEvent`s (tests)
pub trait ExecutorBackend: Send {
    fn spawn_jobs(
        &mut self,
        jobs: Vec<Job>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real executor backend: runs each job's command line as a child process
/// and reports its outcome on the runtime event channel.
pub struct ProcessExecutorBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl ProcessExecutorBackend {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { runtime_tx }
    }
}

impl ExecutorBackend for ProcessExecutorBackend {
    fn spawn_jobs(
        &mut self,
        jobs: Vec<Job>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            for job in jobs {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = run_job(&job).await;
                    let _ = tx.send(RuntimeEvent::JobCompleted { job, outcome }).await;
                });
            }
            Ok(())
        })
    }
}

/// Run one job process to completion.
///
/// A job with an empty command line completes successfully without spawning
/// anything; spawn failures count as failed jobs, not executor errors, so
/// the scheduler's state machine still observes the completion.
async fn run_job(job: &Job) -> JobOutcome {
    let Some((program, args)) = job.argv.split_first() else {
        debug!(job = %job.description, "job has no command line; completing immediately");
        return JobOutcome::Success;
    };

    info!(job = %job.description, program = %program, "starting job process");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => {
            debug!(job = %job.description, "job succeeded");
            JobOutcome::Success
        }
        Ok(output) => {
            let code = output.status.code().unwrap_or(-1);
            for line in String::from_utf8_lossy(&output.stderr).lines() {
                debug!(job = %job.description, "stderr: {line}");
            }
            error!(job = %job.description, exit_code = code, "job failed");
            JobOutcome::Failed(code)
        }
        Err(err) => {
            error!(job = %job.description, error = %err, "failed to spawn job process");
            JobOutcome::Failed(-1)
        }
    }
}
