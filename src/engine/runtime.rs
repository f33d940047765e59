// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::incremental::IncrementalScheduler;

use super::{ExecutorBackend, Job, JobQueue, RuntimeEvent};

/// Drives the incremental scheduler in response to executor completions.
///
/// This is the async IO shell around the synchronous scheduler: it
/// dispatches the first-wave jobs, forwards each `JobCompleted` event into
/// [`IncrementalScheduler::job_finished`], and streams whatever the
/// scheduler queues (second-wave promotions, then post-compile jobs) to the
/// executor until the queue closes and every dispatched job has reported
/// back.
pub struct Runtime<E: ExecutorBackend> {
    scheduler: IncrementalScheduler,
    jobs: JobQueue,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
    dispatched: usize,
    completed: usize,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .field("dispatched", &self.dispatched)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(
        scheduler: IncrementalScheduler,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        executor: E,
    ) -> Self {
        let jobs = scheduler.dynamic_jobs();
        Self {
            scheduler,
            jobs,
            event_rx,
            executor,
            dispatched: 0,
            completed: 0,
        }
    }

    /// Main event loop.
    ///
    /// `first_wave_jobs` are the compile jobs the driver built for
    /// [`IncrementalScheduler::first_wave_inputs`], in that order.
    pub async fn run(mut self, first_wave_jobs: Vec<Job>) -> Result<()> {
        info!("incremental build runtime started");

        self.dispatch(first_wave_jobs).await?;
        // The queue may already be closed when nothing needed compiling;
        // this flushes the post-compile jobs in that case.
        self.drain_ready().await?;

        while !self.all_work_delivered() {
            let event = match self.event_rx.recv().await {
                Some(event) => event,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::JobCompleted { job, outcome } => {
                    self.completed += 1;
                    self.scheduler.job_finished(&job, outcome);
                    self.drain_ready().await?;
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
            }
        }

        info!(
            dispatched = self.dispatched,
            completed = self.completed,
            "runtime exiting"
        );
        Ok(())
    }

    /// Whether the job stream has ended and every dispatched job reported
    /// back.
    fn all_work_delivered(&self) -> bool {
        !self.jobs.is_open() && self.jobs.is_empty() && self.completed == self.dispatched
    }

    /// Forward everything currently sitting in the dynamic queue.
    async fn drain_ready(&mut self) -> Result<()> {
        let mut batch = Vec::new();
        while let Some(job) = self.jobs.try_pop() {
            batch.push(job);
        }
        self.dispatch(batch).await
    }

    async fn dispatch(&mut self, jobs: Vec<Job>) -> Result<()> {
        if jobs.is_empty() {
            return Ok(());
        }

        let descriptions: Vec<_> = jobs.iter().map(|j| j.description.as_str()).collect();
        debug!(?descriptions, "dispatching jobs to executor");

        self.dispatched += jobs.len();
        self.executor.spawn_jobs(jobs).await
    }
}
