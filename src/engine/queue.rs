// src/engine/queue.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tracing::debug;

use super::Job;

/// A closeable FIFO stream of jobs from the scheduler to the executor.
///
/// Semantics:
/// - `append` / `extend` enqueue jobs in FIFO order.
/// - `close` marks the queue terminal; a consumer observing an empty closed
///   queue exits. Closing is idempotent.
/// - The queue itself accepts appends after close. That permissiveness
///   exists for exactly one caller: post-compile jobs that arrive after the
///   scheduler has concluded are appended directly instead of buffered. The
///   scheduler enforces the rule that no *compile* job lands after close.
///
/// Handles are cheap clones sharing one deque; producer-side appends and the
/// close flag are published to consumers with the usual mutex ordering, and
/// the `Notify` wakes a consumer parked in [`JobQueue::next`].
#[derive(Debug, Clone, Default)]
pub struct JobQueue {
    inner: Arc<QueueInner>,
}

#[derive(Debug, Default)]
struct QueueInner {
    state: Mutex<QueueState>,
    notify: Notify,
}

#[derive(Debug)]
struct QueueState {
    jobs: VecDeque<Job>,
    open: bool,
}

impl Default for QueueState {
    fn default() -> Self {
        Self {
            jobs: VecDeque::new(),
            open: true,
        }
    }
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, job: Job) {
        let mut state = self.inner.state.lock().unwrap();
        debug!(job = %job.description, "queueing job");
        state.jobs.push_back(job);
        drop(state);
        self.inner.notify.notify_one();
    }

    pub fn extend(&self, jobs: impl IntoIterator<Item = Job>) {
        let mut state = self.inner.state.lock().unwrap();
        for job in jobs {
            debug!(job = %job.description, "queueing job");
            state.jobs.push_back(job);
        }
        drop(state);
        self.inner.notify.notify_waiters();
    }

    /// Mark the queue terminal. Idempotent.
    pub fn close(&self) {
        let mut state = self.inner.state.lock().unwrap();
        if state.open {
            debug!(remaining = state.jobs.len(), "closing job queue");
            state.open = false;
        }
        drop(state);
        self.inner.notify.notify_waiters();
    }

    pub fn is_open(&self) -> bool {
        self.inner.state.lock().unwrap().open
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().unwrap().jobs.is_empty()
    }

    /// Pop the next job if one is ready, without waiting.
    pub fn try_pop(&self) -> Option<Job> {
        self.inner.state.lock().unwrap().jobs.pop_front()
    }

    /// Wait for the next job. Returns `None` only once the queue is closed
    /// **and** drained.
    pub async fn next(&self) -> Option<Job> {
        loop {
            let notified = self.inner.notify.notified();
            {
                let mut state = self.inner.state.lock().unwrap();
                if let Some(job) = state.jobs.pop_front() {
                    return Some(job);
                }
                if !state.open {
                    return None;
                }
            }
            notified.await;
        }
    }
}
