// tests/lifecycle.rs

//! Job-queue lifecycle: closure discipline, post-compile buffering, and the
//! late-arrival branch.

use incdrive::engine::{Job, JobOutcome, JobQueue};
use incdrive::record::InputStatus;
use incdrive::IncrementalScheduler;
use incdrive_test_utils::builders::{compile_job, BuildRecordBuilder, SetupBuilder};
use incdrive_test_utils::{init_tracing, with_timeout};

fn link_job(name: &str) -> Job {
    Job::new(name, vec![], vec![])
}

/// With nothing to compile the scheduler concludes at construction.
#[test]
fn empty_first_wave_closes_queue_at_construction() {
    init_tracing();

    let record = BuildRecordBuilder::new()
        .built_at(100)
        .prior_input("a.src", InputStatus::UpToDate, 90)
        .current_mtime("a.src", 90)
        .build();
    let builder = SetupBuilder::new().inputs(&["a.src"]).record(record);

    let scheduler = IncrementalScheduler::try_new(builder.build()).unwrap();
    assert!(!scheduler.dynamic_jobs().is_open());
}

/// Post-compile jobs arriving after closure are appended directly, each
/// exactly once.
#[test]
fn late_post_compile_jobs_append_once_each() {
    init_tracing();

    let record = BuildRecordBuilder::new().built_at(100).build();
    let builder = SetupBuilder::new().record(record);
    let mut scheduler = IncrementalScheduler::try_new(builder.build()).unwrap();
    let queue = scheduler.dynamic_jobs();
    assert!(!queue.is_open());

    scheduler.add_post_compile_jobs(vec![link_job("link"), link_job("merge-modules")]);

    assert_eq!(queue.try_pop().unwrap().description, "link");
    assert_eq!(queue.try_pop().unwrap().description, "merge-modules");
    assert!(queue.try_pop().is_none());
}

/// While compiles are outstanding, post-compile jobs are buffered, not
/// queued.
#[test]
fn post_compile_jobs_buffer_until_pending_drains() {
    init_tracing();

    let record = BuildRecordBuilder::new()
        .built_at(100)
        .prior_input("a.src", InputStatus::NeedsNonCascadingBuild, 200)
        .current_mtime("a.src", 200)
        .build();
    let builder = SetupBuilder::new().inputs(&["a.src"]).record(record);
    let mut scheduler = IncrementalScheduler::try_new(builder.build()).unwrap();
    let queue = scheduler.dynamic_jobs();

    scheduler.add_post_compile_jobs(vec![link_job("link")]);
    assert!(queue.try_pop().is_none(), "link must wait for compiles");
    assert!(queue.is_open());

    scheduler.job_finished(&compile_job("a.src"), JobOutcome::Success);
    assert!(!queue.is_open());
    assert_eq!(queue.try_pop().unwrap().description, "link");
}

/// Closing is idempotent and FIFO order is preserved.
#[test]
fn queue_is_fifo_and_close_is_idempotent() {
    init_tracing();

    let queue = JobQueue::new();
    queue.append(link_job("one"));
    queue.extend([link_job("two"), link_job("three")]);
    queue.close();
    queue.close();

    assert_eq!(queue.try_pop().unwrap().description, "one");
    assert_eq!(queue.try_pop().unwrap().description, "two");
    assert_eq!(queue.try_pop().unwrap().description, "three");
    assert!(queue.try_pop().is_none());
    assert!(!queue.is_open());
}

/// An async consumer sees queued jobs, then `None` once the queue is closed
/// and drained.
#[tokio::test]
async fn consumer_drains_then_observes_closure() {
    init_tracing();

    let queue = JobQueue::new();
    let consumer = queue.clone();

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(job) = consumer.next().await {
            seen.push(job.description);
        }
        seen
    });

    queue.append(link_job("one"));
    queue.append(link_job("two"));
    queue.close();

    let seen = with_timeout(handle).await.unwrap();
    assert_eq!(seen, vec!["one".to_string(), "two".to_string()]);
}

/// A consumer parked on an empty open queue wakes on close.
#[tokio::test]
async fn parked_consumer_wakes_on_close() {
    init_tracing();

    let queue = JobQueue::new();
    let consumer = queue.clone();

    let handle = tokio::spawn(async move { consumer.next().await });

    // Give the consumer a chance to park before closing.
    tokio::task::yield_now().await;
    queue.close();

    assert!(with_timeout(handle).await.unwrap().is_none());
}
