// tests/process_backend.rs

//! The production executor backend: real child processes reporting real
//! outcomes.

#![cfg(unix)]

use std::collections::HashMap;

use tokio::sync::mpsc;

use incdrive::engine::{ExecutorBackend, Job, JobOutcome, ProcessExecutorBackend, RuntimeEvent};
use incdrive_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn reports_success_failure_and_empty_command_lines() {
    init_tracing();

    let (tx, mut rx) = mpsc::channel::<RuntimeEvent>(8);
    let mut backend = ProcessExecutorBackend::new(tx);

    let jobs = vec![
        Job::new("ok", vec!["true".into()], vec![]),
        Job::new("fail", vec!["sh".into(), "-c".into(), "exit 3".into()], vec![]),
        Job::new("noop", vec![], vec![]),
    ];
    backend.spawn_jobs(jobs).await.unwrap();

    let mut outcomes = HashMap::new();
    for _ in 0..3 {
        match with_timeout(rx.recv()).await {
            Some(RuntimeEvent::JobCompleted { job, outcome }) => {
                outcomes.insert(job.description, outcome);
            }
            other => panic!("expected a completion, got {other:?}"),
        }
    }

    assert_eq!(outcomes["ok"], JobOutcome::Success);
    assert_eq!(outcomes["fail"], JobOutcome::Failed(3));
    assert_eq!(outcomes["noop"], JobOutcome::Success);
}

#[tokio::test]
async fn unspawnable_command_counts_as_failed() {
    init_tracing();

    let (tx, mut rx) = mpsc::channel::<RuntimeEvent>(8);
    let mut backend = ProcessExecutorBackend::new(tx);

    let job = Job::new(
        "ghost",
        vec!["definitely-not-a-real-binary-2931".into()],
        vec![],
    );
    backend.spawn_jobs(vec![job]).await.unwrap();

    match with_timeout(rx.recv()).await {
        Some(RuntimeEvent::JobCompleted { outcome, .. }) => {
            assert_eq!(outcome, JobOutcome::Failed(-1));
        }
        other => panic!("expected a completion, got {other:?}"),
    }
}
