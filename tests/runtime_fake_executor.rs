// tests/runtime_fake_executor.rs

//! End-to-end: scheduler + runtime + fake executor, from first wave to
//! post-compile flush.

use std::error::Error;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use incdrive::engine::{Job, Runtime, RuntimeEvent};
use incdrive::record::InputStatus;
use incdrive::IncrementalScheduler;
use incdrive_test_utils::builders::{
    compile_job, BuildRecordBuilder, GraphBuilder, SetupBuilder,
};
use incdrive_test_utils::fake_executor::FakeExecutor;
use incdrive_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn executed_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Cascading change: `a.src` pulls `b.src` in immediately, `c.src` is
/// discovered in the second wave, and the link runs last.
#[tokio::test]
async fn full_two_wave_build_delivers_everything_in_order() -> TestResult {
    init_tracing();

    let record = BuildRecordBuilder::new()
        .built_at(100)
        .prior_input("a.src", InputStatus::NeedsCascadingBuild, 200)
        .prior_input("b.src", InputStatus::UpToDate, 80)
        .prior_input("c.src", InputStatus::UpToDate, 70)
        .current_mtime("a.src", 200)
        .current_mtime("b.src", 80)
        .current_mtime("c.src", 70)
        .build();
    let graph = GraphBuilder::new()
        .dependency("b.src", "a.src")
        .sources_after("a.src", &["c.src"])
        .build_shared();
    let builder = SetupBuilder::new()
        .inputs(&["a.src", "b.src", "c.src"])
        .record(record)
        .graph(graph);

    let mut scheduler = IncrementalScheduler::try_new(builder.build()).unwrap();
    assert_eq!(scheduler.first_wave_inputs().len(), 2);

    let first_wave_jobs: Vec<Job> = scheduler
        .first_wave_inputs()
        .iter()
        .cloned()
        .map(Job::compiling)
        .collect();
    scheduler.add_skipped_compile_jobs(vec![compile_job("c.src")]);
    scheduler.add_post_compile_jobs(vec![Job::new("link", vec![], vec![])]);

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let executed = executed_log();
    let executor = FakeExecutor::new(tx, Arc::clone(&executed));

    let runtime = Runtime::new(scheduler, rx, executor);
    with_timeout(runtime.run(first_wave_jobs)).await?;

    let executed = executed.lock().unwrap().clone();
    assert_eq!(
        executed,
        vec![
            "compile a.src".to_string(),
            "compile b.src".to_string(),
            "compile c.src".to_string(),
            "link".to_string(),
        ]
    );
    Ok(())
}

/// Nothing changed: only the post-compile jobs run.
#[tokio::test]
async fn unchanged_tree_runs_only_post_compile_jobs() -> TestResult {
    init_tracing();

    let record = BuildRecordBuilder::new()
        .built_at(100)
        .prior_input("a.src", InputStatus::UpToDate, 90)
        .current_mtime("a.src", 90)
        .build();
    let builder = SetupBuilder::new().inputs(&["a.src"]).record(record);

    let mut scheduler = IncrementalScheduler::try_new(builder.build()).unwrap();
    assert!(scheduler.first_wave_inputs().is_empty());

    scheduler.add_skipped_compile_jobs(vec![compile_job("a.src")]);
    scheduler.add_post_compile_jobs(vec![Job::new("link", vec![], vec![])]);

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let executed = executed_log();
    let executor = FakeExecutor::new(tx, Arc::clone(&executed));

    let runtime = Runtime::new(scheduler, rx, executor);
    with_timeout(runtime.run(Vec::new())).await?;

    assert_eq!(executed.lock().unwrap().clone(), vec!["link".to_string()]);
    Ok(())
}

/// Graph pessimism end-to-end: everything skipped is retried, then the
/// build concludes.
#[tokio::test]
async fn pessimistic_graph_retries_all_skipped() -> TestResult {
    init_tracing();

    let record = BuildRecordBuilder::new()
        .built_at(100)
        .prior_input("a.src", InputStatus::NeedsNonCascadingBuild, 200)
        .prior_input("b.src", InputStatus::UpToDate, 80)
        .prior_input("c.src", InputStatus::UpToDate, 80)
        .current_mtime("a.src", 200)
        .current_mtime("b.src", 80)
        .current_mtime("c.src", 80)
        .build();
    let graph = GraphBuilder::new()
        .sources_after_unknown("a.src")
        .build_shared();
    let builder = SetupBuilder::new()
        .inputs(&["a.src", "b.src", "c.src"])
        .record(record)
        .graph(graph);

    let mut scheduler = IncrementalScheduler::try_new(builder.build()).unwrap();

    let first_wave_jobs: Vec<Job> = scheduler
        .first_wave_inputs()
        .iter()
        .cloned()
        .map(Job::compiling)
        .collect();
    scheduler.add_skipped_compile_jobs(vec![compile_job("b.src"), compile_job("c.src")]);
    scheduler.add_post_compile_jobs(vec![Job::new("link", vec![], vec![])]);

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let executed = executed_log();
    let executor = FakeExecutor::new(tx, Arc::clone(&executed));

    let runtime = Runtime::new(scheduler, rx, executor);
    with_timeout(runtime.run(first_wave_jobs)).await?;

    let executed = executed.lock().unwrap().clone();
    assert_eq!(
        executed,
        vec![
            "compile a.src".to_string(),
            "compile b.src".to_string(),
            "compile c.src".to_string(),
            "link".to_string(),
        ]
    );
    Ok(())
}
