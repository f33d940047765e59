// tests/determinism.rs

//! Property: planning is deterministic. Identical inputs, record, and graph
//! always yield identical first-wave and skipped sets.

use proptest::prelude::*;

use incdrive::record::InputStatus;
use incdrive::{IncrementalScheduler, Input};
use incdrive_test_utils::builders::{BuildRecordBuilder, GraphBuilder, SetupBuilder};

#[derive(Debug, Clone)]
struct FileSpec {
    /// `None` models an input absent from the prior record.
    status: Option<InputStatus>,
    /// `None` models an unreadable current mtime.
    current_mtime: Option<u64>,
}

#[derive(Debug, Clone)]
struct Scenario {
    build_time: u64,
    files: Vec<FileSpec>,
    /// Dependency edges as (dependent, dependency) index pairs.
    edges: Vec<(usize, usize)>,
}

fn status_strategy() -> impl Strategy<Value = Option<InputStatus>> {
    prop_oneof![
        Just(None),
        Just(Some(InputStatus::UpToDate)),
        Just(Some(InputStatus::NewlyAdded)),
        Just(Some(InputStatus::NeedsCascadingBuild)),
        Just(Some(InputStatus::NeedsNonCascadingBuild)),
    ]
}

fn scenario_strategy(max_files: usize) -> impl Strategy<Value = Scenario> {
    (1..=max_files).prop_flat_map(|num_files| {
        let files = proptest::collection::vec(
            (status_strategy(), proptest::option::of(0u64..300)).prop_map(
                |(status, current_mtime)| FileSpec {
                    status,
                    current_mtime,
                },
            ),
            num_files,
        );
        let edges = proptest::collection::vec((0..num_files, 0..num_files), 0..num_files * 2);
        (50u64..250, files, edges).prop_map(|(build_time, files, edges)| Scenario {
            build_time,
            files,
            edges,
        })
    })
}

fn file_name(index: usize) -> String {
    format!("file_{index}.src")
}

fn plan_scenario(scenario: &Scenario) -> (Vec<Input>, Vec<Input>) {
    let mut record = BuildRecordBuilder::new().built_at(scenario.build_time);
    for (i, file) in scenario.files.iter().enumerate() {
        let name = file_name(i);
        if let Some(status) = file.status {
            record = record.prior_input(&name, status, 0);
        }
        record = match file.current_mtime {
            Some(mtime) => record.current_mtime(&name, mtime),
            None => record.current_mtime_missing(&name),
        };
    }

    let mut graph = GraphBuilder::new();
    for (dependent, dependency) in &scenario.edges {
        if dependent == dependency {
            continue;
        }
        graph = graph.dependency(&file_name(*dependent), &file_name(*dependency));
    }

    let names: Vec<String> = (0..scenario.files.len()).map(file_name).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let builder = SetupBuilder::new()
        .inputs(&name_refs)
        .record(record.build())
        .graph(graph.build_shared());

    let scheduler = IncrementalScheduler::try_new(builder.build()).unwrap();
    (
        scheduler.first_wave_inputs().to_vec(),
        scheduler.skipped_inputs().iter().cloned().collect(),
    )
}

proptest! {
    #[test]
    fn planning_is_deterministic(scenario in scenario_strategy(8)) {
        let (first_a, skipped_a) = plan_scenario(&scenario);
        let (first_b, skipped_b) = plan_scenario(&scenario);

        prop_assert_eq!(&first_a, &first_b);
        prop_assert_eq!(&skipped_a, &skipped_b);

        // First wave and skipped set never overlap.
        for input in &first_a {
            prop_assert!(!skipped_a.contains(input));
        }

        // The first wave arrives in path sort order.
        let mut sorted = first_a.clone();
        sorted.sort();
        prop_assert_eq!(first_a, sorted);
    }
}
