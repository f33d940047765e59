// tests/output_file_map.rs

//! Output-file-map parsing and lookups.

use std::path::Path;

use incdrive::errors::DriverError;
use incdrive::fs::MockFileSystem;
use incdrive::outputs::{OutputFileMap, OutputKind};
use incdrive_test_utils::init_tracing;

const MAP: &str = r#"
["a.src"]
object = "build/a.o"
dependency-summary = "build/a.deps"

[""]
build-record = "build/build.record"
"#;

#[test]
fn looks_up_outputs_by_input_and_kind() {
    init_tracing();

    let map = OutputFileMap::parse(MAP).unwrap();

    assert_eq!(
        map.output_for(Path::new("a.src"), OutputKind::Object),
        Some(Path::new("build/a.o"))
    );
    assert_eq!(
        map.output_for(Path::new("a.src"), OutputKind::DependencySummary),
        Some(Path::new("build/a.deps"))
    );
    assert_eq!(
        map.output_for(Path::new(""), OutputKind::BuildRecord),
        Some(Path::new("build/build.record"))
    );
    assert_eq!(map.output_for(Path::new("b.src"), OutputKind::Object), None);
}

#[test]
fn reverse_lookup_finds_the_owning_input() {
    init_tracing();

    let map = OutputFileMap::parse(MAP).unwrap();

    assert_eq!(
        map.input_for(Path::new("build/a.deps")),
        Some(Path::new("a.src"))
    );
    assert_eq!(map.input_for(Path::new("build/missing.o")), None);
}

#[test]
fn unknown_output_kind_is_rejected() {
    init_tracing();

    let err = OutputFileMap::parse("[\"a.src\"]\nfrobnicated = \"a.frob\"\n").unwrap_err();
    assert!(matches!(err, DriverError::OutputFileMap(_)));
}

#[test]
fn loads_through_the_filesystem_abstraction() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("outputs.toml", MAP);

    let map = OutputFileMap::load(&fs, Path::new("outputs.toml")).unwrap();
    assert!(!map.is_empty());

    let err = OutputFileMap::load(&fs, Path::new("missing.toml")).unwrap_err();
    assert!(matches!(err, DriverError::OutputFileMap(_)));
}

#[test]
fn insert_builds_a_map_programmatically() {
    init_tracing();

    let mut map = OutputFileMap::new();
    assert!(map.is_empty());

    map.insert("a.src", OutputKind::Object, "build/a.o");
    assert_eq!(
        map.output_for(Path::new("a.src"), OutputKind::Object),
        Some(Path::new("build/a.o"))
    );
}
