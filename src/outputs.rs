// src/outputs.rs

//! Output-file-map abstraction.
//!
//! The driver writes one entry per input describing where its per-input
//! artifacts live (object file, dependency summary, ...). Incremental
//! compilation requires the map to exist at all; the lookups are used by the
//! driver when wiring jobs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{DriverError, Result};
use crate::fs::FileSystem;

/// Kinds of per-input outputs the map can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// The compiled object file.
    Object,
    /// The per-input dependency summary consumed by the module graph.
    DependencySummary,
    /// The persisted build record (conventionally keyed under `""`).
    BuildRecord,
}

impl OutputKind {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "object" => Some(OutputKind::Object),
            "dependency-summary" => Some(OutputKind::DependencySummary),
            "build-record" => Some(OutputKind::BuildRecord),
            _ => None,
        }
    }
}

/// Mapping from inputs to their per-kind output paths, queryable both ways.
#[derive(Debug, Clone, Default)]
pub struct OutputFileMap {
    entries: HashMap<PathBuf, HashMap<OutputKind, PathBuf>>,
}

type RawOutputFileMap = HashMap<PathBuf, HashMap<String, PathBuf>>;

impl OutputFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the map from a TOML file via the filesystem abstraction.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let contents = fs
            .read_to_string(path)
            .map_err(|e| DriverError::OutputFileMap(e.to_string()))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let raw: RawOutputFileMap = toml::from_str(contents)?;

        let mut entries: HashMap<PathBuf, HashMap<OutputKind, PathBuf>> = HashMap::new();
        for (input, outputs) in raw {
            let mut by_kind = HashMap::new();
            for (key, output) in outputs {
                let kind = OutputKind::from_key(&key).ok_or_else(|| {
                    DriverError::OutputFileMap(format!(
                        "unknown output kind '{key}' for input {input:?}"
                    ))
                })?;
                by_kind.insert(kind, output);
            }
            entries.insert(input, by_kind);
        }

        Ok(Self { entries })
    }

    pub fn insert(
        &mut self,
        input: impl Into<PathBuf>,
        kind: OutputKind,
        output: impl Into<PathBuf>,
    ) {
        self.entries
            .entry(input.into())
            .or_default()
            .insert(kind, output.into());
    }

    /// Output of the given kind for an input, if the map names one.
    pub fn output_for(&self, input: &Path, kind: OutputKind) -> Option<&Path> {
        self.entries
            .get(input)
            .and_then(|outputs| outputs.get(&kind))
            .map(PathBuf::as_path)
    }

    /// Reverse lookup: which input produces this output file.
    pub fn input_for(&self, output: &Path) -> Option<&Path> {
        self.entries.iter().find_map(|(input, outputs)| {
            outputs
                .values()
                .any(|o| o == output)
                .then(|| input.as_path())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
