// src/record/model.rs

//! In-memory model of the prior build's record.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{Input, Timestamp};

/// Per-input outcome of the previous build, as persisted in the record.
///
/// A closed four-case sum type; the change detector's classification is
/// total over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputStatus {
    /// Compiled successfully last time.
    UpToDate,
    /// Present now, absent from the prior record.
    NewlyAdded,
    /// Must rebuild, and its dependents must be rechecked.
    NeedsCascadingBuild,
    /// Must rebuild; dependents need not be preemptively scheduled.
    NeedsNonCascadingBuild,
}

impl InputStatus {
    /// Whether this status drives speculative scheduling of dependents.
    ///
    /// Only a cascading build does: the input's public interface is suspect.
    /// An up-to-date input that changed carries unknown changes, and a newly
    /// added input is unknown to the graph, so neither cascades here; the
    /// second wave picks up anything they turn out to affect.
    pub fn is_cascading(self) -> bool {
        matches!(self, InputStatus::NeedsCascadingBuild)
    }
}

/// What the record knows about one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputInfo {
    pub status: InputStatus,
    pub previous_mod_time: Timestamp,
}

/// Snapshot of the prior run, read once at scheduler construction.
#[derive(Debug, Clone, Default)]
pub struct BuildRecord {
    /// Wall-clock timestamp of the last successful build start.
    pub build_time: Timestamp,
    /// Prior status and mtime per input path.
    pub input_infos: HashMap<PathBuf, InputInfo>,
    /// Current mtime of every compilable input, captured at driver startup.
    /// This is the authoritative "current mtime" for the change detector.
    pub compilation_input_modification_dates: HashMap<Input, Timestamp>,
}

impl BuildRecord {
    /// Prior record entry for an input, if the last build knew about it.
    pub fn info_for(&self, input: &Input) -> Option<InputInfo> {
        self.input_infos.get(input.path()).copied()
    }

    /// Current mtime as captured at startup.
    pub fn current_mod_time(&self, input: &Input) -> Option<Timestamp> {
        self.compilation_input_modification_dates.get(input).copied()
    }
}
