// src/types.rs

//! Shared strongly-typed primitives: compilation inputs and timestamps.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// What kind of file an [`Input`] refers to.
///
/// Only [`InputKind::Source`] participates in compilation; other kinds are
/// filtered out before any incremental decision is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputKind {
    /// A source file handed to the compiler frontend.
    Source,
    /// A precompiled object passed through to the linker.
    Object,
    /// Anything else the driver was given (resources, config, ...).
    Other,
}

impl InputKind {
    /// Whether inputs of this kind are compiled (and therefore scheduled).
    pub fn is_compilable(self) -> bool {
        matches!(self, InputKind::Source)
    }
}

/// A reference to one file in the driver's input list.
///
/// Ordering is by logical path, which is what gives the scheduler its
/// deterministic wave ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Input {
    path: PathBuf,
    kind: InputKind,
}

impl Input {
    pub fn new(path: impl Into<PathBuf>, kind: InputKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Convenience constructor for a compilable source input.
    pub fn source(path: impl Into<PathBuf>) -> Self {
        Self::new(path, InputKind::Source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn is_compilable(&self) -> bool {
        self.kind.is_compilable()
    }

    /// Final path component, used in user-facing reports.
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// A file modification time, as persisted in the build record.
///
/// Total ordering is what the scheduler needs; wall-clock interpretation is
/// left to the filesystem. [`Timestamp::FUTURE`] stands in for mtimes that
/// could not be read, so comparisons against the build time always schedule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Timestamp {
    pub secs: u64,
    #[serde(default)]
    pub nanos: u32,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp { secs: 0, nanos: 0 };

    /// "Infinitely future": compares greater than every real mtime.
    pub const FUTURE: Timestamp = Timestamp {
        secs: u64::MAX,
        nanos: 999_999_999,
    };

    pub fn new(secs: u64, nanos: u32) -> Self {
        Self { secs, nanos }
    }

    /// Whole-second timestamp, the common case in build records.
    pub fn from_secs(secs: u64) -> Self {
        Self { secs, nanos: 0 }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(t: SystemTime) -> Self {
        match t.duration_since(UNIX_EPOCH) {
            Ok(d) => Timestamp {
                secs: d.as_secs(),
                nanos: d.subsec_nanos(),
            },
            // Pre-epoch mtimes clamp to zero; they are older than any build.
            Err(_) => Timestamp::ZERO,
        }
    }
}
