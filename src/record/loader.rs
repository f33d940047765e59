// src/record/loader.rs

//! Reading and validating the persisted build record.
//!
//! The record is TOML:
//!
//! ```toml
//! version = 1
//! build-time = { secs = 100, nanos = 0 }
//!
//! [inputs."a.src"]
//! status = "up-to-date"
//! mod-time = { secs = 90, nanos = 0 }
//! ```
//!
//! Loading also captures the *current* mtime of every compilable input, so
//! downstream components never have to touch the filesystem themselves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::fs::{mod_time_or_future, FileSystem};
use crate::record::model::{BuildRecord, InputInfo, InputStatus};
use crate::types::{Input, Timestamp};

/// The record format version this crate reads.
pub const BUILD_RECORD_VERSION: u32 = 1;

/// Why a build record could not be used.
///
/// The `Display` text ends up verbatim in the user-facing
/// "Incremental compilation has been disabled, because ..." remark.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("could not read build record at {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("malformed build record: {0}")]
    Malformed(#[from] toml::de::Error),

    #[error("build record version {0} is not supported")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawBuildRecord {
    version: u32,
    build_time: Timestamp,
    #[serde(default)]
    inputs: BTreeMap<PathBuf, RawInputInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawInputInfo {
    status: InputStatus,
    mod_time: Timestamp,
}

/// Load the build record at `path` and snapshot current mtimes for `inputs`.
///
/// Inputs of non-compiling kinds are ignored; an input whose file has gone
/// missing gets [`Timestamp::FUTURE`], which guarantees it is scheduled.
pub fn load_build_record(
    fs: &dyn FileSystem,
    path: &Path,
    inputs: &[Input],
) -> Result<BuildRecord, RecordError> {
    let contents = fs
        .read_to_string(path)
        .map_err(|e| RecordError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let raw: RawBuildRecord = toml::from_str(&contents)?;
    if raw.version != BUILD_RECORD_VERSION {
        return Err(RecordError::UnsupportedVersion(raw.version));
    }

    let input_infos = raw
        .inputs
        .into_iter()
        .map(|(path, info)| {
            (
                path,
                InputInfo {
                    status: info.status,
                    previous_mod_time: info.mod_time,
                },
            )
        })
        .collect();

    let compilation_input_modification_dates = inputs
        .iter()
        .filter(|input| input.is_compilable())
        .map(|input| (input.clone(), mod_time_or_future(fs, input.path())))
        .collect();

    let record = BuildRecord {
        build_time: raw.build_time,
        input_infos,
        compilation_input_modification_dates,
    };

    debug!(
        build_time_secs = record.build_time.secs,
        prior_inputs = record.input_infos.len(),
        current_inputs = record.compilation_input_modification_dates.len(),
        "loaded build record"
    );

    Ok(record)
}
