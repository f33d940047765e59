// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::types::Timestamp;

pub mod mock;

pub use mock::MockFileSystem;

/// Metadata the scheduler reads for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    pub mod_time: Timestamp,
}

/// Abstract filesystem interface.
///
/// The scheduler only ever reads: record loading, mtime stat'ing. Keeping
/// this a trait lets tests run against [`MockFileSystem`] with fabricated
/// modification times.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn exists(&self, path: &Path) -> bool;
    fn file_info(&self, path: &Path) -> Result<FileInfo>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn file_info(&self, path: &Path) -> Result<FileInfo> {
        let meta = fs::metadata(path).with_context(|| format!("stat'ing {:?}", path))?;
        let modified = meta
            .modified()
            .with_context(|| format!("reading mtime of {:?}", path))?;
        Ok(FileInfo {
            mod_time: Timestamp::from(modified),
        })
    }
}

/// Current modification time of `path`, with unreadable mtimes treated as
/// infinitely future so they always schedule.
pub fn mod_time_or_future(fs: &dyn FileSystem, path: &Path) -> Timestamp {
    fs.file_info(path)
        .map(|info| info.mod_time)
        .unwrap_or(Timestamp::FUTURE)
}
