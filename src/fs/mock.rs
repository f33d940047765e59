// src/fs/mock.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use super::{FileInfo, FileSystem};
use crate::types::Timestamp;

#[derive(Debug, Clone)]
struct MockEntry {
    contents: Vec<u8>,
    mod_time: Timestamp,
}

/// In-memory filesystem with settable modification times.
///
/// Cloning shares the underlying map, so a test can keep a handle and mutate
/// files after handing the filesystem to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.add_file_at(path, contents, Timestamp::ZERO);
    }

    pub fn add_file_at(
        &self,
        path: impl AsRef<Path>,
        contents: impl Into<Vec<u8>>,
        mod_time: Timestamp,
    ) {
        let mut files = self.files.lock().unwrap();
        files.insert(
            path.as_ref().to_path_buf(),
            MockEntry {
                contents: contents.into(),
                mod_time,
            },
        );
    }

    /// Set the mtime of an existing file, creating an empty one if needed.
    pub fn set_mod_time(&self, path: impl AsRef<Path>, mod_time: Timestamp) {
        let mut files = self.files.lock().unwrap();
        files
            .entry(path.as_ref().to_path_buf())
            .and_modify(|e| e.mod_time = mod_time)
            .or_insert(MockEntry {
                contents: Vec::new(),
                mod_time,
            });
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.files.lock().unwrap().remove(path.as_ref());
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.files.lock().unwrap();
        let entry = files
            .get(path)
            .ok_or_else(|| anyhow!("no such file: {:?}", path))?;
        String::from_utf8(entry.contents.clone())
            .map_err(|e| anyhow!("file {:?} is not UTF-8: {}", path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn file_info(&self, path: &Path) -> Result<FileInfo> {
        let files = self.files.lock().unwrap();
        let entry = files
            .get(path)
            .ok_or_else(|| anyhow!("no such file: {:?}", path))?;
        Ok(FileInfo {
            mod_time: entry.mod_time,
        })
    }
}
