// src/fs/mock.rs

use super::{FileEntry, FileStat, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

#[derive(Debug, Default)]
struct MockState {
    files: BTreeMap<PathBuf, FileStat>,
    broken_stat: HashSet<PathBuf>,
    broken_walk: bool,
}

/// In-memory filesystem with settable sizes and modification times.
///
/// Clones share state, so a test can keep one handle while the tracker or
/// watch loop owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create or overwrite a file entry.
    pub fn put_file(&self, path: impl AsRef<Path>, size: u64, modified: SystemTime) {
        self.lock()
            .files
            .insert(path.as_ref().to_path_buf(), FileStat { size, modified });
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.lock().files.remove(path.as_ref());
    }

    /// Make `stat` fail for `path` until [`MockFileSystem::heal_stat`].
    pub fn break_stat(&self, path: impl AsRef<Path>) {
        self.lock().broken_stat.insert(path.as_ref().to_path_buf());
    }

    pub fn heal_stat(&self, path: impl AsRef<Path>) {
        self.lock().broken_stat.remove(path.as_ref());
    }

    /// Make every `walk` fail (or succeed again).
    pub fn set_walk_broken(&self, broken: bool) {
        self.lock().broken_walk = broken;
    }
}

impl FileSystem for MockFileSystem {
    fn walk(&self, root: &Path) -> Result<Vec<FileEntry>> {
        let state = self.lock();
        if state.broken_walk {
            return Err(anyhow!("walk failed: {:?}", root));
        }

        Ok(state
            .files
            .iter()
            .filter(|(path, _)| path.starts_with(root))
            .map(|(path, stat)| FileEntry {
                path: path.clone(),
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                stat: *stat,
            })
            .collect())
    }

    fn stat(&self, path: &Path) -> Result<FileStat> {
        let state = self.lock();
        if state.broken_stat.contains(path) {
            return Err(anyhow!("stat failed: {:?}", path));
        }
        state
            .files
            .get(path)
            .copied()
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }
}
