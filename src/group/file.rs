// src/group/file.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::Result;

use crate::fs::FileSystem;

/// One required file inside a group, with the size and mtime last recorded
/// by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Required prefix this file satisfies.
    pub prefix: String,
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Files sharing one id, collected until every required kind is present.
#[derive(Debug, Clone)]
pub struct FileGroup {
    pub id: String,
    /// Directory of the first file discovered for this group.
    pub dir: PathBuf,
    /// Required prefix → file.
    pub files: BTreeMap<String, TrackedFile>,
    /// Number of distinct required kinds present.
    pub found: usize,
    /// Newest recorded modification time among the tracked files.
    pub latest_modified: SystemTime,
    pub ready: bool,
    /// Scan round in which `found` reached the required count.
    pub(crate) completed_round: Option<u64>,
    /// Last round in which the stability check ran.
    pub(crate) checked_round: Option<u64>,
}

impl FileGroup {
    pub fn new(id: impl Into<String>, dir: PathBuf) -> Self {
        Self {
            id: id.into(),
            dir,
            files: BTreeMap::new(),
            found: 0,
            latest_modified: SystemTime::UNIX_EPOCH,
            ready: false,
            completed_round: None,
            checked_round: None,
        }
    }

    /// True iff any tracked file's live size or mtime differs from the
    /// recorded one. A stat failure is returned as an error.
    pub fn any_changed(&self, fs: &dyn FileSystem) -> Result<bool> {
        for file in self.files.values() {
            let live = fs.stat(&file.path)?;
            if live.size != file.size || live.modified != file.modified {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// A group that passed the completeness and stability checks.
///
/// Produced exactly once per id; `files` follows the configured order of
/// required prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedGroup {
    pub id: String,
    pub dir: PathBuf,
    pub files: Vec<TrackedFile>,
    pub latest_modified: SystemTime,
}

impl ClaimedGroup {
    /// File handed to the quality gate: the one for the first required prefix.
    pub fn representative(&self) -> Option<&TrackedFile> {
        self.files.first()
    }
}
