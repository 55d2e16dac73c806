// src/fs/mod.rs

//! Directory enumeration and stat primitives.
//!
//! The group tracker and the watch loop only see this trait, so tests can
//! drive them with [`mock::MockFileSystem`] and control sizes and
//! modification times precisely.

use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

pub mod mock;

/// Size and modification time of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: SystemTime,
}

/// A regular file found while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub stat: FileStat,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Recursively list every regular file under `root`.
    fn walk(&self, root: &Path) -> Result<Vec<FileEntry>>;

    /// Current size and modification time of `path`.
    fn stat(&self, path: &Path) -> Result<FileStat>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn walk(&self, root: &Path) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();
        let mut stack = vec![root.to_path_buf()];

        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).with_context(|| format!("reading dir {:?}", dir))? {
                let entry = entry.with_context(|| format!("reading entry in {:?}", dir))?;
                let path = entry.path();

                // Files may vanish between listing and stat (renames, temp
                // files); those are not enumeration errors.
                let file_type = match entry.file_type() {
                    Ok(t) => t,
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(e).with_context(|| format!("file type of {:?}", path)),
                };

                if file_type.is_dir() {
                    stack.push(path);
                    continue;
                }
                if !file_type.is_file() {
                    continue;
                }

                let meta = match entry.metadata() {
                    Ok(m) => m,
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(e).with_context(|| format!("stat {:?}", path)),
                };
                let modified = meta
                    .modified()
                    .with_context(|| format!("modification time of {:?}", path))?;

                entries.push(FileEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path,
                    stat: FileStat {
                        size: meta.len(),
                        modified,
                    },
                });
            }
        }

        Ok(entries)
    }

    fn stat(&self, path: &Path) -> Result<FileStat> {
        let meta = fs::metadata(path).with_context(|| format!("stat {:?}", path))?;
        let modified = meta
            .modified()
            .with_context(|| format!("modification time of {:?}", path))?;
        Ok(FileStat {
            size: meta.len(),
            modified,
        })
    }
}
