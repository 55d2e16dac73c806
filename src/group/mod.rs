// src/group/mod.rs

//! Tracking of incrementally arriving file groups.
//!
//! - [`naming`] derives a group id from a filename.
//! - [`file`] holds the per-file and per-group records.
//! - [`tracker`] is the registry and the completeness/stability state
//!   machine that claims each group at most once.

pub mod file;
pub mod naming;
pub mod tracker;

pub use file::{ClaimedGroup, FileGroup, TrackedFile};
pub use naming::{file_stem, NameError, NamingScheme};
pub use tracker::{Discovery, GroupTracker, IgnoreReason, TrackerSettings};
