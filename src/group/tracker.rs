// src/group/tracker.rs

//! Group registry and readiness detection.
//!
//! A group moves through three phases:
//! - collecting: some required kinds are still missing,
//! - complete: every kind is present; from the next scan round on, the
//!   recorded sizes/mtimes are compared against live stats once per round,
//! - claimed: a round found no change. The id is remembered forever and the
//!   group is handed out exactly once.
//!
//! The tracker has a single owner (the watch loop); it is not shared.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::group::file::{ClaimedGroup, FileGroup, TrackedFile};
use crate::group::naming::NamingScheme;

/// Static inputs of the tracker.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    /// Extension without the dot.
    pub extension: String,
    /// Ordered required prefixes.
    pub required: Vec<String>,
    pub naming: NamingScheme,
    /// Files older than this never open a group, and groups whose newest
    /// file is older are claimed without being dispatched.
    pub launched_at: SystemTime,
}

/// Why a discovered file was not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    WrongExtension,
    NotRequired,
    MalformedName,
    AlreadyClaimed,
    PredatesLaunch,
    /// Another file already fills this kind in the group.
    KindTaken,
}

/// Result of feeding one file into the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Ignored(IgnoreReason),
    /// File recorded; no readiness decision this time.
    Tracked { id: String },
    /// Group is complete but something changed since the last round.
    Unstable { id: String },
    /// The stability check could not stat a file; retried next round.
    CheckFailed { id: String },
    /// Group is stable and claimed; it should be dispatched.
    Claimed(ClaimedGroup),
    /// Group is stable and claimed, but its newest file predates launch.
    Stale(ClaimedGroup),
}

pub struct GroupTracker {
    settings: TrackerSettings,
    fs: Arc<dyn FileSystem>,
    groups: HashMap<String, FileGroup>,
    claimed: HashSet<String>,
    round: u64,
}

impl std::fmt::Debug for GroupTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupTracker")
            .field("open", &self.groups.len())
            .field("claimed", &self.claimed.len())
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}

impl GroupTracker {
    pub fn new(settings: TrackerSettings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings,
            fs,
            groups: HashMap::new(),
            claimed: HashSet::new(),
            round: 0,
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Start a new scan round. Stability is only judged against values
    /// recorded in an earlier round.
    pub fn begin_round(&mut self) {
        self.round += 1;
    }

    pub fn group(&self, id: &str) -> Option<&FileGroup> {
        self.groups.get(id)
    }

    pub fn is_claimed(&self, id: &str) -> bool {
        self.claimed.contains(id)
    }

    pub fn open_groups(&self) -> usize {
        self.groups.len()
    }

    /// Run one full round: enumerate `root` and feed every file in.
    ///
    /// Returns the groups claimed for dispatch. An enumeration error skips
    /// the round and is returned to the caller.
    pub fn scan(&mut self, root: &Path) -> Result<Vec<ClaimedGroup>> {
        let entries = self.fs.walk(root)?;
        self.begin_round();

        let mut ready = Vec::new();
        for entry in entries {
            let outcome = self.discover(
                &entry.path,
                &entry.name,
                entry.stat.size,
                entry.stat.modified,
            );
            if let Discovery::Claimed(group) = outcome {
                ready.push(group);
            }
        }

        debug!(
            round = self.round,
            open = self.groups.len(),
            claimed = ready.len(),
            "scan round finished"
        );
        Ok(ready)
    }

    /// Feed one file observation into the tracker.
    pub fn discover(
        &mut self,
        path: &Path,
        name: &str,
        size: u64,
        modified: SystemTime,
    ) -> Discovery {
        let extension = Path::new(name).extension().and_then(|e| e.to_str());
        if extension != Some(self.settings.extension.as_str()) {
            return Discovery::Ignored(IgnoreReason::WrongExtension);
        }

        let Some(prefix) = self.required_prefix(name) else {
            return Discovery::Ignored(IgnoreReason::NotRequired);
        };

        let id = match self.settings.naming.group_id(name) {
            Ok(id) => id,
            Err(err) => {
                warn!(path = ?path, error = %err, "failed to extract id for a required file");
                return Discovery::Ignored(IgnoreReason::MalformedName);
            }
        };

        if self.claimed.contains(&id) {
            return Discovery::Ignored(IgnoreReason::AlreadyClaimed);
        }

        if !self.groups.contains_key(&id) {
            if modified <= self.settings.launched_at {
                return Discovery::Ignored(IgnoreReason::PredatesLaunch);
            }
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            debug!(%id, ?dir, "opening group");
            self.groups.insert(id.clone(), FileGroup::new(id.clone(), dir));
        }

        let mut outcome = Discovery::Tracked { id: id.clone() };
        if self.check_due(&id) {
            match self.check_stability(&id) {
                Some(decided @ (Discovery::Claimed(_) | Discovery::Stale(_))) => return decided,
                Some(other) => outcome = other,
                None => {}
            }
        }

        if let Some(reason) = self.record(&id, prefix, path, name, size, modified) {
            return Discovery::Ignored(reason);
        }
        outcome
    }

    fn required_prefix(&self, name: &str) -> Option<String> {
        self.settings
            .required
            .iter()
            .find(|p| name.starts_with(p.as_str()))
            .cloned()
    }

    /// The check runs at most once per round, and only for groups that were
    /// already complete before this round started.
    fn check_due(&self, id: &str) -> bool {
        let Some(group) = self.groups.get(id) else {
            return false;
        };
        group.found == self.settings.required.len()
            && group.completed_round.is_some_and(|r| r < self.round)
            && group.checked_round != Some(self.round)
    }

    fn check_stability(&mut self, id: &str) -> Option<Discovery> {
        let round = self.round;
        let group = self.groups.get_mut(id)?;
        group.checked_round = Some(round);

        match group.any_changed(self.fs.as_ref()) {
            Err(err) => {
                warn!(%id, error = %err, "failed to check group for changes");
                Some(Discovery::CheckFailed { id: id.to_string() })
            }
            Ok(true) => {
                debug!(%id, "group still changing");
                Some(Discovery::Unstable { id: id.to_string() })
            }
            Ok(false) => Some(self.claim(id)),
        }
    }

    /// Mark the group ready and move it out of the registry.
    fn claim(&mut self, id: &str) -> Discovery {
        // Claimed before anything else so the id can never be handed out twice.
        self.claimed.insert(id.to_string());
        let Some(mut group) = self.groups.remove(id) else {
            return Discovery::Ignored(IgnoreReason::AlreadyClaimed);
        };
        group.ready = true;

        let files = self
            .settings
            .required
            .iter()
            .filter_map(|prefix| group.files.remove(prefix))
            .collect();
        let claimed = ClaimedGroup {
            id: group.id,
            dir: group.dir,
            files,
            latest_modified: group.latest_modified,
        };

        info!(id = %claimed.id, "group found");
        if claimed.latest_modified > self.settings.launched_at {
            Discovery::Claimed(claimed)
        } else {
            info!(
                id = %claimed.id,
                latest_modified = ?claimed.latest_modified,
                "group last modification time too old; skipping"
            );
            Discovery::Stale(claimed)
        }
    }

    /// Register or refresh a file. Returns a reason if it was rejected.
    fn record(
        &mut self,
        id: &str,
        prefix: String,
        path: &Path,
        name: &str,
        size: u64,
        modified: SystemTime,
    ) -> Option<IgnoreReason> {
        let required = self.settings.required.len();
        let round = self.round;
        let group = self.groups.get_mut(id)?;

        match group.files.get_mut(&prefix) {
            Some(existing) if existing.name != name => {
                debug!(%id, %name, kept = %existing.name, "kind already present; ignoring file");
                return Some(IgnoreReason::KindTaken);
            }
            Some(existing) => {
                existing.size = size;
                existing.modified = modified;
            }
            None => {
                info!(%id, %name, "found");
                group.files.insert(
                    prefix.clone(),
                    TrackedFile {
                        prefix,
                        name: name.to_string(),
                        path: path.to_path_buf(),
                        size,
                        modified,
                    },
                );
                group.found += 1;
                if group.found == required {
                    group.completed_round = Some(round);
                }
            }
        }

        // Recomputed rather than maxed: a copy that preserves old mtimes
        // can move a file's time backwards.
        group.latest_modified = group
            .files
            .values()
            .map(|f| f.modified)
            .max()
            .unwrap_or(SystemTime::UNIX_EPOCH);
        None
    }
}
