// src/watch/mod.rs

//! Polling watch loop.
//!
//! Change notifications are not reliable on the network filesystems this
//! runs against, so the tree is enumerated in full on a fixed interval and
//! the group tracker decides what changed.

pub mod poller;

pub use poller::{spawn_poller, PollOptions};
