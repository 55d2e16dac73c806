// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `CommandRunner` trait and the `ProcessRunner`
//!   used in production, which tests replace with a recording fake.

pub mod backend;

pub use backend::{CommandOutput, CommandRunner, ProcessRunner};
