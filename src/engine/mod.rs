// src/engine/mod.rs

//! Dispatch side of groupwatch.
//!
//! The watch loop claims groups and sends them here as [`RuntimeEvent`]s.
//! [`runtime::Runtime`] owns the receiving end and starts one task per
//! claimed group; [`dispatch::Dispatcher`] builds the seed context, applies
//! the quality gate and runs the pipeline.

use crate::group::ClaimedGroup;

/// Events flowing into the runtime.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A group was claimed and should be processed once.
    GroupReady(ClaimedGroup),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod dispatch;
pub mod runtime;

pub use dispatch::{seed_context, DispatchOutcome, Dispatcher};
pub use runtime::Runtime;
