// src/engine/runtime.rs

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::Result;

use super::dispatch::{DispatchOutcome, Dispatcher};
use super::RuntimeEvent;

/// Receives claimed groups and runs each one on its own task.
///
/// Runs of different groups proceed concurrently; steps within a run are
/// sequential (see `Pipeline::exec`).
pub struct Runtime {
    dispatcher: Arc<Dispatcher>,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    in_flight: JoinSet<(String, DispatchOutcome)>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("dispatcher", &self.dispatcher)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(dispatcher: Arc<Dispatcher>, event_rx: mpsc::Receiver<RuntimeEvent>) -> Self {
        Self {
            dispatcher,
            event_rx,
            in_flight: JoinSet::new(),
        }
    }

    /// Main event loop.
    ///
    /// - `GroupReady` starts a dispatch task.
    /// - `ShutdownRequested` returns immediately, abandoning in-flight runs.
    /// - When every sender is gone, waits for in-flight runs and returns.
    ///
    /// Returns the outcome of every run that completed, keyed by group id.
    pub async fn run(mut self) -> Result<Vec<(String, DispatchOutcome)>> {
        info!("groupwatch runtime started");
        let mut finished = Vec::new();

        loop {
            tokio::select! {
                event = self.event_rx.recv() => match event {
                    Some(RuntimeEvent::GroupReady(group)) => {
                        debug!(id = %group.id, files = group.files.len(), "dispatching group");
                        let dispatcher = Arc::clone(&self.dispatcher);
                        self.in_flight.spawn(async move {
                            let id = group.id.clone();
                            let outcome = dispatcher.dispatch(group).await;
                            (id, outcome)
                        });
                    }
                    Some(RuntimeEvent::ShutdownRequested) => {
                        info!(in_flight = self.in_flight.len(), "shutdown requested; stopping runtime");
                        self.in_flight.abort_all();
                        return Ok(finished);
                    }
                    None => {
                        info!("runtime event channel closed; waiting for in-flight runs");
                        break;
                    }
                },
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    Self::collect(joined, &mut finished);
                }
            }
        }

        while let Some(joined) = self.in_flight.join_next().await {
            Self::collect(joined, &mut finished);
        }

        info!("runtime exiting");
        Ok(finished)
    }

    fn collect(
        joined: std::result::Result<(String, DispatchOutcome), tokio::task::JoinError>,
        finished: &mut Vec<(String, DispatchOutcome)>,
    ) {
        match joined {
            Ok(result) => finished.push(result),
            Err(err) => warn!(error = %err, "dispatch task ended abnormally"),
        }
    }
}
