// src/watch/poller.rs

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::engine::RuntimeEvent;
use crate::group::GroupTracker;

#[derive(Debug, Clone)]
pub struct PollOptions {
    pub root: PathBuf,
    pub period: Duration,
    /// Stop after this many rounds; `None` polls forever.
    pub max_rounds: Option<u64>,
}

/// Spawn the polling loop.
///
/// The loop owns `tracker` for its whole lifetime. Each round enumerates the
/// tree on the blocking pool, then sends every claimed group to the runtime.
/// The loop ends when `max_rounds` is reached or the runtime hangs up;
/// dropping `runtime_tx` then lets the runtime drain and exit.
pub fn spawn_poller(
    mut tracker: GroupTracker,
    options: PollOptions,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(root = ?options.root, period = ?options.period, "directory polling started");
        let mut rounds = 0u64;

        loop {
            let root = options.root.clone();
            let joined = tokio::task::spawn_blocking(move || {
                let result = tracker.scan(&root);
                (tracker, result)
            })
            .await;

            let result = match joined {
                Ok((returned, result)) => {
                    tracker = returned;
                    result
                }
                Err(err) => {
                    error!(error = %err, "scan task panicked; stopping poller");
                    return;
                }
            };

            match result {
                Ok(groups) => {
                    for group in groups {
                        debug!(id = %group.id, "sending claimed group to runtime");
                        if runtime_tx.send(RuntimeEvent::GroupReady(group)).await.is_err() {
                            info!("runtime closed; stopping poller");
                            return;
                        }
                    }
                }
                Err(err) => {
                    warn!(root = ?options.root, error = %err, "directory scan failed; skipping round");
                }
            }

            rounds += 1;
            if options.max_rounds.is_some_and(|max| rounds >= max) {
                debug!(rounds, "round limit reached; stopping poller");
                return;
            }

            tokio::time::sleep(options.period).await;
        }
    })
}
