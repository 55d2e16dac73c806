// src/engine/dispatch.rs

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::OutputSection;
use crate::exec::CommandRunner;
use crate::group::{file_stem, ClaimedGroup};
use crate::pipeline::{Context, Pipeline, Scalar};
use crate::qualify::Qualifier;

/// What happened to one claimed group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Processed,
    /// The quality gate rejected the group; no step ran.
    Disqualified,
    /// A step or variable failed; the message includes captured output.
    Failed(String),
}

/// Build the context a pipeline run starts from.
///
/// `Id`, `Version`, `OutputDir`, and for each file `<prefix>` (full path)
/// and `<prefix>_Name` (filename without extension).
pub fn seed_context(group: &ClaimedGroup, output: &OutputSection) -> Context {
    let mut ctx = Context::new();
    ctx.insert("Id".to_string(), Scalar::from(group.id.as_str()));
    ctx.insert("Version".to_string(), Scalar::from(output.version.as_str()));
    ctx.insert("OutputDir".to_string(), Scalar::from(output.dir.as_str()));

    for file in &group.files {
        ctx.insert(
            file.prefix.clone(),
            Scalar::String(file.path.to_string_lossy().into_owned()),
        );
        ctx.insert(
            format!("{}_Name", file.prefix),
            Scalar::from(file_stem(&file.name)),
        );
    }

    ctx
}

/// Runs the pipeline for claimed groups. Shared read-only by all runs.
pub struct Dispatcher {
    pipeline: Arc<Pipeline>,
    runner: Arc<dyn CommandRunner>,
    qualifier: Arc<dyn Qualifier>,
    output: OutputSection,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("steps", &self.pipeline.steps().len())
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        pipeline: Arc<Pipeline>,
        runner: Arc<dyn CommandRunner>,
        qualifier: Arc<dyn Qualifier>,
        output: OutputSection,
    ) -> Self {
        Self {
            pipeline,
            runner,
            qualifier,
            output,
        }
    }

    /// Process one claimed group. Never retried.
    pub async fn dispatch(&self, group: ClaimedGroup) -> DispatchOutcome {
        if let Some(file) = group.representative() {
            match self.qualifier.qualifies(&file.path).await {
                Ok(true) => {}
                Ok(false) => {
                    info!(id = %group.id, "group does not qualify; ignoring");
                    return DispatchOutcome::Disqualified;
                }
                Err(err) => {
                    warn!(id = %group.id, error = %err, "quality check failed; processing anyway");
                }
            }
        }

        let mut ctx = seed_context(&group, &self.output);
        match self.pipeline.exec(&mut ctx, self.runner.as_ref()).await {
            Ok(()) => {
                info!(id = %group.id, "processing success");
                DispatchOutcome::Processed
            }
            Err(err) => {
                error!(
                    id = %group.id,
                    error = %err,
                    output = %err.output(),
                    "pipeline failed"
                );
                DispatchOutcome::Failed(format!("{err}\n{}", err.output()))
            }
        }
    }
}
