// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod group;
pub mod logging;
pub mod pipeline;
pub mod qualify;
pub mod types;
pub mod watch;

use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::ConfigFile;
use crate::engine::{Dispatcher, Runtime, RuntimeEvent};
use crate::exec::{CommandRunner, ProcessRunner};
use crate::fs::RealFileSystem;
use crate::group::{GroupTracker, TrackerSettings};
use crate::pipeline::Pipeline;
use crate::qualify::{AlwaysQualifies, NightDataQualifier, Qualifier};
use crate::watch::{spawn_poller, PollOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and template compilation (fatal on error)
/// - the group tracker, owned by the polling loop
/// - the runtime that dispatches claimed groups
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let launched_at = SystemTime::now();
    let cfg = load_and_validate(&args.config)?;
    let pipeline = Arc::new(Pipeline::prepare(&cfg.pipeline, &cfg.template)?);

    if args.dry_run {
        print_dry_run(&cfg, &pipeline);
        return Ok(());
    }

    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new());
    let qualifier = build_qualifier(&cfg, Arc::clone(&runner))?;
    let dispatcher = Arc::new(Dispatcher::new(
        pipeline,
        runner,
        qualifier,
        cfg.output.clone(),
    ));

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let tracker = GroupTracker::new(
        TrackerSettings {
            extension: cfg.watch.extension.clone(),
            required: cfg.watch.required.clone(),
            naming: cfg.naming.clone(),
            launched_at,
        },
        Arc::new(RealFileSystem),
    );
    info!(period = ?cfg.watch.period, "directory check period");
    let _poller = spawn_poller(
        tracker,
        PollOptions {
            root: cfg.watch.root.clone(),
            period: cfg.watch.period,
            max_rounds: None,
        },
        rt_tx.clone(),
    );

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }
    drop(rt_tx);

    let runtime = Runtime::new(dispatcher, rt_rx);
    runtime.run().await?;
    Ok(())
}

/// Pick the quality gate from `[qualify]`.
pub fn build_qualifier(
    cfg: &ConfigFile,
    runner: Arc<dyn CommandRunner>,
) -> Result<Arc<dyn Qualifier>> {
    let qualifier: Arc<dyn Qualifier> = match &cfg.qualify {
        Some(section) => Arc::new(NightDataQualifier::new(section.h5dump.clone(), runner)?),
        None => Arc::new(AlwaysQualifies),
    };
    Ok(qualifier)
}

/// Simple dry-run output: print watch settings, variables and steps.
fn print_dry_run(cfg: &ConfigFile, pipeline: &Pipeline) {
    println!("groupwatch dry-run");
    println!("  watch.root = {}", cfg.watch.root.display());
    println!("  watch.period = {:?}", cfg.watch.period);
    println!("  watch.extension = {}", cfg.watch.extension);
    println!("  watch.required = {:?}", cfg.watch.required);
    println!(
        "  naming = separator {:?}, tokens {}..{} of at least {}",
        cfg.naming.separator, cfg.naming.id_start, cfg.naming.id_end, cfg.naming.min_tokens
    );
    println!("  output.dir = {}", cfg.output.dir);
    println!("  output.version = {}", cfg.output.version);
    match &cfg.qualify {
        Some(q) => println!("  qualify.h5dump = {}", q.h5dump),
        None => println!("  qualify = (every group qualifies)"),
    }
    println!();

    println!("variables ({}):", pipeline.variables().len());
    for var in pipeline.variables() {
        println!("  - {} = {:?}", var.name(), var.raw());
    }

    println!("steps ({}):", pipeline.steps().len());
    for (raw, step) in cfg.pipeline.steps.iter().zip(pipeline.steps()) {
        println!("  - {}", step.name());
        println!("      command: {}", raw.command());
        for (var, value) in raw.variables() {
            println!("      {var} = {value:?}");
        }
    }

    debug!("dry-run complete (no execution)");
}
