// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod prompt;
pub mod request;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate, ConfigFile};
use crate::engine::{Initiator, SessionOptions};
use crate::exec::{ActionRegistry, ActionSpec, ConsoleSink};
use crate::fs::{FileSystem, RealFileSystem};
use crate::prompt::{collect_request, DialoguerPrompter};
use crate::request::WatchRequest;
use crate::watch::path_utils::{resolve_paths, watch_targets};
use crate::watch::NotifyBackend;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading / interactive prompts
/// - action parsing against the built-in registry
/// - the notify-backed watch backend and the session initiator
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config = load_config(&args)?;
    let registry = Arc::new(ActionRegistry::with_builtins());

    let request = if args.interactive {
        collect_request(&mut DialoguerPrompter::new())?
    } else {
        WatchRequest::from_sources(&args, config.as_ref())?
    };
    let action = request.action_spec(&registry)?;

    if args.dry_run {
        print_dry_run(&request, &action, &RealFileSystem)?;
        return Ok(());
    }

    let backend = Arc::new(NotifyBackend::new()?);
    let initiator = Initiator::new(
        backend,
        Arc::new(RealFileSystem),
        Arc::clone(&registry),
        Arc::new(ConsoleSink),
    );

    let session = initiator.start(&request.paths, action, request.options())?;

    // Ctrl-C → cancel the session, which ends its loop.
    {
        let handle = session.handle();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; stopping");
            handle.cancel();
        });
    }

    session.run().await?;
    Ok(())
}

/// `--config` if given, otherwise `Pausewatch.toml` when it exists.
fn load_config(args: &CliArgs) -> Result<Option<ConfigFile>> {
    let path = match &args.config {
        Some(path) => PathBuf::from(path),
        None => {
            let default = default_config_path();
            if !default.is_file() {
                return Ok(None);
            }
            default
        }
    };

    debug!(?path, "loading config");
    Ok(Some(load_and_validate(&path)?))
}

/// Dry-run output: the per-file watch list and the parsed action.
fn print_dry_run(request: &WatchRequest, action: &ActionSpec, fs: &dyn FileSystem) -> Result<()> {
    let SessionOptions {
        watch_for_creations,
        recursive,
    } = request.options();
    let default_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    println!("pausewatch dry-run");
    println!("  action: {action:?}");
    println!("  watch_for_creations = {watch_for_creations}");
    println!("  recursive = {recursive}");
    println!();

    for root in resolve_paths(&request.paths, &default_dir) {
        let targets = watch_targets(fs, &root, recursive)?;
        println!("{} ({} watch(es)):", root.display(), targets.len());
        for target in targets {
            println!("  - {}", target.display());
        }
    }

    debug!("dry-run complete (nothing watched)");
    Ok(())
}
