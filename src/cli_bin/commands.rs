//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::*;
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use mattertime::io::{read_to_string, resolve_files, write_atomic};
use mattertime::{
    upsert_key, validate_entry, FileChangeStatus, Settings, Stamper, TriggerSource, WatchConfig,
    Watcher,
};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Execute the upsert command
pub fn upsert_command(args: UpsertArgs) -> Result<()> {
    debug!("Executing upsert command with args: {:?}", args);
    validate_entry(&args.key, &args.value)?;

    if args.files.is_empty() {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read stdin")?;
        let output = upsert_key(&content, &args.key, &args.value);
        std::io::stdout().write_all(output.as_bytes())?;
        return Ok(());
    }

    let mut modified_count = 0;
    for file in resolve_files(&args.files)? {
        let content = read_to_string(&file)?;
        let output = upsert_key(&content, &args.key, &args.value);

        if args.stdout {
            print!("{}", output);
            continue;
        }
        if output == content {
            debug!("Unchanged: {}", file.display());
            continue;
        }
        if args.write_options.dry_run {
            println!("--- Dry run: {} ---", file.display());
            println!("{}", output);
            continue;
        }

        write_atomic(&file, &output)
            .with_context(|| format!("failed to write {}", file.display()))?;
        modified_count += 1;
        info!("Updated: {}", file.display());
    }

    info!("Modified {} files", modified_count);
    Ok(())
}

/// Execute the stamp command
pub fn stamp_command(args: StampArgs, settings: Settings) -> Result<()> {
    debug!("Executing stamp command with args: {:?}", args);
    let stamper = create_stamper(settings, &args.write_options)?;

    let files = resolve_files(&args.files)?;
    if files.is_empty() {
        warn!("No files found to process");
        return Ok(());
    }

    let mut failures = 0;
    for file in &files {
        match stamper.handle_file_change(&args.root, file, TriggerSource::Modify) {
            FileChangeStatus::Ok { changes } => {
                for change in changes {
                    report_change(file, &change.to_string(), args.write_options.dry_run);
                }
            }
            FileChangeStatus::Ignored(reason) => {
                debug!("Ignored {} ({:?})", file.display(), reason);
            }
            FileChangeStatus::Error(message) => {
                failures += 1;
                eprintln!("{}: {}", file.display(), message);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files could not be stamped", failures, files.len());
    }
    Ok(())
}

/// Execute the update-all command
pub fn update_all_command(args: UpdateAllArgs, settings: Settings) -> Result<()> {
    debug!("Executing update-all command with args: {:?}", args);
    let stamper = create_stamper(settings, &args.write_options)?;

    let cancel = stop_on_ctrl_c()?;
    let report = stamper
        .update_all(&args.root, &cancel)
        .context("bulk update aborted")?;

    info!(
        "Processed {}/{} files: {} changed, {} ignored, {} failed",
        report.processed,
        report.total,
        report.changed,
        report.ignored,
        report.errors.len()
    );
    if report.cancelled {
        warn!(
            "Cancelled, {} files left untouched",
            report.total - report.processed
        );
    }
    for (path, message) in &report.errors {
        eprintln!("{}: {}", path, message);
    }
    if !report.errors.is_empty() {
        bail!("{} files could not be updated", report.errors.len());
    }
    Ok(())
}

/// Execute the watch command; runs until Ctrl-C
pub fn watch_command(args: WatchArgs, settings: Settings) -> Result<()> {
    debug!("Executing watch command with args: {:?}", args);
    if !args.root.is_dir() {
        bail!("{} is not a directory", args.root.display());
    }

    let stamper = Stamper::new(settings)?;
    let config = WatchConfig {
        debounce: Duration::from_millis(args.debounce_ms),
        poll_interval: Duration::from_millis(args.poll_ms.max(1)),
    };
    let mut watcher = Watcher::new(&args.root, stamper, config)?;
    let stop = stop_on_ctrl_c()?;
    watcher.run(&stop)?;
    Ok(())
}

/// Execute the config subcommands
pub fn config_command(command: ConfigCommand, settings: Settings) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigCommand::Init { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Settings::default().save(&path)?;
            info!("Wrote default settings to {}", path.display());
        }
    }
    Ok(())
}

/// Flag that is set once the process receives Ctrl-C
fn stop_on_ctrl_c() -> Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the signal handler")?;

    thread::spawn(move || {
        runtime.block_on(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupted, finishing the current file");
                    flag.store(true, Ordering::Relaxed);
                }
                Err(e) => warn!("Cannot listen for Ctrl-C: {}", e),
            }
        });
    });
    Ok(stop)
}

fn create_stamper(settings: Settings, write_options: &WriteOptions) -> Result<Stamper> {
    let stamper = Stamper::new(settings).context("invalid settings")?;
    Ok(stamper.with_dry_run(write_options.dry_run))
}

fn report_change(file: &Path, change: &str, dry_run: bool) {
    if dry_run {
        println!("{}: would set {}", file.display(), change);
    } else {
        println!("{}: {}", file.display(), change);
    }
}
