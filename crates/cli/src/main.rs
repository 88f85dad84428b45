// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kvipc - cross-process mutexes and data slots over Redis

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{admin, mutex, slot, status, Outcome, EXIT_MISUSE};
use kvipc_core::{IpcConfig, LoggingConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(
    name = "kvipc",
    version,
    about = "Cross-process mutexes and data slots over Redis"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "KVIPC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether the store is usable
    Status(status::StatusArgs),
    /// Run a command while holding a resource's mutex
    Exec(mutex::ExecArgs),
    /// Force-delete a resource's mutex
    Release(mutex::ReleaseArgs),
    /// Check whether a data slot holds a value
    Has(slot::SlotArgs),
    /// Print a data slot's value as JSON
    Get(slot::SlotArgs),
    /// Store a JSON value in a data slot
    Set(slot::SetArgs),
    /// Delete keys under the key prefix
    Clean(admin::CleanArgs),
    /// Flush the whole store namespace
    Reinit(admin::ReinitArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_MISUSE)
        }
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    let config = load_config(cli.config.as_deref())?;
    let _log_guard = setup_logging(&config.logging)?;
    tracing::debug!(config = ?cli.config, "configuration loaded");

    let mut coordinator = kvipc_engine::open(&config)?;

    match cli.command {
        Commands::Status(args) => Ok(status::status(&mut coordinator, args)),
        Commands::Exec(args) => mutex::exec(&mut coordinator, args),
        Commands::Release(args) => Ok(mutex::release(&mut coordinator, args)),
        Commands::Has(args) => Ok(slot::has(&mut coordinator, args)),
        Commands::Get(args) => Ok(slot::get(&mut coordinator, args)),
        Commands::Set(args) => slot::set(&mut coordinator, args),
        Commands::Clean(args) => Ok(admin::clean(&mut coordinator, args)),
        Commands::Reinit(args) => admin::reinit(&mut coordinator, args),
    }
}

fn load_config(path: Option<&Path>) -> Result<IpcConfig> {
    match path {
        Some(path) => IpcConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display())),
        None => {
            let config = IpcConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Install the global subscriber; the returned guard flushes file output
fn setup_logging(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let Some(path) = &logging.file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("log path has no file name: {}", path.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    Ok(Some(guard))
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
