// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — command-line scan host
//
// Entry point. Loads configuration, initialises logging, and runs the
// requested command.

mod cli;
mod services;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::human_errors::humanize_error;
use scanwerk_core::ScannerConfig;

use cli::{Cli, Command, ScanArgs};
use services::config_dir::default_config_path;
use services::output::{manifest_paths, write_payload, MANIFEST_FILE};
use services::scan_service::ScanService;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = match load_config(&config_path, cli.config.is_some()) {
        Ok(config) => config,
        Err(e) => return report(&e),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Scanwerk starting");

    let result = match cli.command {
        Command::Scan(args) => scan(&config, &args).await,
        Command::Config { init } => show_config(&config, &config_path, init),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// An explicit `--config` must load; the default path may be absent.
fn load_config(path: &Path, explicit: bool) -> Result<ScannerConfig> {
    if explicit {
        ScannerConfig::load(path)
    } else {
        Ok(ScannerConfig::load_or_default(path))
    }
}

async fn scan(config: &ScannerConfig, args: &ScanArgs) -> Result<()> {
    let service = ScanService::for_directory(
        config,
        &args.from,
        args.delay_ms.map(Duration::from_millis),
    );

    let Some(payload) = service.run(&args.to_arguments()).await? else {
        println!("Scan cancelled; nothing written.");
        return Ok(());
    };

    let manifest = write_payload(&args.out, &payload)?;
    for path in manifest_paths(&args.out, &manifest) {
        println!("{}", path.display());
    }
    println!("{}", args.out.join(MANIFEST_FILE).display());
    Ok(())
}

fn show_config(config: &ScannerConfig, path: &Path, init: bool) -> Result<()> {
    if init {
        config.persist(path)?;
        tracing::info!(path = %path.display(), "configuration written");
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn report(err: &ScanError) -> ExitCode {
    let human = humanize_error(err);
    eprintln!("error: {}", human.message);
    eprintln!("  {}", human.suggestion);
    tracing::debug!(code = err.code(), error = %err, "command failed");
    if err.is_validation() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
