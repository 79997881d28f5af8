use anyhow::{Context, Result};
use clap::Parser;
use core_library::FileCollection;
use core_runtime::config::{default_file_system, CoreConfig};
use core_runtime::logging::{init_logging, LogLevel, LoggingConfig};
use core_sync::{clean_orphan_records, SyncConfig, SyncCoordinator};
use provider_spotify::SpotifyConnector;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};

mod args;
mod console;

use args::{Cli, Commands};

const PUSH_WARNING: &str = "WARNING: Your remote spotify playlist will be replaced";

#[core_async::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(logging_config(&cli)) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn logging_config(cli: &Cli) -> LoggingConfig {
    let level = match cli.verbose {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };

    let config = LoggingConfig::default()
        .with_format(cli.log_format)
        .with_level(level);
    match &cli.log_filter {
        Some(filter) => config.with_filter(filter.clone()),
        None => config,
    }
}

fn build_coordinator(cli: &Cli) -> Result<SyncCoordinator> {
    let token = cli
        .token
        .as_deref()
        .context("An access token is required: pass --token or set SPOTIFY_ACCESS_TOKEN")?;

    let config = CoreConfig::builder()
        .root_dir(cli.root.clone())
        .access_token(token)
        .build()
        .context("Invalid configuration")?;
    debug!(config = ?config, "Loaded configuration");

    let local = Arc::new(FileCollection::new(
        config.file_system.clone(),
        config.root_dir.clone(),
    ));
    let remote = Arc::new(
        SpotifyConnector::new(config.http_client.clone(), config.access_token.clone())
            .with_timeout(config.http_timeout),
    );
    Ok(SyncCoordinator::new(local, remote, SyncConfig::default()))
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Pull => {
            let coordinator = build_coordinator(cli)?;
            eprintln!("now loading ...");
            let report = coordinator.pull().await.context("pull failed")?;
            console::render_pull(&mut io::stdout().lock(), &report)?;
        }
        Commands::Compare => {
            let coordinator = build_coordinator(cli)?;
            eprintln!("now loading ...");
            let diff = coordinator.compare().await.context("compare failed")?;
            console::render_diff(&mut io::stdout().lock(), &diff)?;
        }
        Commands::Push { yes } => {
            let coordinator = build_coordinator(cli)?;
            let confirmed = *yes
                || console::ask_for_confirmation(
                    PUSH_WARNING,
                    &mut io::stdin().lock(),
                    &mut io::stdout(),
                )?;
            if !confirmed {
                return Ok(());
            }

            eprintln!("now loading ...");
            let report = coordinator.push().await.context("push failed")?;
            console::render_cleaned(&mut io::stderr(), &report.cleaned)?;
            console::render_push(&mut io::stdout().lock(), &report)?;
        }
        Commands::Clean => {
            let local = FileCollection::new(default_file_system()?, cli.root.clone());
            let cleaned = clean_orphan_records(&local)
                .await
                .context("clean failed")?;
            console::render_cleaned(&mut io::stderr(), &cleaned)?;
        }
    }
    Ok(())
}
