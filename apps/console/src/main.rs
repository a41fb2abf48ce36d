mod commands;
mod config;
mod render;
mod shell;

use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{HttpBackend, KycClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::ConsoleCommand;
use config::{load_settings, DEFAULT_CONFIG_FILE};
use shell::Shell;

#[derive(Parser, Debug)]
#[command(name = "kyc-console", about = "Farmer eKYC agent and manager console")]
struct Args {
    /// Path to an optional TOML settings file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    stale_time_secs: Option<u64>,
    /// Route opened on start.
    #[arg(long, default_value = "/")]
    start: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(url) = args.backend_url {
        settings.backend_url = url;
    }
    if let Some(secs) = args.stale_time_secs {
        settings.stale_time_secs = secs;
    }

    let backend = HttpBackend::new(&settings.backend_url)
        .with_context(|| format!("invalid backend url {}", settings.backend_url))?;
    info!(endpoint = %backend.endpoint(), "using backend");

    let client = KycClient::in_memory(settings.cache_options());
    client.connect(Arc::new(backend)).await;
    let mut shell = Shell::new(client);

    print!("{}", shell.open(&args.start).await);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match ConsoleCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => print!("{}", shell.execute(command).await),
            Err(err) => println!("{err}"),
        }
    }
    Ok(())
}
