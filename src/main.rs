use anyhow::{Context as _, Result};
use clap::Parser;
use log::info;
use std::sync::Arc;

use terrui::api::{TfeApi, TfeClient};
use terrui::cli::commands::launch_tui;
use terrui::cli::Cli;
use terrui::config::Config;
use terrui::tui::{Context, PageController};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger to file (truncate on each run); the terminal belongs to the UI
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&cli.log_file)
        .with_context(|| format!("failed to open log file {}", cli.log_file.display()))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting terrui {}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let client: Arc<dyn TfeApi> = Arc::new(TfeClient::from_env()?);
    let ctx = Context::new(config, client);

    let mut controller = PageController::new(ctx);
    controller.start(cli.start.as_deref());

    launch_tui(&mut controller).await
}
