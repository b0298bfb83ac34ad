//! PowerShare console - Main Entry Point

use anyhow::Context;
use clap::Parser;
use powershare::cli::{Cli, execute, report_session_events};
use powershare::connect;
use powershare_application::SessionEvents;
use powershare_infrastructure::AppConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load(cli.config.as_deref()).context("could not load configuration")?;

    let events = SessionEvents::new();
    let notices = tokio::spawn(report_session_events(events.subscribe(), std::io::stderr()));

    let console = connect(&config, events).await?;
    let outcome = execute(cli.command, &console, &config).await;

    // Dropping the console closes the event channel and ends the reporter.
    drop(console);
    let _ = notices.await;

    print!("{}", outcome?);
    Ok(())
}
