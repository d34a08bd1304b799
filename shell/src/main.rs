//! `waymark`: edit map markers from the terminal.
//!
//! ```bash
//! WAYMARK_BACKEND=memory cargo run -p waymark-shell
//! ```

use anyhow::Context;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waymark_runtime::metrics::PrometheusMetrics;
use waymark_shell::commands::{self, HELP};
use waymark_shell::{Backend, Outcome, Session, ShellConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waymark=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ShellConfig::from_env().context("invalid configuration")?;

    let metrics = if config.metrics {
        let mut metrics = PrometheusMetrics::new();
        metrics.install().context("failed to install metrics recorder")?;
        waymark_markers::metrics::register_metrics();
        Some(metrics)
    } else {
        None
    };

    let backend = Backend::connect(&config.backend).context("failed to set up marker store")?;
    tracing::info!(backend = backend.name(), "Starting waymark");

    let session = Session::start(backend, config.sync, metrics);
    session.load().await?;

    println!("{HELP}\n");
    println!("{}", session.page().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("error: {e}");
                continue;
            },
        };
        match session.execute(command).await? {
            Outcome::Continue(text) => println!("{text}"),
            Outcome::Quit => break,
        }
    }

    session.shutdown(Duration::from_secs(5)).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
