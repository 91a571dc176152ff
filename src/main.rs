mod config;
mod display;
mod history;
mod poller;
mod reading;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Cli, ConfigError, DashboardConfig};
use crate::display::TerminalDisplay;
use crate::history::{FetchError, HttpHistory};
use crate::poller::Poller;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

fn init_logging() {
    // stdout is the dashboard; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("climate_dashboard=info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = DashboardConfig::from_cli(Cli::parse())?;
    let source = HttpHistory::new(&config)?;
    tracing::info!(
        url = source.url(),
        interval_ms = u64::try_from(config.interval.as_millis()).unwrap_or(u64::MAX),
        transition_ms = u64::try_from(config.transition.as_millis()).unwrap_or(u64::MAX),
        once = config.once,
        "climate dashboard starting"
    );

    let display = TerminalDisplay::stdout(config.clear_screen);
    let mut poller = Poller::new(source, display, config.transition);

    if config.once {
        let outcome = poller.refresh().await?;
        tracing::info!(?outcome, decision = poller.last_decision().unwrap_or(""), "snapshot rendered");
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };
    poller.run(config.interval, shutdown).await;
    Ok(())
}
