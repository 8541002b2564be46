use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use uatm_app::cli::Cli;

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays pure JSON lines.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match uatm_app::run(&cli) {
        Ok(summary) => {
            info!(
                ticks = summary.ticks,
                deliveries = summary.deliveries_completed,
                collisions_avoided = summary.collisions_avoided,
                "run complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "run failed");
            ExitCode::FAILURE
        }
    }
}
