mod cli;
mod command;
mod local;
mod online;
mod render;

use crate::cli::{Cli, load_config};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
/// Activates tracing on stderr, resolves the configuration and runs the local or the online game
/// on stdin and stdout.
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(true),
        )
        .init();

    let cli = Cli::parse();
    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "Configuration rejected.");
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let result = if cli.online {
        online::run_online(config).await
    } else {
        local::run_local(config).await.map_err(online::RunError::from)
    };
    if let Err(error) = result {
        tracing::error!(%error, "Game loop ended with an error.");
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
