//! Oxpack CLI
//!
//! Command-line interface for submitting buildpack builds to a managed
//! registry's remote build service.

mod commands;
mod config;
mod id_resolver;
mod poll;
mod source;
mod stream;
mod submit;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oxpack")]
#[command(about = "Buildpack builds on a managed registry build service", long_about = None)]
struct Cli {
    /// Build service URL
    #[arg(
        long,
        env = "OXPACK_SERVICE_URL",
        default_value = "http://localhost:8080"
    )]
    service_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oxpack_cli=info,oxpack_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        service_url: cli.service_url,
    };

    handle_command(cli.command, &config).await
}
