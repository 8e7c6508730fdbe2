//! Run command handlers
//!
//! Handles run-related CLI commands: listing, viewing details, following
//! logs, and cancellation.

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use oxpack_client::RegistryClient;
use oxpack_core::domain::run::{Run, RunStatus};

use crate::config::Config;
use crate::id_resolver::resolve_run_id;
use crate::stream::LogStreamer;
use crate::submit::LogFollower;
use crate::types::IdOrPrefix;

/// Run subcommands
#[derive(Subcommand)]
pub enum RunCommands {
    /// List runs for a registry
    List {
        /// Registry name
        #[arg(short = 'r', long)]
        registry: String,
    },
    /// Get run details
    Get {
        /// Registry name
        #[arg(short = 'r', long)]
        registry: String,

        /// Run ID or unambiguous prefix
        id: String,
    },
    /// Follow run logs until the run finishes
    Logs {
        /// Registry name
        #[arg(short = 'r', long)]
        registry: String,

        /// Run ID or unambiguous prefix
        id: String,

        /// Print raw logs without formatting
        #[arg(long)]
        no_format: bool,
    },
    /// Cancel a run
    Cancel {
        /// Registry name
        #[arg(short = 'r', long)]
        registry: String,

        /// Run ID or unambiguous prefix
        id: String,
    },
}

/// Handle run commands
///
/// Routes run subcommands to their respective handlers.
pub async fn handle_run_command(command: RunCommands, config: &Config) -> Result<()> {
    let client = RegistryClient::new(&config.service_url);

    match command {
        RunCommands::List { registry } => list_runs(&client, &registry).await,
        RunCommands::Get { registry, id } => get_run(&client, &registry, &id).await,
        RunCommands::Logs {
            registry,
            id,
            no_format,
        } => follow_logs(&client, &registry, &id, no_format).await,
        RunCommands::Cancel { registry, id } => cancel_run(&client, &registry, &id).await,
    }
}

/// List runs for a registry
async fn list_runs(client: &RegistryClient, registry: &str) -> Result<()> {
    let runs = client.list_runs(registry).await?;

    if runs.is_empty() {
        println!("{}", "No runs found.".yellow());
    } else {
        println!("{}", format!("Found {} run(s):", runs.len()).bold());
        println!();
        for run in runs {
            print_run_summary(&run);
        }
    }

    Ok(())
}

/// Get and display a single run
async fn get_run(client: &RegistryClient, registry: &str, id: &str) -> Result<()> {
    let id_or_prefix = IdOrPrefix::parse(id);
    let run_id = resolve_run_id(client, registry, &id_or_prefix).await?;

    let run = client.get_run(registry, run_id).await?;

    print_run_details(&run);

    Ok(())
}

/// Follow a run's logs until it reaches a terminal state
async fn follow_logs(
    client: &RegistryClient,
    registry: &str,
    id: &str,
    no_format: bool,
) -> Result<()> {
    let id_or_prefix = IdOrPrefix::parse(id);
    let run_id = resolve_run_id(client, registry, &id_or_prefix).await?;

    let streamer = LogStreamer::new(client.clone());
    let run = streamer.follow_run(registry, run_id, no_format).await?;

    if !run.status.is_success() {
        anyhow::bail!("run {} finished with status {:?}", run.id, run.status);
    }

    Ok(())
}

/// Cancel a run
async fn cancel_run(client: &RegistryClient, registry: &str, id: &str) -> Result<()> {
    let id_or_prefix = IdOrPrefix::parse(id);
    let run_id = resolve_run_id(client, registry, &id_or_prefix).await?;

    client.cancel_run(registry, run_id).await?;

    println!(
        "{}",
        format!("✓ Run {} cancelled.", run_id).green().bold()
    );

    Ok(())
}

/// Print a run summary
fn print_run_summary(run: &Run) {
    println!("  {} Run {}", "▸".cyan(), run.id.to_string().dimmed());
    println!("    Status:  {}", colorize_status(&run.status));
    if let Some(image) = &run.image {
        println!("    Image:   {}", image.dimmed());
    }
    println!(
        "    Created: {}",
        run.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

/// Print detailed run information
fn print_run_details(run: &Run) {
    println!("{}", "Run Details:".bold());
    println!("  ID:       {}", run.id.to_string().cyan());
    println!("  Registry: {}", run.registry);
    println!("  Status:   {}", colorize_status(&run.status));
    if let Some(image) = &run.image {
        println!("  Image:    {}", image);
    }
    println!("  Created:  {}", run.created_at.format("%Y-%m-%d %H:%M:%S"));

    if let Some(started) = run.started_at {
        println!("  Started:  {}", started.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(finished) = run.finished_at {
        println!("  Finished: {}", finished.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = run.started_at {
            let duration = finished.signed_duration_since(started);
            println!("  Duration: {}s", duration.num_seconds());
        }
    }
}

/// Colorize run status for display
fn colorize_status(status: &RunStatus) -> colored::ColoredString {
    let status_str = format!("{:?}", status);
    match status {
        RunStatus::Queued => status_str.yellow(),
        RunStatus::Started | RunStatus::Running => status_str.cyan(),
        RunStatus::Succeeded => status_str.green(),
        RunStatus::Failed | RunStatus::Error => status_str.red(),
        RunStatus::Cancelled => status_str.dimmed(),
        RunStatus::TimedOut => status_str.red(),
    }
}
