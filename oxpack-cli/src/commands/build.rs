//! Build command handler
//!
//! Submits a buildpack build to the registry build service and reports the
//! outcome according to the wait flags.

use anyhow::Result;
use clap::Args;
use colored::*;

use oxpack_client::RegistryClient;
use oxpack_core::domain::run::Run;
use oxpack_core::dto::credentials::AuthMode;
use oxpack_core::task::DEFAULT_BUILDER;

use crate::config::Config;
use crate::poll::RunPoller;
use crate::source::ArchiveUploader;
use crate::stream::LogStreamer;
use crate::submit::{BuildOutcome, BuildSpec, WaitMode, submit_build};

/// Arguments for the build command
#[derive(Args)]
pub struct BuildArgs {
    /// Local source directory, or a remote source URL (http(s), git, .tar.gz)
    source: String,

    /// Target registry name
    #[arg(short = 'r', long)]
    registry: String,

    /// Image name and tag to produce (e.g. myapp:v1)
    #[arg(short = 't', long = "image")]
    image: String,

    /// Builder image to run the buildpack build with
    #[arg(long, default_value = DEFAULT_BUILDER)]
    builder: String,

    /// Print raw build logs without formatting
    #[arg(long)]
    no_format: bool,

    /// Wait for the run to finish without streaming its logs
    #[arg(long)]
    no_logs: bool,

    /// Queue the run and return immediately
    #[arg(long)]
    no_wait: bool,

    /// Advisory run timeout in seconds (enforced by the service, default 3600)
    #[arg(long)]
    timeout: Option<u64>,

    /// Resource group the registry belongs to
    #[arg(long)]
    resource_group: Option<String>,

    /// Target platform as os[/arch[/variant]] (default: linux/amd64)
    #[arg(long)]
    platform: Option<String>,

    /// Auth mode for the run against the target registry (none, default)
    #[arg(long)]
    auth_mode: Option<String>,
}

/// Handle the build command
///
/// Wires the production collaborators together, submits the build, and
/// prints the outcome.
pub async fn handle_build_command(args: BuildArgs, config: &Config) -> Result<()> {
    let client = RegistryClient::new(&config.service_url);

    let auth_mode = args
        .auth_mode
        .as_deref()
        .map(str::parse::<AuthMode>)
        .transpose()?;

    let wait_mode = if args.no_wait {
        WaitMode::Detach
    } else if args.no_logs {
        WaitMode::Poll
    } else {
        WaitMode::Stream {
            raw: args.no_format,
        }
    };

    let spec = BuildSpec {
        registry: args.registry,
        image: args.image,
        source: args.source,
        builder: args.builder,
        resource_group: args.resource_group,
        platform: args.platform,
        auth_mode,
        timeout: args.timeout,
    };

    let sources = ArchiveUploader::new(client.clone());
    let poller = RunPoller::new(client.clone());
    let streamer = LogStreamer::new(client.clone());

    let outcome = submit_build(
        &client, &sources, &client, &poller, &streamer, spec, wait_mode,
    )
    .await?;

    match outcome {
        BuildOutcome::Queued(run) => {
            println!("{}", "✓ Run queued!".green().bold());
            println!("  Run ID:   {}", run.id.to_string().cyan());
            println!("  Registry: {}", run.registry.bold());
            println!("  Status:   {}", format!("{:?}", run.status).yellow());
            Ok(())
        }
        BuildOutcome::Finished(run) => report_finished_run(&run),
    }
}

/// Print a terminal run and fail the command if the run did not succeed
fn report_finished_run(run: &Run) -> Result<()> {
    if run.status.is_success() {
        println!("{}", "✓ Build succeeded!".green().bold());
    } else {
        println!(
            "{}",
            format!("✗ Build finished with status {:?}", run.status)
                .red()
                .bold()
        );
    }
    println!("  Run ID:   {}", run.id.to_string().cyan());
    if let Some(image) = &run.image {
        println!("  Image:    {}", image.bold());
    }
    if let (Some(started), Some(finished)) = (run.started_at, run.finished_at) {
        let duration = finished.signed_duration_since(started);
        println!("  Duration: {}s", duration.num_seconds());
    }

    if !run.status.is_success() {
        anyhow::bail!("run {} finished with status {:?}", run.id, run.status);
    }
    Ok(())
}
