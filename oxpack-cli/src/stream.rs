//! Log streaming
//!
//! Follows a run's build output page by page until the run reaches a
//! terminal state and the log is fully drained.

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::*;
use std::time::Duration;
use tokio::time;
use uuid::Uuid;

use oxpack_client::RegistryClient;
use oxpack_core::domain::run::Run;

use crate::submit::LogFollower;

/// Default delay between log page fetches
const DEFAULT_FETCH_INTERVAL: Duration = Duration::from_secs(2);

/// Streams run logs to stdout
pub struct LogStreamer {
    client: RegistryClient,
    interval: Duration,
}

impl LogStreamer {
    /// Creates a streamer with the default fetch interval
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
            interval: DEFAULT_FETCH_INTERVAL,
        }
    }

    /// Override the fetch interval
    #[allow(dead_code)]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl LogFollower for LogStreamer {
    async fn follow_run(&self, registry: &str, run_id: Uuid, raw: bool) -> Result<Run> {
        let mut offset = 0u64;
        let mut ticker = time::interval(self.interval);

        loop {
            ticker.tick().await;

            let page = self
                .client
                .get_run_logs(registry, run_id, offset)
                .await
                .context("Failed to fetch run logs")?;

            if !page.content.is_empty() {
                print_page(&page.content, raw);
                offset = page.next_offset;
                continue;
            }

            // An empty page with a terminal status means the log is drained
            if page.run_status.is_terminal() {
                let run = self
                    .client
                    .get_run(registry, run_id)
                    .await
                    .context("Failed to fetch final run state")?;
                return Ok(run);
            }
        }
    }
}

/// Print one page of build output
fn print_page(content: &str, raw: bool) {
    if raw {
        print!("{}", content);
        return;
    }

    for line in content.lines() {
        println!("{}", format_log_line(line));
    }
}

/// Colorize a single build output line
fn format_log_line(line: &str) -> ColoredString {
    if line.starts_with("===> ") {
        line.cyan().bold()
    } else if line.contains("ERROR") || line.contains("error:") {
        line.red()
    } else if line.contains("WARN") || line.contains("warning:") {
        line.yellow()
    } else {
        line.normal()
    }
}
