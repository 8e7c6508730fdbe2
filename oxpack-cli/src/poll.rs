//! Run polling
//!
//! Polls the build service until a run reaches a terminal state. Used for
//! builds submitted without log streaming.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time;
use tracing::debug;
use uuid::Uuid;

use oxpack_client::RegistryClient;
use oxpack_core::domain::run::Run;

use crate::submit::RunWaiter;

/// Default delay between status polls
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polls run status to completion
pub struct RunPoller {
    client: RegistryClient,
    interval: Duration,
}

impl RunPoller {
    /// Creates a poller with the default interval
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the poll interval
    #[allow(dead_code)]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl RunWaiter for RunPoller {
    async fn wait_for_run(&self, registry: &str, run_id: Uuid) -> Result<Run> {
        let mut ticker = time::interval(self.interval);

        loop {
            ticker.tick().await;

            let run = self
                .client
                .get_run(registry, run_id)
                .await
                .context("Failed to poll run status")?;

            debug!("Run {} status: {:?}", run_id, run.status);

            if run.status.is_terminal() {
                return Ok(run);
            }
        }
    }
}
