//! Run endpoints

use tracing::debug;
use uuid::Uuid;

use crate::RegistryClient;
use crate::error::Result;
use oxpack_core::domain::run::Run;
use oxpack_core::dto::run::{LogPage, ScheduleRunRequest};

impl RegistryClient {
    /// Schedule a run from an encoded task
    ///
    /// Blocks until the service accepts the request and returns the queued
    /// run; it does not wait for the build itself.
    ///
    /// # Arguments
    /// * `registry` - The target registry name
    /// * `request` - The run request
    ///
    /// # Returns
    /// The queued run
    pub async fn schedule_run(&self, registry: &str, request: &ScheduleRunRequest) -> Result<Run> {
        let url = format!("{}/api/registries/{}/runs", self.base_url, registry);
        debug!("Scheduling run on registry {}", registry);

        let response = self.client.post(&url).json(request).send().await?;

        self.handle_response(response).await
    }

    /// Get a run by ID
    ///
    /// # Arguments
    /// * `registry` - The registry the run belongs to
    /// * `run_id` - The run UUID
    pub async fn get_run(&self, registry: &str, run_id: Uuid) -> Result<Run> {
        let url = format!("{}/api/registries/{}/runs/{}", self.base_url, registry, run_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List runs for a registry
    ///
    /// # Arguments
    /// * `registry` - The registry name
    pub async fn list_runs(&self, registry: &str) -> Result<Vec<Run>> {
        let url = format!("{}/api/registries/{}/runs", self.base_url, registry);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Fetch one page of build output for a run
    ///
    /// # Arguments
    /// * `registry` - The registry the run belongs to
    /// * `run_id` - The run UUID
    /// * `offset` - Byte offset to read from; pass the previous page's
    ///   `next_offset` to continue
    pub async fn get_run_logs(&self, registry: &str, run_id: Uuid, offset: u64) -> Result<LogPage> {
        let url = format!(
            "{}/api/registries/{}/runs/{}/logs?offset={}",
            self.base_url, registry, run_id, offset
        );
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Cancel a run
    ///
    /// # Arguments
    /// * `registry` - The registry the run belongs to
    /// * `run_id` - The run UUID to cancel
    pub async fn cancel_run(&self, registry: &str, run_id: Uuid) -> Result<()> {
        let url = format!(
            "{}/api/registries/{}/runs/{}/cancel",
            self.base_url, registry, run_id
        );
        let response = self.client.post(&url).send().await?;

        self.handle_empty_response(response).await
    }
}
