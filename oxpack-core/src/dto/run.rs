//! Run scheduling DTOs

use serde::{Deserialize, Serialize};

use crate::domain::platform::Platform;
use crate::domain::run::RunStatus;
use crate::dto::credentials::RunCredentials;

/// Default advisory timeout for a scheduled run, in seconds
///
/// Enforced by the build service, not by the client.
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 3_600;

/// Request to schedule a run from an inline, base64-encoded task
///
/// Built once per submission and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRunRequest {
    pub encoded_task: String,
    pub source_location: String,
    pub timeout: Option<u64>,
    pub platform: Platform,
    pub credentials: Option<RunCredentials>,
}

/// One page of raw build output for a run
///
/// `next_offset` is where the next fetch should start; `run_status` is the
/// run's status at the time the page was read, so a follower can tell when
/// the log is fully drained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPage {
    pub content: String,
    pub next_offset: u64,
    pub run_status: RunStatus,
}
