//! Run domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One execution of a submitted task on the build service
///
/// Created by the service when it accepts a run request; the client only
/// ever reads it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: Uuid,
    pub registry: String,
    pub status: RunStatus,
    pub image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Run lifecycle status as reported by the build service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Queued,
    Started,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    TimedOut,
    Error,
}

impl RunStatus {
    /// Whether the run has stopped making progress
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded
                | RunStatus::Failed
                | RunStatus::Cancelled
                | RunStatus::TimedOut
                | RunStatus::Error
        )
    }

    /// Whether the run finished successfully
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!RunStatus::Queued.is_terminal());
        assert!(!RunStatus::Started.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::Succeeded.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
        assert!(RunStatus::TimedOut.is_terminal());
        assert!(RunStatus::Error.is_terminal());
    }

    #[test]
    fn test_only_succeeded_counts_as_success() {
        assert!(RunStatus::Succeeded.is_success());
        assert!(!RunStatus::Failed.is_success());
        assert!(!RunStatus::Running.is_success());
    }
}
