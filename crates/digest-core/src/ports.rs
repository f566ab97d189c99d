//! Collaborator contracts consumed by the orchestrator.
//!
//! Infrastructure crates implement these traits; the domain never sees the
//! transport behind them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{IssueNumber, IssueTrackerError, Label};

// ---------------------------------------------------------------------------
// Issue creation
// ---------------------------------------------------------------------------

/// Request to open a new issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    /// Labels in attachment order. May be empty.
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// An issue the tracker has created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub number: IssueNumber,
    pub url: String,
}

/// Capability to open issues in some tracker.
///
/// Implementations own their timeouts and authentication. Errors are returned
/// as-is to the orchestrator's caller; the orchestrator never retries.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, IssueTrackerError>;
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Fire-and-forget progress sink.
pub trait DigestLogger: Send + Sync {
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards every message to `tracing` at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl DigestLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
