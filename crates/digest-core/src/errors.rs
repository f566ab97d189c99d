//! Error and retry-policy types for the job-digest domain.
//!
//! Two error kinds exist and are kept distinct all the way to the caller:
//!
//! - [`DigestFormatError`]: the input text is not a valid digest. Always fatal
//!   to the current call.
//! - [`IssueTrackerError`]: the injected issue-creation collaborator failed.
//!   Opaque to the domain; propagated unchanged.
//!
//! [`DigestIssueError`] is the union returned by
//! [`crate::DigestIssueService::create_digest_issue`]. Both variants are
//! transparent so the original message reaches the caller untouched.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Reported by [`IssueTrackerError`] so callers can layer their own retry
/// loop. The domain never retries on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried without operator action.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// The digest text failed schema validation.
///
/// `reason` names the offending field (and job index, for listings), e.g.
/// `Job at index 2: missing or invalid title field`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Invalid digest data: {reason}")]
pub struct DigestFormatError {
    /// Human-readable description of the first violation found.
    pub reason: String,
}

impl DigestFormatError {
    /// Creates an error carrying `reason` as its detail text.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Failure reported by an [`crate::IssueTracker`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IssueTrackerError {
    /// The tracker answered with a non-success status.
    #[error("Issue tracker rejected the request ({status}): {message}")]
    Api {
        /// HTTP status code returned by the tracker.
        status: u16,
        /// Tracker-provided message, or the raw response body.
        message: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset,
    /// timeout).
    #[error("Issue tracker unreachable: {message}")]
    Transport { message: String },

    /// A success response could not be decoded.
    #[error("Issue tracker returned an unreadable response: {message}")]
    InvalidResponse { message: String },

    /// The tracker client is misconfigured (bad repository slug, bad token).
    #[error("Issue tracker misconfigured: {message}")]
    Configuration { message: String },
}

impl IssueTrackerError {
    /// Classifies this failure for callers that want to retry.
    ///
    /// Transport failures, `429 Too Many Requests` and `5xx` responses are
    /// retryable; everything else is not.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport { .. } => RetryPolicy::Retryable { after: None },
            Self::Api { status, .. } if *status == 429 || *status >= 500 => {
                RetryPolicy::Retryable { after: None }
            }
            Self::Api { .. } | Self::InvalidResponse { .. } | Self::Configuration { .. } => {
                RetryPolicy::NonRetryable
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator errors
// ---------------------------------------------------------------------------

/// Failure of [`crate::DigestIssueService::create_digest_issue`].
///
/// The variant tells a validation failure apart from a delivery failure; the
/// display text is exactly that of the wrapped error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestIssueError {
    #[error(transparent)]
    Format(#[from] DigestFormatError),

    #[error(transparent)]
    Tracker(#[from] IssueTrackerError),
}
