//! Digest-to-issue orchestration.
//!
//! [`DigestIssueService`] sequences validation, formatting, labelling, and
//! delegation to the injected [`IssueTracker`]. It holds no per-digest state:
//! every call owns its working data, so one service may serve any number of
//! concurrent calls.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    formatter, parser, Clock, CreatedIssue, DigestIssueError, DigestLogger, IssueTracker,
    JobSummary, Label, NewIssue, SummaryStats, SystemClock,
};

/// Label attached to every digest issue.
pub const DIGEST_LABEL: &str = "job-digest";
/// Label marking the issue as machine-generated.
pub const AUTOMATED_LABEL: &str = "automated";
/// Label present when the run found jobs not seen in the previous run.
pub const NEW_JOBS_LABEL: &str = "new-jobs";
/// Label present when the run found nothing.
pub const NO_RESULTS_LABEL: &str = "no-results";

/// Outcome of [`DigestIssueService::validate_digest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Turns raw digest text into a tracker issue.
pub struct DigestIssueService {
    tracker: Arc<dyn IssueTracker>,
    logger: Arc<dyn DigestLogger>,
    clock: Arc<dyn Clock>,
}

impl DigestIssueService {
    /// Creates a service that reads the system clock.
    pub fn new(tracker: Arc<dyn IssueTracker>, logger: Arc<dyn DigestLogger>) -> Self {
        Self {
            tracker,
            logger,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for relative dates.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates, renders, and files a digest as a new issue.
    ///
    /// # Errors
    ///
    /// - [`DigestIssueError::Format`] when the text is not a valid digest. The
    ///   tracker is not called.
    /// - [`DigestIssueError::Tracker`] when the tracker fails; the tracker's
    ///   error is returned unchanged.
    ///
    /// Both are logged before being returned.
    pub async fn create_digest_issue(&self, raw: &str) -> Result<CreatedIssue, DigestIssueError> {
        let span = tracing::info_span!("create_digest_issue", run_id = %Uuid::new_v4());
        self.run(raw).instrument(span).await
    }

    async fn run(&self, raw: &str) -> Result<CreatedIssue, DigestIssueError> {
        self.logger.info("Creating job digest issue");
        self.logger
            .debug(&format!("Digest payload length: {} characters", raw.chars().count()));

        let digest = parser::parse(raw).map_err(|e| {
            self.logger.error(&format!("Digest validation failed: {e}"));
            e
        })?;

        let stats = parser::summarize(&digest);
        self.logger.info(&format!("Digest summary: {stats}"));

        let content = formatter::format_issue(&digest, self.clock.now());
        self.logger.info(&format!("Issue title: {}", content.title));
        self.logger
            .debug(&format!("Issue body length: {} characters", content.body.len()));

        let request = NewIssue {
            title: content.title,
            body: content.body,
            labels: build_labels(&digest.summary),
        };

        let issue = self.tracker.create_issue(&request).await.map_err(|e| {
            self.logger.error(&format!("Failed to create digest issue: {e}"));
            e
        })?;

        self.logger.info(&format!(
            "Created digest issue #{}: {}",
            issue.number, issue.url
        ));
        self.logger.info(&format!("Digest stats: {stats}"));
        Ok(issue)
    }

    /// Parses and summarizes a digest without creating anything.
    ///
    /// Never fails and never logs; a parse failure is reported in
    /// [`DigestValidation::error`].
    pub async fn validate_digest(&self, raw: &str) -> DigestValidation {
        validate_digest(raw)
    }
}

/// Collaborator-free form of [`DigestIssueService::validate_digest`].
pub fn validate_digest(raw: &str) -> DigestValidation {
    match parser::parse(raw) {
        Ok(digest) => DigestValidation {
            valid: true,
            summary: Some(parser::summarize(&digest)),
            error: None,
        },
        Err(e) => DigestValidation {
            valid: false,
            summary: None,
            error: Some(e.to_string()),
        },
    }
}

/// Derives issue labels from the run counters.
///
/// Always `job-digest`, `automated`, and `jobs-{total}`; then `new-jobs` when
/// any job is new and `no-results` when nothing was found.
pub fn build_labels(summary: &JobSummary) -> Vec<Label> {
    let mut names = vec![
        DIGEST_LABEL.to_string(),
        AUTOMATED_LABEL.to_string(),
        format!("jobs-{}", summary.total_jobs_found),
    ];
    if summary.new_jobs > 0 {
        names.push(NEW_JOBS_LABEL.to_string());
    }
    if summary.total_jobs_found == 0 {
        names.push(NO_RESULTS_LABEL.to_string());
    }
    names.into_iter().filter_map(Label::new).collect()
}
