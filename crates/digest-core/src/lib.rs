//! Core domain for turning job-search digests into GitHub issues.
//!
//! This crate contains the digest data model, the schema validator, the
//! Markdown issue formatter, and the orchestrator that ties them to an issue
//! tracker. Infrastructure crates implement the traits defined here; they never
//! add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no network I/O. It
//! defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`JobId`, `IssueNumber`, `Label`) |
//! | [`types`] | Value types with invariants (`MatchScore`, `Timestamp`) |
//! | [`model`] | Digest entities and the rendered `IssueContent` |
//! | [`errors`] | Validation, collaborator, and orchestration errors |
//! | [`parser`] | Schema validation and summary statistics |
//! | [`formatter`] | Title and Markdown body rendering |
//! | [`clock`] | Wall-clock seam |
//! | [`ports`] | Issue tracker and logger contracts |
//! | [`orchestrator`] | `DigestIssueService` and label derivation |
//!
//! ## Flow
//!
//! ```text
//! raw text ─► parser::parse ─► DigestResult ─► formatter::format_issue ─► IssueContent
//!                                                   │
//!                          orchestrator::build_labels ─► IssueTracker::create_issue
//! ```

pub mod clock;
pub mod errors;
pub mod formatter;
pub mod identifiers;
pub mod model;
pub mod orchestrator;
pub mod parser;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{DigestFormatError, DigestIssueError, IssueTrackerError, RetryPolicy};
pub use formatter::{format_issue, format_title, posted_label, sort_listings, truncate};
pub use identifiers::{IssueNumber, JobId, Label};
pub use model::{
    DigestResult, FilterMap, IssueContent, JobListing, JobSummary, ProcessingMetadata,
    SearchQuery, SummaryStats,
};
pub use orchestrator::{build_labels, validate_digest, DigestIssueService, DigestValidation};
pub use parser::{parse, summarize};
pub use ports::{CreatedIssue, DigestLogger, IssueTracker, NewIssue, TracingLogger};
pub use types::{MatchScore, Timestamp};
