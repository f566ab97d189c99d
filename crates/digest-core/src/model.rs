//! The digest data model.
//!
//! Plain immutable data. A [`DigestResult`] is built fresh from untrusted text
//! by [`crate::parser::parse`], rendered once, and dropped. Optional fields are
//! genuinely optional: they are absent from the serialized form when `None`, so
//! serializing a parsed digest and parsing it again yields an equal value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{JobId, MatchScore};

/// Free-form mapping of filter name to arbitrary JSON value.
pub type FilterMap = Map<String, Value>;

/// The search that produced a digest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_filters: Option<FilterMap>,
}

/// Aggregate counters for one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub total_jobs_found: u64,
    pub new_jobs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_jobs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicates_removed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
    /// Job boards consulted, in query order. May be empty.
    pub sources_queried: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range_processed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters_applied: Option<FilterMap>,
}

/// A single job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub description: String,
    pub url: String,
    pub source: String,
    /// Raw date text as supplied by the source. Parsed lazily when sorting and
    /// rendering; an unparseable value is kept verbatim.
    pub posted_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_option: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_reasons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<MatchScore>,
}

impl JobListing {
    /// Score used for ordering: an absent score counts as zero.
    pub fn sort_score(&self) -> f64 {
        self.match_score.map_or(0.0, MatchScore::as_f64)
    }
}

/// Provenance of the digest itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Generation instant as supplied (ISO-8601-ish). Rendered verbatim in the
    /// issue footer.
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_snapshot: Option<FilterMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

/// One job-search run's results: the unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<SearchQuery>,
    pub summary: JobSummary,
    pub jobs: Vec<JobListing>,
    pub metadata: ProcessingMetadata,
}

/// Rendered issue text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueContent {
    pub title: String,
    pub body: String,
}

/// Read-only projection of a digest used for logging and validation reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_jobs: u64,
    pub new_jobs: u64,
    pub sources: Vec<String>,
    /// Mean of present match scores rounded to two decimals; `0.0` when no
    /// listing carries a score.
    pub avg_match_score: f64,
}

impl std::fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} jobs ({} new) from [{}], avg match {:.2}",
            self.total_jobs,
            self.new_jobs,
            self.sources.join(", "),
            self.avg_match_score
        )
    }
}
