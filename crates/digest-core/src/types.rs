//! Shared value types for the job-digest domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (scores are in `[0.0, 1.0]`, timestamps
//! are valid instants) and participate in sorting and rendering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Score types
// ---------------------------------------------------------------------------

/// A caller-supplied relevance score in the range `[0.0, 1.0]`.
///
/// Produced by the job-search library that emits the digest. Used to order
/// listings and to render the match percentage badge.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchScore(f64);

impl MatchScore {
    /// Creates a [`MatchScore`], returning `None` if `value` is outside
    /// the valid range `[0.0, 1.0]`.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the score as an `f64` in `[0.0, 1.0]`.
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Returns the score as a whole percentage, rounded half away from zero.
    pub fn as_percent(self) -> u32 {
        // Range is [0, 100] so the cast cannot truncate.
        (self.0 * 100.0).round() as u32
    }
}

impl std::fmt::Display for MatchScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parses the date formats job sources are known to emit.
    ///
    /// Accepts RFC 3339 (`2025-01-15T09:30:00Z`, with or without offset),
    /// a naive date-time (`2025-01-15T09:30:00`, `2025-01-15 09:30:00`, read as
    /// UTC), and a bare date (`2025-01-15`, read as UTC midnight). Returns
    /// `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
                return Some(Self(naive.and_utc()));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
    }

    /// Long human-readable form used in issue headers,
    /// e.g. `Wednesday, January 15, 2025 at 09:30 AM UTC`.
    pub fn long_display(self) -> String {
        self.0.format("%A, %B %-d, %Y at %I:%M %p UTC").to_string()
    }

    /// Short calendar form, e.g. `Jan 15, 2025`.
    pub fn short_date(self) -> String {
        self.0.format("%b %-d, %Y").to_string()
    }

    /// Whole days elapsed from `self` until `later`, truncated toward zero.
    ///
    /// Negative when `self` is after `later`.
    pub fn whole_days_until(self, later: Timestamp) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
