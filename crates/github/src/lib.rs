//! GitHub infrastructure adapter.
//!
//! Implements the [`digest_core::IssueTracker`] trait against the GitHub REST
//! API (`POST /repos/{owner}/{repo}/issues`) using `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Authentication,
//! headers, timeouts, and mapping of HTTP failures onto
//! [`digest_core::IssueTrackerError`] live here; the domain crate never sees
//! them.
//!
//! ## Error Mapping
//!
//! | Condition | Error |
//! |-----------|-------|
//! | No response (DNS, TLS, timeout) | `Transport` |
//! | Non-2xx status | `Api { status, message }` with GitHub's `message` field |
//! | 2xx with an undecodable body | `InvalidResponse` |
//! | Client cannot be built | `Configuration` |

pub mod client;
pub mod config;

pub use client::GithubClient;
pub use config::{
    GithubConfig, RepositorySlug, RepositorySlugError, DEFAULT_API_URL, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT,
};
