//! Connection settings for the GitHub adapter.

use std::time::Duration;

use thiserror::Error;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// User agent sent with every request; GitHub rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("job-digest/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A repository slug was not of the form `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Repository must be given as 'owner/name', got '{0}'")]
pub struct RepositorySlugError(pub String);

/// An `owner/name` repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    owner: String,
    name: String,
}

impl RepositorySlug {
    /// Parses `owner/name`. Both halves must be non-empty and contain no
    /// further `/` or whitespace.
    pub fn parse(slug: &str) -> Result<Self, RepositorySlugError> {
        let invalid = || RepositorySlugError(slug.to_string());
        let (owner, name) = slug.trim().split_once('/').ok_or_else(invalid)?;

        let valid_part = |part: &str| {
            !part.is_empty() && !part.contains('/') && !part.chars().any(char::is_whitespace)
        };
        if !valid_part(owner) || !valid_part(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Account or organisation that owns the repository.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name without the owner.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything [`crate::GithubClient`] needs to open issues in one repository.
#[derive(Clone)]
pub struct GithubConfig {
    /// REST base URL without a trailing slash. Override for GitHub Enterprise
    /// or tests.
    pub api_url: String,
    /// Token with `issues: write` on the target repository.
    pub token: String,
    pub repository: RepositorySlug,
    pub user_agent: String,
    pub timeout: Duration,
}

impl GithubConfig {
    /// Settings for public GitHub with default user agent and timeout.
    pub fn new(token: impl Into<String>, repository: RepositorySlug) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            repository,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Points the client at another REST base URL, such as GitHub Enterprise.
    /// A trailing slash is dropped.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keeps the token out of logs.
impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("repository", &self.repository)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}
