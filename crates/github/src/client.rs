//! REST client for opening issues.

use async_trait::async_trait;
use digest_core::{CreatedIssue, IssueNumber, IssueTracker, IssueTrackerError, NewIssue};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::GithubConfig;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Opens issues in a single repository.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
}

#[derive(Debug, Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    number: u64,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

impl GithubClient {
    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`IssueTrackerError::Configuration`] if the user agent is not a
    /// valid header value or the TLS backend cannot be initialised.
    pub fn new(config: GithubConfig) -> Result<Self, IssueTrackerError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| IssueTrackerError::Configuration {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { http, config })
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.config.api_url,
            self.config.repository.owner(),
            self.config.repository.name()
        )
    }
}

#[async_trait]
impl IssueTracker for GithubClient {
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, IssueTrackerError> {
        let url = self.issues_url();
        let request = CreateIssueRequest {
            title: &issue.title,
            body: &issue.body,
            labels: issue.labels.iter().map(|label| label.as_str()).collect(),
        };

        debug!(
            repository = %self.config.repository,
            labels = request.labels.len(),
            "Creating issue"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| IssueTrackerError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&raw)
                .map(|body| body.message)
                .unwrap_or(raw);
            warn!(
                repository = %self.config.repository,
                status = status.as_u16(),
                %message,
                "GitHub rejected issue creation"
            );
            return Err(IssueTrackerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let created: IssueResponse =
            response
                .json()
                .await
                .map_err(|e| IssueTrackerError::InvalidResponse {
                    message: e.to_string(),
                })?;

        debug!(number = created.number, url = %created.html_url, "Issue created");

        Ok(CreatedIssue {
            number: IssueNumber::new(created.number),
            url: created.html_url,
        })
    }
}
