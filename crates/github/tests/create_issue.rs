use std::time::Duration;

use digest_core::{IssueNumber, IssueTracker, IssueTrackerError, Label, NewIssue, RetryPolicy};
use github::{GithubClient, GithubConfig, RepositorySlug};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server_uri: &str) -> GithubClient {
    let config = GithubConfig::new("test-token", RepositorySlug::parse("acme/jobs").unwrap())
        .with_api_url(server_uri)
        .with_timeout(Duration::from_millis(500));
    GithubClient::new(config).unwrap()
}

fn issue() -> NewIssue {
    NewIssue {
        title: "🎯 3 Job Opportunities (2 new)".to_string(),
        body: "# Job Search Results".to_string(),
        labels: ["job-digest", "automated", "jobs-3", "new-jobs"]
            .into_iter()
            .filter_map(Label::new)
            .collect(),
    }
}

#[tokio::test]
async fn posts_issue_and_maps_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/jobs/issues"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        .and(body_json(json!({
            "title": "🎯 3 Job Opportunities (2 new)",
            "body": "# Job Search Results",
            "labels": ["job-digest", "automated", "jobs-3", "new-jobs"],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1,
            "number": 42,
            "html_url": "https://github.com/acme/jobs/issues/42",
            "state": "open",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server.uri()).create_issue(&issue()).await.unwrap();
    assert_eq!(created.number, IssueNumber::new(42));
    assert_eq!(created.url, "https://github.com/acme/jobs/issues/42");
}

#[tokio::test]
async fn empty_label_list_is_omitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/jobs/issues"))
        .and(body_json(json!({ "title": "t", "body": "b" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "number": 1,
            "html_url": "https://github.com/acme/jobs/issues/1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = NewIssue {
        title: "t".to_string(),
        body: "b".to_string(),
        labels: Vec::new(),
    };
    client_for(&server.uri()).create_issue(&request).await.unwrap();
}

#[tokio::test]
async fn api_error_carries_github_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Resource not accessible by integration",
            "documentation_url": "https://docs.github.com/rest/issues/issues#create-an-issue",
        })))
        .mount(&server)
        .await;

    let err = client_for(&server.uri()).create_issue(&issue()).await.unwrap_err();
    assert_eq!(
        err,
        IssueTrackerError::Api {
            status: 403,
            message: "Resource not accessible by integration".to_string(),
        }
    );
    assert_eq!(err.retry_policy(), RetryPolicy::NonRetryable);
}

#[tokio::test]
async fn non_json_error_body_is_kept_raw() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server.uri()).create_issue(&issue()).await.unwrap_err();
    assert_eq!(
        err,
        IssueTrackerError::Api {
            status: 502,
            message: "Bad Gateway".to_string(),
        }
    );
    assert!(matches!(err.retry_policy(), RetryPolicy::Retryable { .. }));
}

#[tokio::test]
async fn undecodable_success_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let err = client_for(&server.uri()).create_issue(&issue()).await.unwrap_err();
    assert!(matches!(err, IssueTrackerError::InvalidResponse { .. }));
}

#[tokio::test]
async fn slow_tracker_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_delay(Duration::from_secs(5))
                .set_body_json(json!({ "number": 1, "html_url": "x" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server.uri()).create_issue(&issue()).await.unwrap_err();
    assert!(matches!(err, IssueTrackerError::Transport { .. }));
}
