//! Command-line and environment configuration.
//!
//! A `.env` file in the working directory is loaded before arguments are
//! parsed, so every `env = ...` flag below can be supplied from it. Explicit
//! flags win over environment values.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use github::{GithubConfig, RepositorySlug, DEFAULT_API_URL};

use crate::telemetry::LogFormat;

/// Files job-search digests as GitHub issues.
#[derive(Debug, Parser)]
#[command(name = "job-digest", version, about)]
pub struct Cli {
    /// Log output encoding (logs go to stderr).
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a digest, render it, and open a GitHub issue.
    Create(CreateArgs),
    /// Validate a digest and print a JSON report. Exits 1 if invalid.
    Validate(InputArgs),
    /// Render a digest to stdout without contacting GitHub.
    Preview(InputArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Digest JSON file, or `-` for stdin.
    #[arg(long, short, default_value = "-")]
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Target repository as `owner/name`.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Token with permission to create issues in the target repository.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub REST base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "GITHUB_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl CreateArgs {
    /// Resolves the GitHub adapter settings, failing before any digest work
    /// if something required is missing.
    pub fn github_config(&self) -> Result<GithubConfig> {
        let token = self
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .context("GITHUB_TOKEN (or --token) must be set to create issues")?;
        let repo = self
            .repo
            .as_deref()
            .context("GITHUB_REPOSITORY (or --repo) must be set to create issues")?;
        let repository = RepositorySlug::parse(repo)?;

        Ok(GithubConfig::new(token.trim(), repository)
            .with_api_url(self.api_url.as_str())
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

/// Loads `.env` if one exists, returning its path. A missing file is not an
/// error.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn create_args(repo: Option<&str>, token: Option<&str>) -> CreateArgs {
        CreateArgs {
            input: InputArgs {
                input: PathBuf::from("-"),
            },
            repo: repo.map(str::to_string),
            token: token.map(str::to_string),
            api_url: "https://ghe.example.com/api/v3/".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_validate_with_file_input() {
        let cli = Cli::try_parse_from(["job-digest", "validate", "--input", "digest.json"]).unwrap();
        match cli.command {
            Command::Validate(args) => assert_eq!(args.input, PathBuf::from("digest.json")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_preview_defaulting_to_stdin() {
        let cli = Cli::try_parse_from(["job-digest", "preview"]).unwrap();
        match cli.command {
            Command::Preview(args) => assert_eq!(args.input, PathBuf::from("-")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn repo_is_a_create_flag() {
        let cli = Cli::try_parse_from([
            "job-digest",
            "create",
            "--repo",
            "acme/jobs",
            "--input",
            "digest.json",
        ])
        .unwrap();
        match cli.command {
            Command::Create(args) => {
                assert_eq!(args.repo.as_deref(), Some("acme/jobs"));
                assert_eq!(args.input.input, PathBuf::from("digest.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from(["job-digest", "preview", "--repo", "acme/jobs"]).is_err());
    }

    #[test]
    fn builds_github_config() {
        let config = create_args(Some("acme/jobs"), Some(" ghp_token "))
            .github_config()
            .unwrap();
        assert_eq!(config.repository.to_string(), "acme/jobs");
        assert_eq!(config.token, "ghp_token");
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_token_is_reported() {
        let err = create_args(Some("acme/jobs"), None).github_config().unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"));

        let err = create_args(Some("acme/jobs"), Some("  ")).github_config().unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn missing_or_bad_repository_is_reported() {
        let err = create_args(None, Some("t")).github_config().unwrap_err();
        assert!(err.to_string().contains("GITHUB_REPOSITORY"));

        let err = create_args(Some("just-a-name"), Some("t")).github_config().unwrap_err();
        assert!(err.to_string().contains("owner/name"));
    }
}
