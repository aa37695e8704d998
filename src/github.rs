use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Forge, IssueSnapshot, Repo};

/// Returns the token to authenticate with, in order of preference: the
/// explicit `repo-token` input, `GITHUB_TOKEN`, then `GH_TOKEN`.
pub fn resolve_token(explicit: Option<&str>) -> Option<String> {
    explicit
        .map(str::to_string)
        .into_iter()
        .chain(std::env::var("GITHUB_TOKEN").ok())
        .chain(std::env::var("GH_TOKEN").ok())
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}

/// Creates an authenticated GitHub client for `api_url`.
///
/// Octocrab's built-in retry layer is switched off: every request is
/// attempted exactly once.
pub fn setup_github_client(token: String, api_url: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .base_uri(api_url)
        .with_context(|| format!("Invalid GitHub API URL: '{}'", api_url))?
        .add_retry_config(RetryConfig::None)
        .personal_token(token)
        .build()
        .context("Failed to create GitHub client")
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    #[serde(default)]
    assignees: Vec<serde_json::Value>,
    #[serde(default)]
    labels: Vec<LabelResponse>,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    name: String,
}

#[derive(Debug, Serialize)]
struct LabelsBody<'a> {
    labels: &'a [String],
}

fn issue_route(repo: &Repo, number: u64) -> String {
    format!("/repos/{}/{}/issues/{}", repo.owner, repo.name, number)
}

/// [`Forge`] backed by the GitHub REST API.
///
/// The client is built for each call, so a run that never reaches the
/// API needs neither a token nor a valid API URL.
pub struct GitHub {
    token: Option<String>,
    api_url: String,
}

impl GitHub {
    pub fn new(token: Option<String>, api_url: impl Into<String>) -> Self {
        Self {
            token,
            api_url: api_url.into(),
        }
    }

    fn client(&self) -> Result<Octocrab> {
        let Some(token) = &self.token else {
            anyhow::bail!("No repo-token, GITHUB_TOKEN or GH_TOKEN available to call the GitHub API");
        };
        setup_github_client(token.clone(), &self.api_url)
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn get_issue(&self, repo: &Repo, number: u64) -> Result<IssueSnapshot> {
        let route = issue_route(repo, number);
        debug!(%route, "GET issue");

        let issue: IssueResponse = self
            .client()?
            .get(&route, None::<&()>)
            .await
            .with_context(|| format!("GET {route}"))?;

        Ok(IssueSnapshot {
            assignees: issue.assignees.len(),
            labels: issue.labels.into_iter().map(|label| label.name).collect(),
        })
    }

    async fn replace_labels(&self, repo: &Repo, number: u64, labels: &[String]) -> Result<()> {
        let route = issue_route(repo, number);
        debug!(%route, ?labels, "PATCH issue labels");

        let _: serde_json::Value = self
            .client()?
            .patch(&route, Some(&LabelsBody { labels }))
            .await
            .with_context(|| format!("PATCH {route}"))?;
        Ok(())
    }

    async fn add_labels(&self, repo: &Repo, number: u64, labels: &[String]) -> Result<()> {
        let route = format!("{}/labels", issue_route(repo, number));
        debug!(%route, ?labels, "POST issue labels");

        let _: serde_json::Value = self
            .client()?
            .post(&route, Some(&LabelsBody { labels }))
            .await
            .with_context(|| format!("POST {route}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_route() {
        let repo = Repo::new("octo-org", "octo-repo").unwrap();
        assert_eq!(
            issue_route(&repo, 42),
            "/repos/octo-org/octo-repo/issues/42"
        );
    }

    #[test]
    fn test_explicit_token_is_preferred() {
        assert_eq!(resolve_token(Some(" ghp_input ")).as_deref(), Some("ghp_input"));
    }

    #[tokio::test]
    async fn test_calls_without_token_fail() {
        let github = GitHub::new(None, "http://127.0.0.1:9");
        let repo = Repo::new("o", "r").unwrap();

        let err = github.get_issue(&repo, 5).await.unwrap_err();
        assert!(err.to_string().contains("No repo-token"), "{err:#}");
        assert!(github.add_labels(&repo, 5, &[]).await.is_err());
        assert!(github.replace_labels(&repo, 5, &[]).await.is_err());
    }

    #[test]
    fn test_issue_response_parsing() {
        let issue: IssueResponse = serde_json::from_str(
            r#"{
                "number": 1,
                "assignees": [{"login": "octocat"}],
                "labels": [{"id": 1, "name": "bug"}, {"id": 2, "name": "triage"}]
            }"#,
        )
        .unwrap();
        assert_eq!(issue.assignees.len(), 1);
        assert_eq!(
            issue.labels.into_iter().map(|l| l.name).collect::<Vec<_>>(),
            vec!["bug", "triage"]
        );
    }

    #[test]
    fn test_labels_body_serialization() {
        let labels = vec!["b".to_string(), "c".to_string()];
        let body = serde_json::to_value(LabelsBody { labels: &labels }).unwrap();
        assert_eq!(body, serde_json::json!({ "labels": ["b", "c"] }));

        let body = serde_json::to_value(LabelsBody { labels: &[] }).unwrap();
        assert_eq!(body, serde_json::json!({ "labels": [] }));
    }
}
