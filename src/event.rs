//! Trigger payload of the workflow run and target resolution.
//!
//! Only the handful of fields needed to find the issue number and the
//! repository are deserialized; everything else in the payload is
//! ignored.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::types::{Repo, Target};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    pub repository: Option<RepositoryRef>,
    pub issue: Option<NumberedItem>,
    pub pull_request: Option<NumberedItem>,
    pub project_card: Option<ProjectCard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    pub owner: OwnerRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerRef {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NumberedItem {
    pub number: u64,
}

/// A classic project card. Note cards have no linked content.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectCard {
    pub content_url: Option<String>,
}

impl EventPayload {
    /// Reads the payload file, or returns an empty payload when the run
    /// was not started by an event (no path available).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => {
                debug!("No event payload path, using an empty payload");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload '{}'", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse event payload '{}'", path.display()))
    }

    /// Repository named by the payload, falling back to an `owner/repo`
    /// string when the payload has none.
    pub fn repo(&self, fallback: Option<&str>) -> Result<Repo> {
        if let Some(repository) = &self.repository {
            return Repo::new(&repository.owner.login, &repository.name).map_err(|e| {
                anyhow::anyhow!(
                    "Invalid repository in event payload '{}/{}': {}",
                    repository.owner.login,
                    repository.name,
                    e
                )
            });
        }

        let Some(full_name) = fallback else {
            anyhow::bail!(
                "Event payload has no repository and no fallback repository (GITHUB_REPOSITORY) was given"
            );
        };
        Repo::parse(full_name)
            .map_err(|e| anyhow::anyhow!("Invalid repository format '{}': {}", full_name, e))
    }

    fn card_number(&self) -> Option<u64> {
        let content_url = self.project_card.as_ref()?.content_url.as_deref()?;
        let number = trailing_number(content_url);
        if number.is_none() {
            warn!(content_url, "Project card content URL does not end in a number");
        }
        number
    }
}

/// Last path segment of `content_url` as a number.
fn trailing_number(content_url: &str) -> Option<u64> {
    let parsed = Url::parse(content_url).ok();
    let segment = match &parsed {
        Some(url) => url.path_segments()?.next_back()?,
        None => content_url.rsplit('/').next()?,
    };
    segment.parse().ok()
}

/// Picks the number to label. First match wins: the explicit override,
/// then the payload's issue, pull request and project card content.
/// Zero never counts as a match.
pub fn resolve_issue_number(override_number: Option<u64>, payload: &EventPayload) -> Option<u64> {
    let nonzero = |n: &u64| *n != 0;

    override_number
        .filter(nonzero)
        .or_else(|| payload.issue.as_ref().map(|i| i.number).filter(nonzero))
        .or_else(|| {
            payload
                .pull_request
                .as_ref()
                .map(|pr| pr.number)
                .filter(nonzero)
        })
        .or_else(|| payload.card_number().filter(nonzero))
}

/// Resolves the full target. `Ok(None)` means there is nothing to label,
/// which is not an error.
pub fn resolve_target(
    override_number: Option<u64>,
    fallback_repo: Option<&str>,
    payload: &EventPayload,
) -> Result<Option<Target>> {
    let Some(number) = resolve_issue_number(override_number, payload) else {
        return Ok(None);
    };
    let repo = payload.repo(fallback_repo)?;
    debug!(number, repo = %repo, "Resolved target");

    Ok(Some(Target { repo, number }))
}
