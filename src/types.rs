use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

/// Errors produced when building a [`Repo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    EmptyOwner,
    EmptyName,
    InvalidFormat(String),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::EmptyOwner => write!(f, "repository owner cannot be empty"),
            RepoError::EmptyName => write!(f, "repository name cannot be empty"),
            RepoError::InvalidFormat(s) => {
                write!(f, "repository must be in format 'owner/repo', got: '{s}'")
            }
        }
    }
}

impl std::error::Error for RepoError {}

/// A GitHub repository, identified by owner login and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let owner = owner.into();
        let name = name.into();
        if owner.trim().is_empty() {
            return Err(RepoError::EmptyOwner);
        }
        if name.trim().is_empty() {
            return Err(RepoError::EmptyName);
        }
        Ok(Self { owner, name })
    }

    /// Parses the `owner/repo` form used by `GITHUB_REPOSITORY`.
    pub fn parse(full_name: &str) -> Result<Self, RepoError> {
        match full_name.trim().split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] => Self::new(*owner, *name),
            _ => Err(RepoError::InvalidFormat(full_name.to_string())),
        }
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The issue, pull request or card content a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub repo: Repo,
    pub number: u64,
}

/// Point-in-time read of an issue's assignees and labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueSnapshot {
    pub assignees: usize,
    pub labels: Vec<String>,
}

/// Issue-tracking operations the labeler needs from a forge.
///
/// Pull requests and project-card content are addressed through the
/// same issue endpoints, so one number is enough to reach all three.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Reads the current assignees and labels of an issue.
    async fn get_issue(&self, repo: &Repo, number: u64) -> Result<IssueSnapshot>;

    /// Replaces the complete label set of an issue.
    async fn replace_labels(&self, repo: &Repo, number: u64, labels: &[String]) -> Result<()>;

    /// Adds labels to an issue. An empty list removes every label.
    async fn add_labels(&self, repo: &Repo, number: u64, labels: &[String]) -> Result<()>;
}

/// How a run ended. Every variant is a successful run; failures are
/// reported as errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoIssueNumber,
    SkippedAssigned,
    SkippedLabeled,
    Added {
        number: u64,
        added: Vec<String>,
    },
    Updated {
        number: u64,
        added: Vec<String>,
        removed: Vec<String>,
    },
}

impl Outcome {
    /// True when labels were written.
    pub fn is_update(&self) -> bool {
        matches!(self, Outcome::Added { .. } | Outcome::Updated { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoIssueNumber => write!(
                f,
                "No action being taken. Ignoring because issueNumber was not identified"
            ),
            Outcome::SkippedAssigned => write!(
                f,
                "No action being taken. Ignoring because one or more assignees have been added to the issue"
            ),
            Outcome::SkippedLabeled => write!(
                f,
                "No action being taken. Ignoring because one or more labels have been added to the issue"
            ),
            Outcome::Added { number, added } => {
                write!(f, "Updated labels in {number}. Added: {}.", added.join(","))
            }
            Outcome::Updated {
                number,
                added,
                removed,
            } => write!(
                f,
                "Updated labels in {number}. Added: {}. Removed: {}.",
                added.join(","),
                removed.join(",")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_parse() {
        let repo = Repo::parse("octo-org/octo-repo").unwrap();
        assert_eq!(repo.owner, "octo-org");
        assert_eq!(repo.name, "octo-repo");
        assert_eq!(repo.to_string(), "octo-org/octo-repo");
    }

    #[test]
    fn test_repo_parse_rejects_bad_formats() {
        assert_eq!(
            Repo::parse("just-a-name"),
            Err(RepoError::InvalidFormat("just-a-name".to_string()))
        );
        assert!(matches!(
            Repo::parse("a/b/c"),
            Err(RepoError::InvalidFormat(_))
        ));
        assert_eq!(Repo::parse("/repo"), Err(RepoError::EmptyOwner));
        assert_eq!(Repo::parse("owner/"), Err(RepoError::EmptyName));
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            Outcome::NoIssueNumber.to_string(),
            "No action being taken. Ignoring because issueNumber was not identified"
        );
        assert!(
            Outcome::SkippedAssigned
                .to_string()
                .starts_with("No action being taken.")
        );
        assert!(
            Outcome::SkippedLabeled
                .to_string()
                .starts_with("No action being taken.")
        );
        assert_eq!(
            Outcome::Added {
                number: 12,
                added: vec!["bug".into(), "triage".into()],
            }
            .to_string(),
            "Updated labels in 12. Added: bug,triage."
        );
        assert_eq!(
            Outcome::Updated {
                number: 12,
                added: vec!["b".into(), "c".into()],
                removed: vec!["a".into()],
            }
            .to_string(),
            "Updated labels in 12. Added: b,c. Removed: a."
        );
    }

    #[test]
    fn test_outcome_with_empty_add_list() {
        let outcome = Outcome::Added {
            number: 3,
            added: vec![],
        };
        assert!(outcome.is_update());
        assert_eq!(outcome.to_string(), "Updated labels in 3. Added: .");
        assert!(!Outcome::SkippedLabeled.is_update());
    }
}
