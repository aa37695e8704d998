//! issue-labeler: adjusts the labels of the issue, pull request or
//! project card that triggered a GitHub Actions workflow.
//!
//! A run resolves the target number from the action inputs and the
//! event payload, optionally reads the item's current assignees and
//! labels to decide whether to act, then makes one write call to add
//! labels or to replace the full label set.

pub mod actions;
pub mod cli;
pub mod event;
pub mod github;
pub mod labeler;
pub mod types;

pub use cli::{Config, parse_args, parse_flag, split_labels};
pub use event::{EventPayload, resolve_issue_number, resolve_target};
pub use github::{GitHub, resolve_token, setup_github_client};
pub use labeler::{apply_labels, label_issue, next_label_set};
pub use types::{Forge, IssueSnapshot, Outcome, Repo, RepoError, Target};
