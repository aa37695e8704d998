use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Raw invocation inputs. GitHub Actions hands `with:` inputs to the
/// step as `INPUT_<NAME>` environment variables, so every option can be
/// set either way.
#[derive(Parser, Debug)]
#[command(
    name = "issue-labeler",
    about = "Add or remove labels on the issue, pull request or project card that triggered a workflow"
)]
#[command(version, long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Comma-separated labels to add
    #[arg(long, env = "INPUT_ADD-LABELS", default_value = "", value_name = "LABELS")]
    add_labels: String,

    /// Comma-separated labels to remove
    #[arg(
        long,
        env = "INPUT_REMOVE-LABELS",
        default_value = "",
        value_name = "LABELS"
    )]
    remove_labels: String,

    /// Issue, pull request or card number to label instead of the one in the event
    #[arg(long, env = "INPUT_ISSUE-NUMBER", default_value = "", value_name = "NUMBER")]
    issue_number: String,

    /// Token used to call the GitHub API
    #[arg(long, env = "INPUT_REPO-TOKEN", hide_env_values = true, value_name = "TOKEN")]
    repo_token: Option<String>,

    /// Do nothing when the item already has an assignee
    #[arg(
        long,
        env = "INPUT_IGNORE-IF-ASSIGNED",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "",
        default_missing_value = "true",
        value_parser = parse_flag,
        value_name = "BOOL"
    )]
    ignore_if_assigned: bool,

    /// Do nothing when the item already has a label
    #[arg(
        long,
        env = "INPUT_IGNORE-IF-LABELED",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "",
        default_missing_value = "true",
        value_parser = parse_flag,
        value_name = "BOOL"
    )]
    ignore_if_labeled: bool,

    /// Path of the JSON payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH", value_name = "FILE")]
    event_path: Option<PathBuf>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, value_name = "URL")]
    api_url: String,

    /// Repository used when the event payload does not name one
    #[arg(long, env = "GITHUB_REPOSITORY", value_name = "OWNER/REPO")]
    repository: Option<String>,
}

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub add_labels: Vec<String>,
    pub remove_labels: Vec<String>,
    pub issue_number: Option<u64>,
    pub repo_token: Option<String>,
    pub ignore_if_assigned: bool,
    pub ignore_if_labeled: bool,
    pub event_path: Option<PathBuf>,
    pub api_url: String,
    pub repository: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            add_labels: Vec::new(),
            remove_labels: Vec::new(),
            issue_number: None,
            repo_token: None,
            ignore_if_assigned: false,
            ignore_if_labeled: false,
            event_path: None,
            api_url: DEFAULT_API_URL.to_string(),
            repository: None,
        }
    }
}

impl Config {
    /// Whether the current issue state has to be read before writing.
    ///
    /// Decided from configuration alone, never from what the issue
    /// currently looks like.
    pub fn needs_snapshot(&self) -> bool {
        self.ignore_if_assigned || self.ignore_if_labeled || !self.remove_labels.is_empty()
    }
}

/// Splits a comma-separated label list, trimming each entry and
/// dropping empty ones. Order and duplicates are kept.
pub fn split_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Interprets a boolean action input. An empty value means "off".
pub fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "off" | "0" => Ok(false),
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        other => anyhow::bail!(
            "Invalid boolean value '{}'. Supported values: true/false, yes/no, on/off, 1/0",
            other
        ),
    }
}

fn parse_issue_number(raw: &str) -> Result<Option<u64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let number: u64 = raw
        .parse()
        .with_context(|| format!("Invalid issue number: '{}'", raw))?;
    if number == 0 {
        anyhow::bail!("Issue number must be positive, got: '{}'", raw);
    }

    Ok(Some(number))
}

fn build_config(cli: CliArgs) -> Result<Config> {
    let issue_number = parse_issue_number(&cli.issue_number)?;

    Ok(Config {
        add_labels: split_labels(&cli.add_labels),
        remove_labels: split_labels(&cli.remove_labels),
        issue_number,
        repo_token: cli
            .repo_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty()),
        ignore_if_assigned: cli.ignore_if_assigned,
        ignore_if_labeled: cli.ignore_if_labeled,
        event_path: cli.event_path.filter(|path| !path.as_os_str().is_empty()),
        api_url: cli.api_url,
        repository: cli.repository.filter(|repo| !repo.trim().is_empty()),
    })
}

/// Parses command-line arguments and `INPUT_*` environment variables
/// into a [`Config`].
///
/// Help and version requests come back as a `clap::Error` inside the
/// returned error so the caller can decide how to exit.
pub fn parse_args<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    build_config(cli)
}
