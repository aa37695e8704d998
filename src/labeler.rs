use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    cli::Config,
    event::{EventPayload, resolve_target},
    types::{Forge, Outcome, Target},
};

/// Computes the label set to write back: the current labels, then each
/// label to add that is not present yet, minus every label to remove.
pub fn next_label_set(current: Vec<String>, add: &[String], remove: &[String]) -> Vec<String> {
    let mut labels = current;
    for label in add {
        if !labels.contains(label) {
            labels.push(label.clone());
        }
    }
    labels.retain(|label| !remove.contains(label));
    labels
}

/// Resolves the target from the configuration and event payload, then
/// labels it.
pub async fn label_issue<F>(config: &Config, payload: &EventPayload, forge: &F) -> Result<Outcome>
where
    F: Forge + ?Sized,
{
    let target = resolve_target(config.issue_number, config.repository.as_deref(), payload)?;
    match target {
        Some(target) => apply_labels(config, &target, forge).await,
        None => Ok(Outcome::NoIssueNumber),
    }
}

/// Adds and removes labels on an already resolved target.
///
/// When the configuration asks for a skip check or for removals, the
/// issue is read first and its whole label set replaced. Otherwise the
/// labels are added without reading. An empty add list on that path
/// clears every label on the item.
pub async fn apply_labels<F>(config: &Config, target: &Target, forge: &F) -> Result<Outcome>
where
    F: Forge + ?Sized,
{
    let Target { repo, number } = target;
    let number = *number;

    if !config.needs_snapshot() {
        debug!(number, "Adding labels without reading the issue");
        forge
            .add_labels(repo, number, &config.add_labels)
            .await
            .with_context(|| {
                format!(
                    "Can not add labels to the issue number {} in {} repository",
                    number, repo
                )
            })?;
        info!(number, labels = ?config.add_labels, "Added labels");

        return Ok(Outcome::Added {
            number,
            added: config.add_labels.clone(),
        });
    }

    // Read fresh state: assignees or labels may have changed since the
    // event was emitted.
    let snapshot = forge.get_issue(repo, number).await.with_context(|| {
        format!(
            "Can not get information for issue number {} in {} repository",
            number, repo
        )
    })?;
    debug!(
        number,
        assignees = snapshot.assignees,
        labels = ?snapshot.labels,
        "Fetched issue"
    );

    if config.ignore_if_assigned && snapshot.assignees != 0 {
        return Ok(Outcome::SkippedAssigned);
    }
    if config.ignore_if_labeled && !snapshot.labels.is_empty() {
        return Ok(Outcome::SkippedLabeled);
    }

    let labels = next_label_set(snapshot.labels, &config.add_labels, &config.remove_labels);
    forge
        .replace_labels(repo, number, &labels)
        .await
        .with_context(|| {
            format!(
                "Can not update issue number {} in {} repository",
                number, repo
            )
        })?;
    info!(number, ?labels, "Replaced labels");

    Ok(Outcome::Updated {
        number,
        added: config.add_labels.clone(),
        removed: config.remove_labels.clone(),
    })
}
