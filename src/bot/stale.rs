use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::bot::comment::{stale_pr_epilogue_comment, stale_pr_warning_comment, CommentMarker};
use crate::bot::RepositoryClient;
use crate::config::StalePrsConfig;
use crate::github::PullRequestNumber;

/// What happened to a single pull request during a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaleAction {
    /// The pull request had a recent enough commit.
    Fresh,
    /// A warning was posted.
    Warned,
    /// A warning should have been posted, but it already exists.
    AlreadyWarned,
    /// The epilogue was posted and the pull request was closed.
    Closed,
    /// The pull request should have been closed, but an epilogue already exists.
    /// This happens when somebody reopened the pull request manually.
    AlreadyClosed,
}

/// Goes through all open pull requests of the repository, warns about the ones without
/// recent commits and closes the ones that have been inactive for too long.
///
/// Pull requests are processed one by one; the first error aborts the sweep.
pub async fn process_prs<Client: RepositoryClient>(
    client: &Client,
    config: &StalePrsConfig,
) -> anyhow::Result<Vec<(PullRequestNumber, StaleAction)>> {
    process_prs_at(client, config, Utc::now()).await
}

pub async fn process_prs_at<Client: RepositoryClient>(
    client: &Client,
    config: &StalePrsConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<(PullRequestNumber, StaleAction)>> {
    let pull_requests = client
        .open_pull_requests()
        .await
        .with_context(|| format!("Cannot list open pull requests of {}", client.repository()))?;
    tracing::info!(
        "Checking {} open pull request(s) of {}",
        pull_requests.len(),
        client.repository()
    );

    let mut actions = Vec::with_capacity(pull_requests.len());
    for pr in pull_requests {
        let action = process_pr(client, config, pr, now)
            .await
            .with_context(|| format!("Cannot process {}#{pr}", client.repository()))?;
        actions.push((pr, action));
    }
    Ok(actions)
}

async fn process_pr<Client: RepositoryClient>(
    client: &Client,
    config: &StalePrsConfig,
    pr: PullRequestNumber,
    now: DateTime<Utc>,
) -> anyhow::Result<StaleAction> {
    let last_commit = client.last_commit_date(pr).await?;
    let elapsed = elapsed_since(last_commit, now);

    if elapsed < config.warn_after {
        tracing::debug!("-> OK pull request #{pr}");
        return Ok(StaleAction::Fresh);
    }

    if elapsed >= config.close_after {
        close_zone(client, config, pr).await
    } else {
        warn(client, config, pr).await
    }
}

/// A pull request that already received the epilogue is left alone, even when closing has
/// been disabled or the pull request got protected after being reopened.
async fn close_zone<Client: RepositoryClient>(
    client: &Client,
    config: &StalePrsConfig,
    pr: PullRequestNumber,
) -> anyhow::Result<StaleAction> {
    let existing = client
        .find_comments(pr, CommentMarker::StalePrEpilogue)
        .await?;
    if !existing.is_empty() {
        tracing::info!("-> Skipping pull request #{pr} (already closed)");
        return Ok(StaleAction::AlreadyClosed);
    }

    if !config.close_enabled {
        tracing::info!("-> Not closing pull request #{pr} (closing disabled)");
        return warn(client, config, pr).await;
    }
    if client
        .labels(pr)
        .await?
        .iter()
        .any(|label| label == &config.keep_open_label)
    {
        tracing::info!(
            "-> Not closing pull request #{pr} (protected by `{}` label)",
            config.keep_open_label
        );
        return warn(client, config, pr).await;
    }

    tracing::info!("-> CLOSING pull request #{pr}");
    client.post_comment(pr, stale_pr_epilogue_comment()).await?;
    client.close_pull_request(pr).await?;
    Ok(StaleAction::Closed)
}

async fn warn<Client: RepositoryClient>(
    client: &Client,
    config: &StalePrsConfig,
    pr: PullRequestNumber,
) -> anyhow::Result<StaleAction> {
    let existing = client
        .find_comments(pr, CommentMarker::StalePrWarning)
        .await?;
    if !existing.is_empty() {
        tracing::info!("-> Skipping pull request #{pr} (already warned)");
        return Ok(StaleAction::AlreadyWarned);
    }

    tracing::info!("-> WARNING pull request #{pr}");
    client
        .post_comment(
            pr,
            stale_pr_warning_comment(config.warn_after, config.close_after),
        )
        .await?;
    Ok(StaleAction::Warned)
}

/// Commits dated in the future count as brand new.
fn elapsed_since(time: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - time).to_std().unwrap_or_default()
}
