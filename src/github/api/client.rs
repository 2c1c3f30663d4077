use anyhow::Context;
use axum::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::bot::{Comment, CommentMarker, RepositoryClient};
use crate::github::{CommentId, GithubRepoName, PullRequestNumber};

/// Maximum page size allowed by the GitHub REST API.
const PAGE_SIZE: usize = 100;

/// Provides access to a single repository of an app installation using the GitHub API.
pub struct GithubRepositoryClient {
    pub client: Octocrab,
    pub repo_name: GithubRepoName,
}

impl GithubRepositoryClient {
    pub fn client(&self) -> &Octocrab {
        &self.client
    }

    pub fn name(&self) -> &GithubRepoName {
        &self.repo_name
    }

    fn format_pr(&self, pr: PullRequestNumber) -> String {
        format!("{}/{}/{}", self.name().owner(), self.name().name(), pr)
    }

    fn repo_route(&self, route: &str) -> String {
        format!(
            "/repos/{}/{}/{route}",
            self.repo_name.owner(),
            self.repo_name.name()
        )
    }

    /// Loads all items of a paginated list endpoint.
    async fn get_all_pages<T: DeserializeOwned>(&self, route: &str) -> anyhow::Result<Vec<T>> {
        #[derive(Serialize)]
        struct PageParams {
            per_page: usize,
            page: usize,
        }

        let mut items = vec![];
        let mut page = 1;
        loop {
            let batch: Vec<T> = self
                .client
                .get(
                    route,
                    Some(&PageParams {
                        per_page: PAGE_SIZE,
                        page,
                    }),
                )
                .await
                .with_context(|| format!("Cannot load page {page} of {route}"))?;
            let last_page = batch.len() < PAGE_SIZE;
            items.extend(batch);
            if last_page {
                return Ok(items);
            }
            page += 1;
        }
    }
}

#[derive(Deserialize, Debug)]
struct PullRequestPayload {
    number: u64,
}

#[derive(Deserialize, Debug)]
struct LabelPayload {
    name: String,
}

#[derive(Deserialize, Debug)]
struct CommitPayload {
    commit: CommitDetails,
}

#[derive(Deserialize, Debug)]
struct CommitDetails {
    committer: Option<GitActor>,
}

#[derive(Deserialize, Debug)]
struct GitActor {
    date: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
struct CommentPayload {
    id: u64,
    body: Option<String>,
}

#[derive(Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct UpdateStateRequest<'a> {
    state: &'a str,
}

#[async_trait]
impl RepositoryClient for GithubRepositoryClient {
    fn repository(&self) -> &GithubRepoName {
        self.name()
    }

    // https://docs.github.com/en/rest/pulls/pulls?apiVersion=2022-11-28#list-pull-requests
    async fn open_pull_requests(&self) -> anyhow::Result<Vec<PullRequestNumber>> {
        let prs: Vec<PullRequestPayload> = self
            .get_all_pages(&self.repo_route("pulls"))
            .await
            .with_context(|| format!("Cannot list pull requests of {}", self.name()))?;
        Ok(prs.into_iter().map(|pr| pr.number.into()).collect())
    }

    async fn labels(&self, pr: PullRequestNumber) -> anyhow::Result<Vec<String>> {
        let labels: Vec<LabelPayload> = self
            .get_all_pages(&self.repo_route(&format!("issues/{pr}/labels")))
            .await
            .with_context(|| format!("Cannot load labels of {}", self.format_pr(pr)))?;
        Ok(labels.into_iter().map(|label| label.name).collect())
    }

    /// Uses the committer date, so that rebasing a pull request counts as activity.
    async fn last_commit_date(&self, pr: PullRequestNumber) -> anyhow::Result<DateTime<Utc>> {
        let commits: Vec<CommitPayload> = self
            .get_all_pages(&self.repo_route(&format!("pulls/{pr}/commits")))
            .await
            .with_context(|| format!("Cannot load commits of {}", self.format_pr(pr)))?;
        commits
            .into_iter()
            .filter_map(|commit| commit.commit.committer.map(|committer| committer.date))
            .max()
            .ok_or_else(|| anyhow::anyhow!("{} has no dated commits", self.format_pr(pr)))
    }

    async fn find_comments(
        &self,
        pr: PullRequestNumber,
        marker: CommentMarker,
    ) -> anyhow::Result<Vec<CommentId>> {
        let comments: Vec<CommentPayload> = self
            .get_all_pages(&self.repo_route(&format!("issues/{pr}/comments")))
            .await
            .with_context(|| format!("Cannot load comments of {}", self.format_pr(pr)))?;
        Ok(comments
            .into_iter()
            .filter(|comment| {
                comment
                    .body
                    .as_deref()
                    .is_some_and(|body| marker.is_present_in(body))
            })
            .map(|comment| comment.id.into())
            .collect())
    }

    /// The comment will be posted as the GitHub App user of the bot.
    // https://docs.github.com/en/rest/issues/comments?apiVersion=2022-11-28#create-an-issue-comment
    async fn post_comment(&self, pr: PullRequestNumber, comment: Comment) -> anyhow::Result<()> {
        let body = comment.render();
        let response = self
            .client
            ._post(
                self.repo_route(&format!("issues/{pr}/comments")),
                Some(&CreateCommentRequest { body: &body }),
            )
            .await
            .with_context(|| format!("Cannot post comment to {}", self.format_pr(pr)))?;

        let status = response.status();
        if !status.is_success() {
            let text = self
                .client
                .body_to_string(response)
                .await
                .unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Cannot post comment to {} ({status}): {text}",
                self.format_pr(pr)
            ));
        }
        Ok(())
    }

    // https://docs.github.com/en/rest/issues/issues?apiVersion=2022-11-28#update-an-issue
    async fn close_pull_request(&self, pr: PullRequestNumber) -> anyhow::Result<()> {
        let response = self
            .client
            ._patch(
                self.repo_route(&format!("issues/{pr}")),
                Some(&UpdateStateRequest { state: "closed" }),
            )
            .await
            .with_context(|| format!("Cannot close {}", self.format_pr(pr)))?;

        let status = response.status();
        tracing::trace!("Closing {} response: status={status}", self.format_pr(pr));
        if !status.is_success() {
            let text = self
                .client
                .body_to_string(response)
                .await
                .unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Cannot close {} ({status}): {text}",
                self.format_pr(pr)
            ));
        }
        Ok(())
    }
}
