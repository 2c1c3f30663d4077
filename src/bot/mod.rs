use axum::async_trait;
use chrono::{DateTime, Utc};

use crate::github::{CommentId, GithubRepoName, PullRequestNumber};

mod comment;
mod process;
mod stale;

pub use comment::{
    stale_pr_epilogue_comment, stale_pr_warning_comment, Comment, CommentMarker,
    PRS_CLOSE_EPILOGUE, PRS_CLOSE_WARNING,
};
pub use process::{create_sweep_process, SweepProcess, SweepRequest, SweepSender};
pub use stale::{process_prs, process_prs_at, StaleAction};

/// Provides functionality for working with a remote repository.
#[async_trait]
pub trait RepositoryClient {
    fn repository(&self) -> &GithubRepoName;

    /// Return the numbers of all open pull requests of the repository.
    async fn open_pull_requests(&self) -> anyhow::Result<Vec<PullRequestNumber>>;

    /// Return the names of labels attached to the given pull request.
    async fn labels(&self, pr: PullRequestNumber) -> anyhow::Result<Vec<String>>;

    /// Return the time of the most recent commit of the given pull request.
    async fn last_commit_date(&self, pr: PullRequestNumber) -> anyhow::Result<DateTime<Utc>>;

    /// Find comments on the given pull request that were posted with the given marker.
    async fn find_comments(
        &self,
        pr: PullRequestNumber,
        marker: CommentMarker,
    ) -> anyhow::Result<Vec<CommentId>>;

    /// Post a comment to the pull request with the given number.
    async fn post_comment(&self, pr: PullRequestNumber, comment: Comment) -> anyhow::Result<()>;

    /// Close the pull request with the given number.
    async fn close_pull_request(&self, pr: PullRequestNumber) -> anyhow::Result<()>;
}

/// Creates repository clients for repositories named in sweep requests.
/// It is behind a trait to allow easier mocking in tests.
pub trait RepositoryLoader {
    type Client: RepositoryClient + Send + Sync;

    fn load_repository(&self, repository: &str, installation: &str)
        -> anyhow::Result<Self::Client>;
}
