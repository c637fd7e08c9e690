use async_trait::async_trait;

use crate::models::RepoActivity;

#[async_trait]
pub trait PullRequestFeed {
    /// Fetch the first page of open pull requests for a repository, including
    /// recent comments, the review author's latest qualifying review and any
    /// pending review requests.
    async fn open_pull_requests(
        &self,
        owner: &str,
        name: &str,
        review_author: &str,
    ) -> anyhow::Result<RepoActivity>;
}
