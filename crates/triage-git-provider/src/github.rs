use anyhow::Context;
use async_trait::async_trait;
use graphql_client::{QueryBody, Response};
use reqwest::Client;
use which::which;

use crate::{
    models::{
        Comment, PullRequest, RepoActivity, RequestedReviewer, Review, ReviewRequest, ReviewState,
    },
    traits::PullRequestFeed,
    Provider,
};

/// First page only; nested cursors are decoded but never followed.
const PAGE_SIZE: i64 = 100;

const OPEN_STATES: &[&str] = &["OPEN"];

/// Review states that count as engagement. APPROVED is deliberately absent:
/// an approved PR no longer needs a response from the reviewer.
const QUALIFYING_REVIEW_STATES: &[&str] =
    &["COMMENTED", "CHANGES_REQUESTED", "DISMISSED", "PENDING"];

const PULL_REQUESTS_QUERY: &str = r#"
query OpenPullRequests($owner: String!, $name: String!, $states: [PullRequestState!], $last: Int, $reviewAuthor: String!, $reviewStates: [PullRequestReviewState!]) {
  repository(owner: $owner, name: $name) {
    description
    pullRequests(states: $states, last: $last) {
      nodes {
        author { login }
        number
        permalink
        title
        comments(orderBy: {field: UPDATED_AT, direction: DESC}, last: 10) {
          nodes { author { login } publishedAt body }
          pageInfo { endCursor hasNextPage }
        }
        reviews(author: $reviewAuthor, states: $reviewStates, last: 1) {
          nodes { author { login } publishedAt state body }
          pageInfo { endCursor hasNextPage }
        }
        reviewRequests(last: 10) {
          nodes {
            requestedReviewer {
              __typename
              ... on User { login }
              ... on Team { name }
            }
            asCodeOwner
          }
          pageInfo { endCursor hasNextPage }
        }
      }
      pageInfo { endCursor hasNextPage }
    }
  }
}
"#;

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Variables<'a> {
    owner: &'a str,
    name: &'a str,
    states: &'static [&'static str],
    last: i64,
    review_author: &'a str,
    review_states: &'static [&'static str],
}

mod wire {
    use serde::Deserialize;

    pub type DateTime = chrono::DateTime<chrono::Utc>;

    #[derive(Deserialize, Debug)]
    pub struct ResponseData {
        pub repository: Option<Repository>,
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct Repository {
        pub description: Option<String>,
        pub pull_requests: Connection<PullRequest>,
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct Connection<T> {
        pub nodes: Option<Vec<Option<T>>>,
        #[allow(dead_code)]
        pub page_info: PageInfo,
    }

    impl<T> Connection<T> {
        pub fn into_nodes(self) -> impl Iterator<Item = T> {
            self.nodes.unwrap_or_default().into_iter().flatten()
        }
    }

    // Cursors are requested but first-page consumption never follows them.
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    #[allow(dead_code)]
    pub struct PageInfo {
        pub end_cursor: Option<String>,
        pub has_next_page: bool,
    }

    #[derive(Deserialize, Debug)]
    pub struct Actor {
        pub login: String,
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct PullRequest {
        pub author: Option<Actor>,
        pub number: i64,
        pub permalink: String,
        pub title: String,
        pub comments: Connection<Comment>,
        pub reviews: Connection<Review>,
        pub review_requests: Connection<ReviewRequest>,
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct Comment {
        pub author: Option<Actor>,
        pub published_at: Option<DateTime>,
        pub body: String,
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct Review {
        pub author: Option<Actor>,
        pub published_at: Option<DateTime>,
        pub state: ReviewState,
        pub body: String,
    }

    #[derive(Deserialize, Debug, Clone, Copy)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum ReviewState {
        Commented,
        ChangesRequested,
        Dismissed,
        Pending,
        Approved,
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct ReviewRequest {
        pub requested_reviewer: Option<RequestedReviewer>,
        pub as_code_owner: bool,
    }

    #[derive(Deserialize, Debug)]
    #[serde(tag = "__typename")]
    pub enum RequestedReviewer {
        User {
            login: String,
        },
        Team {
            name: String,
        },
        /// Mannequins and bots can also be requested; they never match.
        #[serde(other)]
        Other,
    }
}

pub struct Github {
    client: reqwest::Client,
    uri: String,
}

pub struct GithubOptions {
    pub uri: String,
    /// Explicit token; wins over any discovery.
    pub token: Option<String>,
    /// Fall back to `gh auth token` when no explicit token is set.
    pub use_gh: bool,
}

impl Default for GithubOptions {
    fn default() -> Self {
        Self {
            uri: "https://api.github.com/graphql".into(),
            token: None,
            use_gh: true,
        }
    }
}

impl Github {
    pub fn new(options: GithubOptions) -> anyhow::Result<Self> {
        let token = resolve_token(&options)?;

        let client = Client::builder()
            .user_agent("graphql-rust/0.10.0")
            .default_headers(
                std::iter::once((
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))?,
                ))
                .collect(),
            )
            .build()?;

        Ok(Self {
            client,
            uri: options.uri,
        })
    }
}

fn resolve_token(options: &GithubOptions) -> anyhow::Result<String> {
    if let Some(token) = &options.token {
        return Ok(token.clone());
    }

    if options.use_gh {
        if let Some(token) = gh_auth_token() {
            return Ok(token);
        }
    }

    tracing::debug!("falling back on GITHUB_API_TOKEN");
    std::env::var("GITHUB_API_TOKEN").context("GITHUB_API_TOKEN was not found")
}

fn gh_auth_token() -> Option<String> {
    which("gh")
        .ok()
        .filter(|p| {
            if p.exists() {
                tracing::debug!("gh is on path");
                true
            } else {
                tracing::debug!("gh is not on path");
                false
            }
        })
        .and_then(|p| {
            std::process::Command::new(p)
                .arg("auth")
                .arg("token")
                .output()
                .ok()
                .filter(|o| o.status.success())
                .and_then(|o| {
                    let token = std::str::from_utf8(&o.stdout).ok().map(|s| s.to_string());
                    if token.is_some() {
                        tracing::trace!("found github token using gh");
                    }
                    token
                })
                .map(|s| s.trim().to_string())
        })
}

struct AggregateGraphQLError {
    errors: Vec<graphql_client::Error>,
}

impl std::fmt::Display for AggregateGraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GitHub error: {:?}", self.errors)
    }
}

impl std::fmt::Debug for AggregateGraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GitHub error: {:?}", self.errors)
    }
}

impl std::error::Error for AggregateGraphQLError {}

#[async_trait]
impl PullRequestFeed for Github {
    async fn open_pull_requests(
        &self,
        owner: &str,
        name: &str,
        review_author: &str,
    ) -> anyhow::Result<RepoActivity> {
        let body = QueryBody {
            variables: Variables {
                owner,
                name,
                states: OPEN_STATES,
                last: PAGE_SIZE,
                review_author,
                review_states: QUALIFYING_REVIEW_STATES,
            },
            query: PULL_REQUESTS_QUERY,
            operation_name: "OpenPullRequests",
        };

        let res = self
            .client
            .post(&self.uri)
            .json(&body)
            .send()
            .await
            .context("github call graphql query failed")?;

        if !res.status().is_success() {
            let error_body = res.text().await?;
            tracing::error!("GraphQL Error: {}", error_body);
            anyhow::bail!("failed to query graphql endpoint");
        }

        let resp: Response<wire::ResponseData> = res
            .json()
            .await
            .context("failed to get json from response")?;

        if let Some(errors) = resp.errors {
            let error = AggregateGraphQLError { errors };
            anyhow::bail!("open_pull_requests failed with: {}", error);
        }

        let repo = resp
            .data
            .context("data to be present")?
            .repository
            .context("repository to be present")?;

        let activity = into_activity(repo);
        tracing::debug!(
            "fetched {} open pull requests",
            activity.pull_requests.len()
        );

        Ok(activity)
    }
}

fn into_activity(repo: wire::Repository) -> RepoActivity {
    let pull_requests = repo
        .pull_requests
        .into_nodes()
        .map(|pr| PullRequest {
            number: pr.number,
            author: login_of(pr.author),
            title: pr.title,
            permalink: pr.permalink,
            comments: pr
                .comments
                .into_nodes()
                .map(|c| Comment {
                    author: login_of(c.author),
                    published_at: c.published_at.unwrap_or_default(),
                    body: c.body,
                })
                .collect(),
            reviews: pr
                .reviews
                .into_nodes()
                .map(|r| Review {
                    author: login_of(r.author),
                    published_at: r.published_at.unwrap_or_default(),
                    state: r.state.into(),
                    body: r.body,
                })
                .collect(),
            review_requests: pr
                .review_requests
                .into_nodes()
                .filter_map(|rr| {
                    let reviewer = match rr.requested_reviewer? {
                        wire::RequestedReviewer::User { login } => {
                            RequestedReviewer::User { login }
                        }
                        wire::RequestedReviewer::Team { name } => RequestedReviewer::Team { name },
                        wire::RequestedReviewer::Other => return None,
                    };

                    Some(ReviewRequest {
                        reviewer,
                        as_code_owner: rr.as_code_owner,
                    })
                })
                .collect(),
        })
        .collect();

    RepoActivity {
        description: repo.description,
        pull_requests,
    }
}

fn login_of(actor: Option<wire::Actor>) -> String {
    actor.map(|a| a.login).unwrap_or_default()
}

impl From<wire::ReviewState> for ReviewState {
    fn from(state: wire::ReviewState) -> Self {
        match state {
            wire::ReviewState::Commented => ReviewState::Commented,
            wire::ReviewState::ChangesRequested => ReviewState::ChangesRequested,
            wire::ReviewState::Dismissed => ReviewState::Dismissed,
            wire::ReviewState::Pending => ReviewState::Pending,
            wire::ReviewState::Approved => ReviewState::Approved,
        }
    }
}

impl Provider for Github {}
