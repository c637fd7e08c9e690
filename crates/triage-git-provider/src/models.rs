#[derive(Debug, Clone)]
pub struct RepoActivity {
    pub description: Option<String>,
    pub pull_requests: Vec<PullRequest>,
}

#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: i64,
    /// Login of the PR author. Empty when the account has been deleted.
    pub author: String,
    pub title: String,
    pub permalink: String,
    pub comments: Vec<Comment>,
    pub reviews: Vec<Review>,
    pub review_requests: Vec<ReviewRequest>,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub author: String,
    pub published_at: chrono::DateTime<chrono::Utc>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct Review {
    pub author: String,
    /// Pending reviews have no publication time; those decode to the epoch.
    pub published_at: chrono::DateTime<chrono::Utc>,
    pub state: ReviewState,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Commented,
    ChangesRequested,
    Dismissed,
    Pending,
    Approved,
}

#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub reviewer: RequestedReviewer,
    pub as_code_owner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedReviewer {
    User { login: String },
    Team { name: String },
}
