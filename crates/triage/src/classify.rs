use chrono::{DateTime, Utc};
use triage_git_provider::models::{Comment, PullRequest, RequestedReviewer, Review, ReviewRequest};

/// The most recent qualifying comment or review by one party on one PR.
/// The default value sits at the epoch with an empty body and compares
/// before any real interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    pub body: String,
    pub at: DateTime<Utc>,
}

impl Interaction {
    pub fn before(&self, at: DateTime<Utc>) -> bool {
        self.at < at
    }

    /// Latest-wins reduction seeded with the default. Only a strictly later
    /// timestamp replaces the accumulator, independent of input order.
    pub fn latest(interactions: impl IntoIterator<Item = Interaction>) -> Interaction {
        interactions
            .into_iter()
            .fold(Interaction::default(), |latest, candidate| {
                if latest.before(candidate.at) {
                    candidate
                } else {
                    latest
                }
            })
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl From<&Review> for Interaction {
    fn from(review: &Review) -> Self {
        Self {
            body: review.body.clone(),
            at: review.published_at,
        }
    }
}

impl From<&Comment> for Interaction {
    fn from(comment: &Comment) -> Self {
        Self {
            body: comment.body.clone(),
            at: comment.published_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// My latest interaction is at or after the author's.
    Responded,
    /// The author spoke after I last did.
    AwaitingMyResponse,
}

impl Status {
    pub fn glyph(&self) -> &'static str {
        match self {
            Status::Responded => "✅",
            Status::AwaitingMyResponse => "⚠️",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Engagement {
    pub number: i64,
    pub title: String,
    pub permalink: String,
    pub status: Status,
    /// Whoever spoke last; their interaction carries the displayed body.
    pub speaker: String,
    pub latest: Interaction,
}

/// Decide whether `me` has a stake in a PR someone else authored, and if so
/// whose turn it is. Authored PRs and PRs without any engagement yield `None`.
pub fn classify(pr: &PullRequest, me: &str, teams: &[String]) -> Option<Engagement> {
    if pr.author == me {
        tracing::debug!("pr #{} authored by me, skipping", pr.number);
        return None;
    }

    let has_reviewed = pr.reviews.iter().any(|r| r.author == me);
    let has_commented = pr.comments.iter().any(|c| c.author == me);
    let has_been_requested = pr.review_requests.iter().any(|rr| targets(rr, me, teams));

    if !has_reviewed && !has_commented && !has_been_requested {
        return None;
    }

    let latest_me = Interaction::latest(
        pr.reviews
            .iter()
            .filter(|r| r.author == me)
            .map(Interaction::from)
            .chain(
                pr.comments
                    .iter()
                    .filter(|c| c.author == me)
                    .map(Interaction::from),
            ),
    );

    let latest_author = Interaction::latest(
        pr.comments
            .iter()
            .filter(|c| c.author == pr.author)
            .map(Interaction::from),
    );

    // Strict comparison: a tie means I already responded.
    let (status, speaker, latest) = if latest_me.before(latest_author.at) {
        (
            Status::AwaitingMyResponse,
            pr.author.clone(),
            latest_author,
        )
    } else {
        (Status::Responded, me.to_string(), latest_me)
    };

    Some(Engagement {
        number: pr.number,
        title: pr.title.clone(),
        permalink: pr.permalink.clone(),
        status,
        speaker,
        latest,
    })
}

/// PRs authored by `me`, in fetch order.
pub fn authored<'a>(
    pull_requests: &'a [PullRequest],
    me: &'a str,
) -> impl Iterator<Item = &'a PullRequest> {
    pull_requests.iter().filter(move |pr| pr.author == me)
}

fn targets(request: &ReviewRequest, me: &str, teams: &[String]) -> bool {
    match &request.reviewer {
        RequestedReviewer::User { login } => login == me,
        RequestedReviewer::Team { name } => teams.iter().any(|team| team == name),
    }
}
