use triage_git_provider::models::{PullRequest, RepoActivity};

use crate::classify::{self, Engagement};

const SHORT_LEN: usize = 100;

/// Bodies over 100 characters are cut and suffixed with an ellipsis.
/// Characters, not bytes, so multi-byte content never splits mid-scalar.
fn short_body(body: &str) -> String {
    if body.chars().count() <= SHORT_LEN {
        return body.to_string();
    }

    let mut short: String = body.chars().take(SHORT_LEN).collect();
    short.push_str("...");
    short
}

fn authored_line(pr: &PullRequest) -> String {
    format!("#{}, {}", pr.number, pr.permalink)
}

fn engagement_lines(engagement: &Engagement) -> String {
    let mut out = format!(
        "{} #{} -- {} -- {}",
        engagement.status.glyph(),
        engagement.number,
        engagement.title,
        engagement.permalink
    );

    if !engagement.latest.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "\t{} - {}",
            engagement.speaker,
            short_body(&engagement.latest.body)
        ));
    }

    out
}

pub fn print(activity: &RepoActivity, me: &str, teams: &[String]) {
    println!("{}", activity.description.as_deref().unwrap_or_default());

    println!("My PRs\n");
    for pr in classify::authored(&activity.pull_requests, me) {
        println!("{}", authored_line(pr));
    }

    println!("\nPRs engaged with\n");
    for pr in &activity.pull_requests {
        if let Some(engagement) = classify::classify(pr, me, teams) {
            println!("{}", engagement_lines(&engagement));
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use crate::classify::{Interaction, Status};

    use super::*;

    #[test]
    fn test_short_body_boundaries() {
        let exact: String = "a".repeat(100);
        assert_eq!(short_body(&exact), exact);

        let over: String = "a".repeat(101);
        let expected = format!("{}...", "a".repeat(100));
        assert_eq!(short_body(&over), expected);

        let multibyte: String = "é".repeat(101);
        assert_eq!(short_body(&multibyte), format!("{}...", "é".repeat(100)));
    }

    #[test]
    fn test_authored_line() {
        let pr = PullRequest {
            number: 11,
            author: "bob".into(),
            title: "My change".into(),
            permalink: "https://github.com/acme/payments/pull/11".into(),
            comments: Vec::new(),
            reviews: Vec::new(),
            review_requests: Vec::new(),
        };

        assert_eq!(
            authored_line(&pr),
            "#11, https://github.com/acme/payments/pull/11"
        );
    }

    #[test]
    fn test_engagement_lines_truncate_the_snippet() {
        let body = "addressed your comment, please re-review now please take a look thanks very much for your time today and tomorrow";
        assert!(body.chars().count() > 100);

        let engagement = Engagement {
            number: 10,
            title: "Add refunds".into(),
            permalink: "https://github.com/acme/payments/pull/10".into(),
            status: Status::AwaitingMyResponse,
            speaker: "alice".into(),
            latest: Interaction {
                body: body.into(),
                at: chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            },
        };

        let rendered = engagement_lines(&engagement);
        let mut lines = rendered.lines();
        assert_eq!(
            lines.next().unwrap(),
            "⚠️ #10 -- Add refunds -- https://github.com/acme/payments/pull/10"
        );

        let snippet = lines.next().unwrap();
        assert!(snippet.starts_with("\talice - addressed your comment"));
        assert!(snippet.ends_with("..."));
        // speaker, separator, 100 characters, ellipsis
        assert_eq!(snippet.chars().count(), "\talice - ".chars().count() + 100 + 3);
    }

    #[test]
    fn test_engagement_lines_without_a_body() {
        let engagement = Engagement {
            number: 14,
            title: "Waiting".into(),
            permalink: "https://github.com/acme/payments/pull/14".into(),
            status: Status::Responded,
            speaker: "bob".into(),
            latest: Interaction::default(),
        };

        let rendered = engagement_lines(&engagement);
        assert_eq!(
            rendered,
            "✅ #14 -- Waiting -- https://github.com/acme/payments/pull/14"
        );
    }

    #[test]
    fn test_verbatim_body_is_kept() {
        let engagement = Engagement {
            number: 10,
            title: "Add refunds".into(),
            permalink: "https://github.com/acme/payments/pull/10".into(),
            status: Status::Responded,
            speaker: "bob".into(),
            latest: Interaction {
                body: "looks fine".into(),
                at: chrono::Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
            },
        };

        let rendered = engagement_lines(&engagement);
        assert!(rendered.ends_with("\tbob - looks fine"));
    }
}
