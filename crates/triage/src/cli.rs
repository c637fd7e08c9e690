use clap::Parser;
use triage_git_provider::{github::GithubOptions, GitProvider};

use crate::{config::Config, report};

#[derive(Parser)]
#[command(author, version, about = "who still owes a response on your pull requests")]
pub struct Command {
    /// GitHub login the report is about
    #[arg(long, env = "TRIAGE_ME")]
    me: String,

    /// Repository owner
    #[arg(long, env = "TRIAGE_OWNER")]
    owner: String,

    /// Repository name
    #[arg(long, env = "TRIAGE_REPO")]
    repo: String,

    /// API token; when absent the provider asks `gh auth token`
    #[arg(long, env = "GITHUB_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Team names whose review requests count as addressed to me
    #[arg(long, env = "TRIAGE_TEAMS", value_delimiter = ',', default_value = "Backend")]
    teams: Vec<String>,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Command::parse();

    let config = Config {
        me: cli.me,
        owner: cli.owner,
        repo: cli.repo,
        teams: cli.teams,
    };

    let provider = GitProvider::github(GithubOptions {
        token: cli.token,
        ..Default::default()
    })?;

    tracing::info!(
        "fetching open pull requests for {}/{}",
        config.owner,
        config.repo
    );
    let activity = match provider
        .open_pull_requests(&config.owner, &config.repo, &config.me)
        .await
    {
        Ok(activity) => activity,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e);
        }
    };

    report::print(&activity, &config.me, &config.teams);

    Ok(())
}
