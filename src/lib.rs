pub mod args;

pub use args::Args;

use github_client::GithubClientBuilder;
use org_stats::api::Result;
use org_stats::diagnostics::LogDiagnostics;
use org_stats::{Filters, OrgStats, Options, Stats, UserStats};
use std::sync::Arc;

pub async fn gather_org_stats(args: &Args) -> Result<Stats> {
    let mut client = GithubClientBuilder::default().with_github_url(&args.api_url);
    if let Some(token) = args.api_token.clone() {
        client = client.try_with_token(token)?;
    }
    let client = client.build()?;

    let options = Options {
        org: args.org.clone(),
        filters: Filters::new(&args.deny, &args.allow),
        since: args.since,
        include_reviews: args.include_reviews,
        exclude_forks: args.exclude_forks,
    };
    let org_stats = OrgStats::with_diagnostics(client, Arc::new(LogDiagnostics::new(args.verbose)));
    org_stats.gather(&options).await
}

/// Users by lines changed, most first. Ties are broken by login. `top == 0` keeps everyone.
pub fn leaderboard(stats: &Stats, top: usize) -> Vec<(String, UserStats)> {
    let mut board: Vec<(String, UserStats)> = stats
        .logins()
        .into_iter()
        .map(|login| {
            let user = stats.get(&login);
            (login, user)
        })
        .collect();
    board.sort_by(|(a_login, a), (b_login, b)| {
        (b.additions + b.deletions)
            .cmp(&(a.additions + a.deletions))
            .then_with(|| a_login.cmp(b_login))
    });
    if top > 0 {
        board.truncate(top);
    }
    board
}
