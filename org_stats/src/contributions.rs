use crate::api::{Client, Repo, Result};
use crate::fetcher::RetryingFetcher;
use crate::filters::Filters;
use crate::members::Members;
use crate::stats::Stats;
use log::Level;

/// What to count while walking repositories.
#[derive(Debug, Clone, Copy)]
pub struct Collection<'a> {
    pub org: &'a str,
    pub filters: &'a Filters,
    pub members: &'a Members,
    pub exclude_forks: bool,
}

impl Collection<'_> {
    /// Members and allow-listed users count, unless deny-listed.
    fn includes_user(&self, login: &str, fetcher: &RetryingFetcher<'_>) -> bool {
        if !self.members.contains(login) && !self.filters.is_user_allowed(login) {
            fetcher
                .diagnostics()
                .emit(Level::Debug, &format!("ignoring non-organization member: {}", login));
            return false;
        }
        if self.filters.is_user_denied(login) {
            fetcher
                .diagnostics()
                .emit(Level::Debug, &format!("ignoring denied author: {}", login));
            return false;
        }
        true
    }

    fn includes_repo<R: Repo + ?Sized>(&self, repo: &R, fetcher: &RetryingFetcher<'_>) -> bool {
        if self.exclude_forks && repo.is_fork() {
            fetcher
                .diagnostics()
                .emit(Level::Debug, &format!("ignoring forked repo: {}", repo.name()));
            return false;
        }
        if self.filters.is_repo_denied(repo.name()) {
            fetcher
                .diagnostics()
                .emit(Level::Debug, &format!("ignoring denied repo: {}", repo.name()));
            return false;
        }
        true
    }
}

/// Folds the contributor statistics of every counted repository into `stats`, one repository
/// at a time, in the given order.
pub async fn collect_contributions<C>(
    client: &C,
    fetcher: &RetryingFetcher<'_>,
    collection: Collection<'_>,
    repos: &[C::Repository],
    stats: &mut Stats,
) -> Result<()>
where
    C: Client + ?Sized,
{
    let org = collection.org;
    for repo in repos.iter().filter(|repo| collection.includes_repo(*repo, fetcher)) {
        let name = repo.name();
        let operation = format!("contributor stats for {}/{}", org, name);
        let contributors = fetcher
            .fetch(&operation, || client.contributor_stats(org, name))
            .await?;
        for contributor in &contributors {
            let login = match contributor.login.as_deref() {
                Some(login) if !login.is_empty() => login,
                _ => continue,
            };
            if !collection.includes_user(login, fetcher) {
                continue;
            }
            fetcher.diagnostics().emit(
                Level::Debug,
                &format!("recording stats for {} on repo {}", login, name),
            );
            stats.add_contribution(contributor);
        }
    }
    Ok(())
}
