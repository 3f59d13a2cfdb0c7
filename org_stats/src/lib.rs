//! Organization contribution statistics
//!
//! # Overview
//!
//! Aggregates per-user activity across every repository of a GitHub organization: lines added,
//! lines deleted and commits from the weekly contributor statistics of each repository, and
//! optionally the number of pull requests each user reviewed.
//!
//! Only organization members are counted, plus users named on the allow-list. Users and
//! repositories on the deny-list are never counted. Weeks starting before the `since` cutoff
//! are ignored, and with a cutoff set users without any remaining activity are left out.
//!
//! Upstream rate limits and "statistics not ready yet" answers are waited out and retried;
//! any other failure aborts the whole run.

pub mod api;
pub mod diagnostics;

#[cfg(feature = "aggregator")]
mod contributions;
#[cfg(feature = "aggregator")]
pub mod fetcher;
#[cfg(feature = "aggregator")]
pub mod filters;
#[cfg(feature = "aggregator")]
pub mod members;
#[cfg(feature = "aggregator")]
pub mod paginator;
#[cfg(feature = "aggregator")]
pub mod repos;
#[cfg(feature = "aggregator")]
mod reviews;
#[cfg(feature = "aggregator")]
pub mod stats;
#[cfg(test)]
mod testing;

#[cfg(feature = "aggregator")]
pub use aggregator::{OrgStats, Options};
#[cfg(feature = "aggregator")]
pub use filters::Filters;
#[cfg(feature = "aggregator")]
pub use reviews::review_query;
#[cfg(feature = "aggregator")]
pub use stats::{Stats, UserStats};

#[cfg(feature = "aggregator")]
mod aggregator {
    use crate::api::{Client, Result};
    use crate::contributions::{collect_contributions, Collection};
    use crate::diagnostics::{Diagnostics, LogDiagnostics};
    use crate::fetcher::RetryingFetcher;
    use crate::filters::Filters;
    use crate::members::resolve_members;
    use crate::repos::list_repositories;
    use crate::reviews::collect_reviews;
    use crate::stats::Stats;
    use chrono::{DateTime, Utc};
    use log::Level;
    use std::sync::Arc;

    #[derive(Debug, Clone, Default)]
    pub struct Options {
        pub org: String,
        pub filters: Filters,
        pub since: Option<DateTime<Utc>>,
        pub include_reviews: bool,
        pub exclude_forks: bool,
    }

    pub struct OrgStats<CLIENT>
    where
        CLIENT: Client,
    {
        client: CLIENT,
        diagnostics: Arc<dyn Diagnostics>,
    }

    impl<CLIENT> OrgStats<CLIENT>
    where
        CLIENT: Client,
    {
        pub fn new(client: CLIENT) -> Self {
            Self::with_diagnostics(client, Arc::new(LogDiagnostics::default()))
        }

        pub fn with_diagnostics(client: CLIENT, diagnostics: Arc<dyn Diagnostics>) -> Self {
            OrgStats { client, diagnostics }
        }

        /// Runs one aggregation pass. The first terminal upstream error discards everything
        /// gathered so far.
        pub async fn gather(&self, options: &Options) -> Result<Stats> {
            let diagnostics = self.diagnostics.as_ref();
            let fetcher = RetryingFetcher::new(diagnostics);
            let org = options.org.as_str();

            if !options.filters.repo_allow.is_empty() {
                diagnostics.emit(
                    Level::Warn,
                    &format!(
                        "repository allow-list has no effect: {}",
                        options.filters.repo_allow.join(", ")
                    ),
                );
            }

            let members = resolve_members(&self.client, &fetcher, org).await?;
            let repos = list_repositories(&self.client, &fetcher, org).await?;

            let mut stats = Stats::new(options.since);
            let collection = Collection {
                org,
                filters: &options.filters,
                members: &members,
                exclude_forks: options.exclude_forks,
            };
            collect_contributions(&self.client, &fetcher, collection, &repos, &mut stats).await?;
            let pruned = stats.prune_inactive();
            if pruned > 0 {
                diagnostics.emit(
                    Level::Debug,
                    &format!("ignoring {} authors without activity since the cutoff", pruned),
                );
            }
            diagnostics.emit(Level::Info, &format!("total authors stats: {}", stats.len()));

            if !options.include_reviews {
                return Ok(stats);
            }

            for login in stats.logins() {
                diagnostics.emit(Level::Info, &format!("gathering review stats for user: {}", login));
                collect_reviews(&self.client, &fetcher, org, &login, options.since, &mut stats).await?;
            }
            Ok(stats)
        }
    }

}
