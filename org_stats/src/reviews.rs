use crate::api::{Client, Page, Result};
use crate::fetcher::RetryingFetcher;
use crate::paginator::SEARCH_PAGE_SIZE;
use crate::stats::Stats;
use chrono::{DateTime, Utc};
use log::Level;

/// Pull requests in `org` reviewed by `login`, created after `since` when set.
pub fn review_query(org: &str, login: &str, since: Option<DateTime<Utc>>) -> String {
    let mut query = format!("user:{} is:pr reviewed-by:{}", org, login);
    if let Some(since) = since {
        query.push_str(&format!(" created:>{}", since.format("%Y-%m-%d")));
    }
    query
}

/// Adds the number of pull requests `login` reviewed to their record.
pub async fn collect_reviews<C>(
    client: &C,
    fetcher: &RetryingFetcher<'_>,
    org: &str,
    login: &str,
    since: Option<DateTime<Utc>>,
    stats: &mut Stats,
) -> Result<()>
where
    C: Client + ?Sized,
{
    let query = review_query(org, login, since);
    fetcher
        .diagnostics()
        .emit(Level::Debug, &format!("searching '{}'", query));
    let operation = format!("search: {}", query);
    let reviewed = fetcher
        .fetch(&operation, || client.search_issues_count(&query, Page::first(SEARCH_PAGE_SIZE)))
        .await?;
    stats.add_reviews(login, reviewed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ContributorStats, WeeklyContribution};
    use crate::diagnostics::RecordingDiagnostics;
    use crate::testing::MockClient;
    use chrono::TimeZone;

    #[test]
    fn review_query_test() {
        let since = Utc.with_ymd_and_hms(2024, 2, 29, 13, 45, 0).unwrap();
        assert_eq!(
            review_query("acme", "alice", Some(since)),
            "user:acme is:pr reviewed-by:alice created:>2024-02-29"
        );
        assert_eq!(review_query("acme", "alice", None), "user:acme is:pr reviewed-by:alice");
    }

    #[tokio::test]
    async fn review_count_is_added_to_the_record() {
        let client = MockClient::default().with_reviews("alice", 4);
        let diagnostics = RecordingDiagnostics::default();
        let fetcher = RetryingFetcher::new(&diagnostics);
        let mut stats = Stats::new(None);
        let week = WeeklyContribution::new(Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap(), 10, 2, 3);
        stats.add_contribution(&ContributorStats::new(Some("alice".to_string()), vec![week]));

        collect_reviews(&client, &fetcher, "acme", "alice", None, &mut stats)
            .await
            .unwrap();

        let alice = stats.get("alice");
        assert_eq!(alice.reviews, 4);
        assert_eq!(alice.additions, 10);
        assert_eq!(
            client.searches(),
            vec![("user:acme is:pr reviewed-by:alice".to_string(), 1)]
        );
        assert!(diagnostics.contains("searching 'user:acme is:pr reviewed-by:alice'"));
    }
}
