use crate::api::{Client, Result};
use crate::fetcher::RetryingFetcher;
use crate::paginator::{fetch_all, REPOS_PAGE_SIZE};
use log::Level;

/// Every repository of `org`, unfiltered, in listing order.
pub async fn list_repositories<C>(
    client: &C,
    fetcher: &RetryingFetcher<'_>,
    org: &str,
) -> Result<Vec<C::Repository>>
where
    C: Client + ?Sized,
{
    let operation = format!("list repositories of {}", org);
    let repos = fetch_all(fetcher, &operation, REPOS_PAGE_SIZE, move |page| client.org_repos(org, page)).await?;
    fetcher
        .diagnostics()
        .emit(Level::Info, &format!("got {} repositories", repos.len()));
    Ok(repos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Repo;
    use crate::diagnostics::RecordingDiagnostics;
    use crate::testing::{MockClient, MockRepo};

    #[tokio::test]
    async fn lists_forks_too() {
        let client = MockClient::default()
            .with_repos_page(vec![MockRepo::new("a", true), MockRepo::new("b", false)], Some(2))
            .with_repos_page(vec![MockRepo::new("c", false)], None);
        let diagnostics = RecordingDiagnostics::default();
        let fetcher = RetryingFetcher::new(&diagnostics);

        let repos = list_repositories(&client, &fetcher, "acme").await.unwrap();

        let names: Vec<&str> = repos.iter().map(|repo| repo.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(repos[0].is_fork());
        assert_eq!(client.repo_pages(), vec![(1, 10), (2, 10)]);
    }
}
