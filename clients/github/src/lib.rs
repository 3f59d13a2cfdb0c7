//! GitHub REST implementation of [`org_stats::api::Client`].

mod builder;
mod limiter;
mod payload;

pub use builder::{GithubClientBuilder, GITHUB_URL};

use async_trait::async_trait;
use derive_more::Constructor;
use log::debug;
use org_stats::api::{Client, ContributorStats, Page, Paged, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

#[derive(Debug, Constructor)]
pub struct GithubClient {
    client: reqwest::Client,
    github_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct GithubRepo {
    name: String,
    fork: bool,
}

impl org_stats::api::Repo for GithubRepo {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_fork(&self) -> bool {
        self.fork
    }
}

impl GithubClient {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let request_url = format!("{}{}", self.github_url, path);
        debug!("GET {} {:?}", request_url, query);
        let response = self
            .client
            .get(request_url)
            .query(query)
            .send()
            .await
            .map_err(anyhow::Error::from)?;
        limiter::check(response).await
    }

    async fn get_page<P, T>(&self, path: &str, page: Page) -> Result<Paged<T>>
    where
        P: DeserializeOwned,
        T: From<P>,
    {
        let response = self.get(path, &page_query(page)).await?;
        let next = limiter::next_page(response.headers());
        let items = read_json::<Vec<P>>(response).await?;
        Ok(Paged::new(items.into_iter().map(T::from).collect(), next))
    }
}

fn page_query(page: Page) -> Vec<(&'static str, String)> {
    vec![
        ("per_page", page.per_page.to_string()),
        ("page", page.number.to_string()),
    ]
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    Ok(response.json::<T>().await.map_err(anyhow::Error::from)?)
}

#[async_trait]
impl Client for GithubClient {
    type Repository = GithubRepo;

    async fn org_members(&self, org: &str, page: Page) -> Result<Paged<String>> {
        let path = format!("/orgs/{}/members", org);
        self.get_page::<payload::Member, String>(&path, page).await
    }

    async fn org_repos(&self, org: &str, page: Page) -> Result<Paged<GithubRepo>> {
        let path = format!("/orgs/{}/repos", org);
        self.get_page::<payload::Repo, GithubRepo>(&path, page).await
    }

    async fn contributor_stats(&self, org: &str, repo: &str) -> Result<Vec<ContributorStats>> {
        let path = format!("/repos/{}/{}/stats/contributors", org, repo);
        let response = self.get(&path, &[]).await?;
        // Empty repositories have no statistics at all.
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let contributors = read_json::<Vec<payload::Contributor>>(response).await?;
        Ok(contributors.into_iter().map(ContributorStats::from).collect())
    }

    async fn search_issues_count(&self, query: &str, page: Page) -> Result<u64> {
        let mut params = page_query(page);
        params.push(("q", query.to_string()));
        let response = self.get("/search/issues", &params).await?;
        let result = read_json::<payload::SearchIssues>(response).await?;
        Ok(result.total_count)
    }
}
