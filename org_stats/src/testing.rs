//! Scripted in-memory [`Client`] for engine tests.

use crate::api::{Client, ContributorStats, Error, Page, Paged, Repo, Result};
use async_trait::async_trait;
use derive_more::Constructor;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, Constructor)]
pub struct MockRepo {
    name: &'static str,
    fork: bool,
}

impl Repo for MockRepo {
    fn name(&self) -> &str {
        self.name
    }

    fn is_fork(&self) -> bool {
        self.fork
    }
}

/// Every listing is served from a queue; an exhausted queue answers with an empty last page.
#[derive(Default)]
pub struct MockClient {
    members: Mutex<VecDeque<Result<Paged<String>>>>,
    repos: Mutex<VecDeque<Result<Paged<MockRepo>>>>,
    stats: Mutex<HashMap<String, VecDeque<Result<Vec<ContributorStats>>>>>,
    reviews: HashMap<String, u64>,
    member_pages: Mutex<Vec<(u32, u32)>>,
    repo_pages: Mutex<Vec<(u32, u32)>>,
    stats_requests: Mutex<Vec<String>>,
    searches: Mutex<Vec<(String, u32)>>,
}

impl MockClient {
    pub fn with_members_page(self, logins: Vec<&str>, next: Option<u32>) -> Self {
        let logins = logins.into_iter().map(String::from).collect();
        self.members.lock().unwrap().push_back(Ok(Paged::new(logins, next)));
        self
    }

    pub fn with_members_error(self, error: Error) -> Self {
        self.members.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_members(self, logins: Vec<&str>) -> Self {
        self.with_members_page(logins, None)
    }

    pub fn with_repos_page(self, repos: Vec<MockRepo>, next: Option<u32>) -> Self {
        self.repos.lock().unwrap().push_back(Ok(Paged::new(repos, next)));
        self
    }

    pub fn with_repos(self, repos: Vec<MockRepo>) -> Self {
        self.with_repos_page(repos, None)
    }

    /// Queues one answer of the statistics endpoint for `repo`.
    pub fn with_stats(self, repo: &str, stats: Result<Vec<ContributorStats>>) -> Self {
        self.stats
            .lock()
            .unwrap()
            .entry(repo.to_string())
            .or_default()
            .push_back(stats);
        self
    }

    /// Search total for queries mentioning `reviewed-by:{login}`.
    pub fn with_reviews(mut self, login: &str, total: u64) -> Self {
        self.reviews.insert(login.to_string(), total);
        self
    }

    pub fn member_pages(&self) -> Vec<(u32, u32)> {
        self.member_pages.lock().unwrap().clone()
    }

    pub fn repo_pages(&self) -> Vec<(u32, u32)> {
        self.repo_pages.lock().unwrap().clone()
    }

    pub fn stats_requests(&self) -> Vec<String> {
        self.stats_requests.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<(String, u32)> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Client for MockClient {
    type Repository = MockRepo;

    async fn org_members(&self, _org: &str, page: Page) -> Result<Paged<String>> {
        self.member_pages.lock().unwrap().push((page.number, page.per_page));
        let next = self.members.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Paged::last(Vec::new())))
    }

    async fn org_repos(&self, _org: &str, page: Page) -> Result<Paged<MockRepo>> {
        self.repo_pages.lock().unwrap().push((page.number, page.per_page));
        let next = self.repos.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Paged::last(Vec::new())))
    }

    async fn contributor_stats(&self, _org: &str, repo: &str) -> Result<Vec<ContributorStats>> {
        self.stats_requests.lock().unwrap().push(repo.to_string());
        let next = self
            .stats
            .lock()
            .unwrap()
            .get_mut(repo)
            .and_then(|answers| answers.pop_front());
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn search_issues_count(&self, query: &str, page: Page) -> Result<u64> {
        self.searches.lock().unwrap().push((query.to_string(), page.per_page));
        let total = self
            .reviews
            .iter()
            .find(|(login, _)| {
                let qualifier = format!("reviewed-by:{}", login);
                query.split_whitespace().any(|term| term == qualifier)
            })
            .map(|(_, total)| *total)
            .unwrap_or_default();
        Ok(total)
    }
}
