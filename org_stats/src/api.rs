use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Primary quota exhausted, usable again at `reset`.
    #[error("API rate limit exceeded, resets at {reset}")]
    RateLimited { reset: DateTime<Utc> },
    /// Abuse throttle, retry no sooner than `retry_after`.
    #[error("Secondary API rate limit exceeded, retry after {retry_after}")]
    SecondaryRateLimited { retry_after: DateTime<Utc> },
    /// Upstream accepted the request but is still computing the result.
    #[error("Accepted, result is not ready yet")]
    NotReady,
    #[error("Unexpected response status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{operation}: {source}")]
    Operation {
        operation: String,
        #[source]
        source: Box<Error>,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Rate limits and not-ready responses go away if the same call is repeated later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::RateLimited { .. } | Error::SecondaryRateLimited { .. } | Error::NotReady
        )
    }

    pub fn context(self, operation: impl Into<String>) -> Error {
        Error::Operation {
            operation: operation.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub const FIRST_PAGE_NUMBER: u32 = 1;

pub trait Repo: Send + Sync {
    fn name(&self) -> &str;
    fn is_fork(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct Page {
    pub number: u32,
    pub per_page: u32,
}

impl Page {
    pub fn first(per_page: u32) -> Self {
        Page::new(FIRST_PAGE_NUMBER, per_page)
    }
}

/// One page of a listing. `next` is the cursor of the following page, `None` on the last one.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub next: Option<u32>,
}

impl<T> Paged<T> {
    pub fn last(items: Vec<T>) -> Self {
        Paged::new(items, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct WeeklyContribution {
    pub week: DateTime<Utc>,
    pub additions: u64,
    pub deletions: u64,
    pub commits: u64,
}

/// Weekly activity of a single author on a single repository.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct ContributorStats {
    /// Missing for deleted or anonymous accounts.
    pub login: Option<String>,
    pub weeks: Vec<WeeklyContribution>,
}

#[async_trait]
pub trait Client: Send + Sync {
    type Repository: Repo;

    async fn org_members(&self, org: &str, page: Page) -> Result<Paged<String>>;

    async fn org_repos(&self, org: &str, page: Page) -> Result<Paged<Self::Repository>>;

    async fn contributor_stats(&self, org: &str, repo: &str) -> Result<Vec<ContributorStats>>;

    /// Total number of issues and pull requests matching `query`.
    async fn search_issues_count(&self, query: &str, page: Page) -> Result<u64>;
}

#[test]
fn transient_errors_test() {
    assert!(Error::NotReady.is_transient());
    assert!(Error::RateLimited { reset: Utc::now() }.is_transient());
    assert!(Error::SecondaryRateLimited { retry_after: Utc::now() }.is_transient());
    let status = Error::Status {
        status: 404,
        message: "Not Found".to_string(),
    };
    assert!(!status.is_transient());
    assert!(!Error::NotReady.context("search: q").is_transient());
}

#[test]
fn context_display_test() {
    let err = Error::Status {
        status: 422,
        message: "Validation Failed".to_string(),
    }
    .context("search: user:acme is:pr");
    assert_eq!(
        err.to_string(),
        "search: user:acme is:pr: Unexpected response status 422: Validation Failed"
    );
}
