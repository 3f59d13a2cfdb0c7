use crate::api::{Client, Result};
use crate::fetcher::RetryingFetcher;
use crate::paginator::{fetch_all, MEMBERS_PAGE_SIZE};
use log::Level;
use std::collections::HashSet;

/// Logins of organization members. Lookups are exact-match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Members(HashSet<String>);

impl Members {
    pub fn contains(&self, login: &str) -> bool {
        self.0.contains(login)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for Members {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Members(iter.into_iter().collect())
    }
}

pub async fn resolve_members<C>(client: &C, fetcher: &RetryingFetcher<'_>, org: &str) -> Result<Members>
where
    C: Client + ?Sized,
{
    let operation = format!("list members of {}", org);
    let logins = fetch_all(fetcher, &operation, MEMBERS_PAGE_SIZE, move |page| client.org_members(org, page)).await?;
    let members: Members = logins.into_iter().collect();
    fetcher
        .diagnostics()
        .emit(Level::Info, &format!("found {} organization members", members.len()));
    Ok(members)
}
