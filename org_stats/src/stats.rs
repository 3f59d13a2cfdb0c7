use crate::api::ContributorStats;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::AddAssign;

/// Activity totals of one user across the organization.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct UserStats {
    pub additions: u64,
    pub deletions: u64,
    pub commits: u64,
    pub reviews: u64,
}

impl UserStats {
    pub fn line_activity(&self) -> u64 {
        self.additions + self.deletions + self.commits
    }
}

impl AddAssign for UserStats {
    fn add_assign(&mut self, other: Self) {
        self.additions += other.additions;
        self.deletions += other.deletions;
        self.commits += other.commits;
        self.reviews += other.reviews;
    }
}

impl Display for UserStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "additions: {}\tdeletions: {}\tcommits: {}\treviews: {}",
            self.additions, self.deletions, self.commits, self.reviews
        ))
    }
}

/// Per-login accumulator of an aggregation run. Merges only ever add.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    data: HashMap<String, UserStats>,
    since: Option<DateTime<Utc>>,
}

impl Stats {
    pub fn new(since: Option<DateTime<Utc>>) -> Self {
        Stats {
            data: HashMap::new(),
            since,
        }
    }

    pub fn since(&self) -> Option<DateTime<Utc>> {
        self.since
    }

    /// Known logins, in no particular order.
    pub fn logins(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Unknown logins read as all zeroes.
    pub fn get(&self, login: &str) -> UserStats {
        self.data.get(login).copied().unwrap_or_default()
    }

    pub fn contains(&self, login: &str) -> bool {
        self.data.contains_key(login)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Folds one contributor's weeks on one repository into their record. Weeks starting before
    /// the cutoff are skipped. Contributors without a login are ignored.
    pub(crate) fn add_contribution(&mut self, contributor: &ContributorStats) {
        let login = match &contributor.login {
            Some(login) if !login.is_empty() => login,
            _ => return,
        };
        let since = self.since;
        let repo_total = contributor
            .weeks
            .iter()
            .filter(|week| since.map_or(true, |since| week.week >= since))
            .fold(UserStats::default(), |mut total, week| {
                total += UserStats::new(week.additions, week.deletions, week.commits, 0);
                total
            });
        *self.data.entry(login.clone()).or_default() += repo_total;
    }

    pub(crate) fn add_reviews(&mut self, login: &str, reviews: u64) {
        *self.data.entry(login.to_string()).or_default() += UserStats::new(0, 0, 0, reviews);
    }

    /// With a cutoff set, users without any qualifying line activity are dropped. Runs once,
    /// after every repository has been folded in. Returns the number of dropped users.
    pub(crate) fn prune_inactive(&mut self) -> usize {
        if self.since.is_none() {
            return 0;
        }
        let before = self.data.len();
        self.data.retain(|_, stats| stats.line_activity() > 0);
        before - self.data.len()
    }
}
