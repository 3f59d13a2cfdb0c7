//! Deny and allow lists.
//!
//! Configured entries look like `user:alice`, `repo:sandbox` or plain `alice`. They are parsed
//! once into [`ListEntry`] values and split per scope into [`Filters`] before a run starts.

use std::convert::Infallible;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Scope {
    User,
    Repo,
    /// Unprefixed entries.
    Both,
}

impl Scope {
    fn covers(self, scope: Scope) -> bool {
        self == Scope::Both || self == scope
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub scope: Scope,
    pub value: String,
}

impl FromStr for ListEntry {
    type Err = Infallible;

    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let scoped = entry.split_once(':').and_then(|(prefix, value)| {
            Scope::from_str(prefix)
                .ok()
                .filter(|scope| *scope != Scope::Both)
                .map(|scope| ListEntry {
                    scope,
                    value: value.to_string(),
                })
        });
        Ok(scoped.unwrap_or_else(|| ListEntry {
            scope: Scope::Both,
            value: entry.to_string(),
        }))
    }
}

pub fn parse_list<S: AsRef<str>>(raw: &[S]) -> Vec<ListEntry> {
    raw.iter()
        .map(|entry| match entry.as_ref().parse() {
            Ok(entry) => entry,
            Err(never) => match never {},
        })
        .collect()
}

/// Splits one configured list into its user-scoped and repository-scoped halves.
pub fn split_list<S: AsRef<str>>(raw: &[S]) -> (Vec<String>, Vec<String>) {
    let entries = parse_list(raw);
    (values_for(&entries, Scope::User), values_for(&entries, Scope::Repo))
}

fn values_for(entries: &[ListEntry], scope: Scope) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| entry.scope.covers(scope))
        .map(|entry| entry.value.clone())
        .collect()
}

fn matches_any(list: &[String], candidate: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(candidate))
}

pub fn is_denied(list: &[String], candidate: &str) -> bool {
    matches_any(list, candidate)
}

/// An empty allow-list allows nobody; membership is then the only way in.
pub fn is_allowed(list: &[String], candidate: &str) -> bool {
    matches_any(list, candidate)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub user_deny: Vec<String>,
    pub repo_deny: Vec<String>,
    pub user_allow: Vec<String>,
    /// Accepted but not consulted: allow-listing only widens the set of counted users.
    pub repo_allow: Vec<String>,
}

impl Filters {
    pub fn new<S: AsRef<str>>(deny: &[S], allow: &[S]) -> Self {
        let (user_deny, repo_deny) = split_list(deny);
        let (user_allow, repo_allow) = split_list(allow);
        Filters {
            user_deny,
            repo_deny,
            user_allow,
            repo_allow,
        }
    }

    pub fn is_repo_denied(&self, repo: &str) -> bool {
        is_denied(&self.repo_deny, repo)
    }

    pub fn is_user_denied(&self, login: &str) -> bool {
        is_denied(&self.user_deny, login)
    }

    pub fn is_user_allowed(&self, login: &str) -> bool {
        is_allowed(&self.user_allow, login)
    }
}

#[test]
fn list_entry_parse_test() {
    let entry: ListEntry = "user:Alice".parse().unwrap();
    assert_eq!(entry, ListEntry { scope: Scope::User, value: "Alice".to_string() });
    let entry: ListEntry = "repo:sandbox".parse().unwrap();
    assert_eq!(entry, ListEntry { scope: Scope::Repo, value: "sandbox".to_string() });
    let entry: ListEntry = "bob".parse().unwrap();
    assert_eq!(entry, ListEntry { scope: Scope::Both, value: "bob".to_string() });
    let entry: ListEntry = "team:core".parse().unwrap();
    assert_eq!(entry, ListEntry { scope: Scope::Both, value: "team:core".to_string() });
    let entry: ListEntry = "both:x".parse().unwrap();
    assert_eq!(entry, ListEntry { scope: Scope::Both, value: "both:x".to_string() });
}

#[test]
fn split_list_test() {
    let (users, repos) = split_list(&["user:bob", "repo:legacy", "dependabot", "user:"]);
    assert_eq!(users, vec!["bob", "dependabot", ""]);
    assert_eq!(repos, vec!["legacy", "dependabot"]);

    let (users, repos) = split_list::<&str>(&[]);
    assert!(users.is_empty());
    assert!(repos.is_empty());
}

#[test]
fn deny_and_allow_ignore_case_test() {
    let list = vec!["Bob".to_string(), "carol".to_string()];
    assert!(is_denied(&list, "bob"));
    assert!(is_denied(&list, "CAROL"));
    assert!(!is_denied(&list, "alice"));
    assert!(is_allowed(&list, "BOB"));
    assert!(!is_allowed(&[], "bob"));
    assert!(!is_denied(&[], "bob"));
}

#[test]
fn filters_test() {
    let filters = Filters::new(&["user:bob", "repo:Legacy"], &["user:ext-dev", "repo:docs", "guest"]);
    assert!(filters.is_user_denied("BOB"));
    assert!(!filters.is_repo_denied("bob"));
    assert!(filters.is_repo_denied("legacy"));
    assert!(filters.is_user_allowed("Ext-Dev"));
    assert!(filters.is_user_allowed("guest"));
    assert!(!filters.is_user_allowed("docs"));
    assert_eq!(filters.repo_allow, vec!["docs", "guest"]);
    assert_eq!(Scope::User.to_string(), "user");
}
