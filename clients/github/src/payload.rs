use chrono::{TimeZone, Utc};
use org_stats::api::{ContributorStats, WeeklyContribution};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Member {
    pub login: String,
}

impl From<Member> for String {
    fn from(member: Member) -> Self {
        member.login
    }
}

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub fork: bool,
}

impl From<Repo> for crate::GithubRepo {
    fn from(repo: Repo) -> Self {
        crate::GithubRepo {
            name: repo.name,
            fork: repo.fork,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Contributor {
    pub author: Option<Author>,
    #[serde(default)]
    pub weeks: Vec<Week>,
}

#[derive(Deserialize, Debug)]
pub struct Author {
    pub login: Option<String>,
}

/// `w` is the unix timestamp of the week start, `a`/`d`/`c` additions, deletions and commits.
#[derive(Deserialize, Debug)]
pub struct Week {
    pub w: i64,
    #[serde(default)]
    pub a: u64,
    #[serde(default)]
    pub d: u64,
    #[serde(default)]
    pub c: u64,
}

impl From<Contributor> for ContributorStats {
    fn from(contributor: Contributor) -> Self {
        let login = contributor.author.and_then(|author| author.login);
        let weeks = contributor
            .weeks
            .into_iter()
            .filter_map(|week| {
                Utc.timestamp_opt(week.w, 0)
                    .single()
                    .map(|start| WeeklyContribution::new(start, week.a, week.d, week.c))
            })
            .collect();
        ContributorStats::new(login, weeks)
    }
}

#[derive(Deserialize, Debug)]
pub struct SearchIssues {
    pub total_count: u64,
}

#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

#[test]
fn contributor_payload_test() {
    let body = r#"{
        "author": { "login": "alice", "id": 1 },
        "total": 5,
        "weeks": [
            { "w": 1704585600, "a": 10, "d": 2, "c": 3 },
            { "w": 1705190400, "a": 5, "d": 1, "c": 2 }
        ]
    }"#;
    let contributor: Contributor = serde_json::from_str(body).unwrap();
    let stats = ContributorStats::from(contributor);
    assert_eq!(stats.login.as_deref(), Some("alice"));
    assert_eq!(stats.weeks.len(), 2);
    assert_eq!(stats.weeks[0].week, Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap());
    assert_eq!(stats.weeks[1].additions, 5);
}

#[test]
fn ghost_contributor_payload_test() {
    let contributor: Contributor = serde_json::from_str(r#"{ "author": null, "weeks": [] }"#).unwrap();
    assert_eq!(ContributorStats::from(contributor).login, None);
}
