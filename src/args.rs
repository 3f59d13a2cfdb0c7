use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::Parser;
use secrecy::SecretString;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// GitHub organization
    #[clap(short, long, env)]
    pub org: String,

    /// API OAuth access token
    #[clap(short, long, env = "GITHUB_TOKEN")]
    pub api_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env, default_value = "https://api.github.com")]
    pub api_url: String,

    /// Users and repositories never counted, e.g. `user:bot`, `repo:sandbox` or `legacy`
    #[clap(short, long, env, use_value_delimiter = true)]
    pub deny: Vec<String>,

    /// Non-members counted anyway, e.g. `user:contractor`
    #[clap(short = 'w', long, env, use_value_delimiter = true)]
    pub allow: Vec<String>,

    /// Ignore activity before this date (`YYYY-MM-DD` or RFC 3339, UTC)
    #[clap(short, long, env, parse(try_from_str = parse_since))]
    pub since: Option<DateTime<Utc>>,

    /// Count reviewed pull requests too
    #[clap(short = 'r', long, env)]
    pub include_reviews: bool,

    /// Skip forked repositories
    #[clap(short = 'f', long, env)]
    pub exclude_forks: bool,

    /// Narrate every skipped and recorded item
    #[clap(short, long, env)]
    pub verbose: bool,

    /// Number of users to print, 0 prints everyone
    #[clap(short, long, env, default_value_t = 0)]
    pub top: usize,
}

fn parse_since(value: &str) -> clap::Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| Utc.from_utc_datetime(&midnight))
            .ok_or_else(|| format!("{} is not a valid date.", value));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|since| since.with_timezone(&Utc))
        .map_err(|err| format!("{} is neither YYYY-MM-DD nor RFC 3339: {}", value, err))
}

#[test]
fn parse_since_test() {
    assert_eq!(
        parse_since("2024-01-10"),
        Ok(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
    );
    assert_eq!(
        parse_since("2024-01-10T12:30:00+02:00"),
        Ok(Utc.with_ymd_and_hms(2024, 1, 10, 10, 30, 0).unwrap())
    );
    assert!(parse_since("last week").is_err());
}

#[test]
fn args_test() {
    let args = Args::parse_from([
        "org_stats",
        "--org",
        "acme",
        "--deny",
        "user:bot,repo:legacy",
        "--deny",
        "sandbox",
        "--allow",
        "user:ext",
        "--since",
        "2024-01-10",
        "--exclude-forks",
    ]);
    assert_eq!(args.org, "acme");
    assert_eq!(args.deny, vec!["user:bot", "repo:legacy", "sandbox"]);
    assert_eq!(args.allow, vec!["user:ext"]);
    assert!(args.exclude_forks);
    assert!(!args.include_reviews);
    assert_eq!(args.top, 0);
    assert!(args.since.is_some());
}
