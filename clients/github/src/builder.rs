use crate::GithubClient;
use anyhow::Context;
use org_stats::api::Result;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;

pub const GITHUB_URL: &str = "https://api.github.com";

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("org-stats"));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        Self {
            client_builder: ClientBuilder::default(),
            github_url: GITHUB_URL.to_string(),
            headers,
        }
    }
}

impl GithubClientBuilder {
    pub fn try_with_token(self, token: secrecy::SecretString) -> Result<GithubClientBuilder> {
        let value = format!("Bearer {}", token.expose_secret());
        self.try_with_header(header::AUTHORIZATION, value, true)
    }

    pub fn try_with_user_agent<STR: AsRef<str>>(self, user_agent: STR) -> Result<GithubClientBuilder> {
        self.try_with_header(header::USER_AGENT, user_agent, false)
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().trim_end_matches('/').to_string();
        self
    }

    fn try_with_header(
        mut self,
        key: HeaderName,
        val: impl AsRef<str>,
        sensitive: bool,
    ) -> Result<GithubClientBuilder> {
        let mut val = HeaderValue::from_str(val.as_ref()).with_context(|| format!("Invalid {} header", key))?;
        val.set_sensitive(sensitive);
        self.headers.insert(key, val);
        Ok(self)
    }

    pub fn build(self) -> Result<GithubClient> {
        let client = self
            .client_builder
            .default_headers(self.headers)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GithubClient::new(client, self.github_url))
    }
}

#[test]
fn builder_test() -> anyhow::Result<()> {
    let client = GithubClientBuilder::default()
        .with_github_url("http://localhost:8080/")
        .try_with_user_agent("tests")?
        .try_with_token(secrecy::SecretString::new("t0k3n".to_string()))?
        .build()?;
    assert_eq!(client.github_url, "http://localhost:8080");
    Ok(())
}

#[test]
fn invalid_header_test() {
    let result = GithubClientBuilder::default().try_with_user_agent("bad\nagent");
    assert!(result.is_err());
}
