//! Turns rate-limit, throttling and "still computing" answers into the matching
//! [`org_stats::api::Error`] signals.

use crate::payload::ErrorBody;
use chrono::{DateTime, Duration, TimeZone, Utc};
use log::debug;
use org_stats::api::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use std::str::FromStr;
use url::Url;

/// Passes successful responses through and classifies everything else.
pub(crate) async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::ACCEPTED {
        debug!("{} accepted, not computed yet", response.url());
        return Err(Error::NotReady);
    }
    if status.is_success() {
        return Ok(response);
    }
    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();
    Err(classify(status, &headers, &body, Utc::now()))
}

fn classify(status: StatusCode, headers: &HeaderMap<HeaderValue>, body: &str, now: DateTime<Utc>) -> Error {
    let message = error_body(body);
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        if read_header::<u32>(headers, "x-ratelimit-remaining") == Some(0) {
            let reset = read_header::<i64>(headers, "x-ratelimit-reset")
                .and_then(|reset| Utc.timestamp_opt(reset, 0).single())
                .unwrap_or(now);
            return Error::RateLimited { reset };
        }
        if let Some(seconds) = read_header::<i64>(headers, "retry-after") {
            return Error::SecondaryRateLimited {
                retry_after: now + Duration::seconds(seconds),
            };
        }
        if is_secondary_rate_limit(&message) {
            return Error::SecondaryRateLimited { retry_after: now };
        }
    }
    Error::Status {
        status: status.as_u16(),
        message: message.message,
    }
}

/// GitHub error bodies are JSON, proxies in between may answer with plain text.
fn error_body(body: &str) -> ErrorBody {
    serde_json::from_str(body).unwrap_or_else(|_| ErrorBody {
        message: body.trim().to_string(),
        documentation_url: None,
    })
}

fn is_secondary_rate_limit(body: &ErrorBody) -> bool {
    let documented = body
        .documentation_url
        .as_deref()
        .map_or(false, |url| url.contains("secondary-rate-limits"));
    documented || body.message.to_lowercase().contains("secondary rate limit")
}

/// Page number of the `rel="next"` link, if any.
pub(crate) fn next_page(headers: &HeaderMap<HeaderValue>) -> Option<u32> {
    let link = headers.get(reqwest::header::LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.split(';').any(|param| param.trim() == r#"rel="next""#) {
            return None;
        }
        let target = target.trim().trim_start_matches('<').trim_end_matches('>');
        let url = Url::parse(target).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, page)| page.parse::<u32>().ok())
    })
}

fn read_header<T: FromStr>(headers: &HeaderMap<HeaderValue>, header: &str) -> Option<T> {
    headers.get(header)?.to_str().ok()?.trim().parse::<T>().ok()
}
