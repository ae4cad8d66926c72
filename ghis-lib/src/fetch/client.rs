//! GitHub REST API client
//!
//! Minimal client fetching every page of a repository listing.

use super::Progress;
use crate::Result;
use chrono::{DateTime, Utc};
use ohno::{IntoAppError, app_err};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const LOG_TARGET: &str = "    github";

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// GitHub API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a client authenticating every request with `token`.
    pub fn new(token: &str, base_url: impl Into<String>) -> Result<Self> {
        let mut auth_val = HeaderValue::from_str(&format!("token {token}")).into_app_err("malformed authentication token")?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        let _ = headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder().user_agent("ghis").default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL for this client
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch `path` and every following page, concatenating the JSON arrays.
    pub async fn get_all<T: DeserializeOwned>(&self, path: &str, progress: &dyn Progress) -> Result<Vec<T>> {
        let mut url = format!("{}{path}", self.base_url);
        let fetched = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fetched);
        let what = path.to_string();
        progress.set_indeterminate(Box::new(move || format!("{} item(s) from {what}", counter.load(Ordering::Relaxed))));

        let mut items = Vec::new();
        let mut pages = 0usize;
        loop {
            let resp = self.api_call(&url).await?;
            let next = next_link(resp.headers());

            let page: Vec<T> = resp.json().await.into_app_err_with(|| format!("malformed response from '{url}'"))?;
            pages += 1;
            let _ = fetched.fetch_add(page.len(), Ordering::Relaxed);
            items.extend(page);

            match next {
                Some(next) => url = next,
                None => break,
            }
        }

        log::debug!(target: LOG_TARGET, "Fetched {} item(s) in {pages} page(s) from '{path}'", items.len());
        Ok(items)
    }

    /// Make an API call, turning every non-success status into an error.
    async fn api_call(&self, url: &str) -> Result<reqwest::Response> {
        log::trace!(target: LOG_TARGET, "GET {url}");
        let resp = self.client.get(url).send().await.into_app_err_with(|| format!("request to '{url}' failed"))?;

        let rate_limit = extract_rate_limit_from_headers(resp.headers());
        if let Some(info) = rate_limit {
            log::trace!(target: LOG_TARGET, "{} request(s) left until {}", info.remaining, info.reset_at);
        }

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        match status.as_u16() {
            429 => Err(rate_limited(url, rate_limit)),
            403 if rate_limit.is_none_or(|info| info.remaining == 0) => Err(rate_limited(url, rate_limit)),
            404 => Err(app_err!("repository not found: '{url}' returned 404")),
            code => Err(app_err!("request to '{url}' failed with status {code}")),
        }
    }
}

fn rate_limited(url: &str, rate_limit: Option<RateLimitInfo>) -> ohno::AppError {
    match rate_limit {
        Some(info) => app_err!("GitHub rate limit exceeded fetching '{url}', resets at {}", info.reset_at.to_rfc3339()),
        None => app_err!("GitHub rate limit exceeded fetching '{url}'"),
    }
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<usize>().ok()?;

    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;

    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}

/// The `rel="next"` target of a `Link` header.
fn next_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        let is_next = params.split(';').any(|p| p.trim() == r#"rel="next""#);
        is_next.then(|| target.trim().trim_start_matches('<').trim_end_matches('>').to_string())
    })
}
