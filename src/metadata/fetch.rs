use std::error::Error as StdError;
use std::time::Duration;

use reqwest::{redirect, Client};
use thiserror::Error;
use url::Url;

use super::error::MetadataError;
use super::validate::check_url;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_REDIRECTS: usize = 5;
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Resource bounds applied to every fetch.
#[derive(Debug, Clone)]
pub struct FetchLimits {
    /// Whole-request budget: connect, redirects and body.
    pub timeout: Duration,
    pub max_redirects: usize,
    pub max_body_bytes: usize,
    pub user_agent: String,
    /// Run each redirect target through the host validator before following.
    pub guard_redirects: bool,
}

impl Default for FetchLimits {
    fn default() -> Self {
        FetchLimits {
            timeout: FETCH_TIMEOUT,
            max_redirects: MAX_REDIRECTS,
            max_body_bytes: MAX_BODY_BYTES,
            user_agent: USER_AGENT.to_string(),
            guard_redirects: true,
        }
    }
}

#[derive(Debug, Error)]
enum RedirectRejection {
    #[error("too many redirects")]
    TooMany,
    #[error("redirect target rejected: {0}")]
    Unsafe(MetadataError),
}

/// Single-attempt HTTP GET under [`FetchLimits`].
///
/// Holds one `reqwest::Client` so connection pools are shared across
/// requests; the fetcher itself carries no per-request state.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    limits: FetchLimits,
}

impl Fetcher {
    pub fn new(limits: FetchLimits) -> Result<Self, MetadataError> {
        let max_redirects = limits.max_redirects;
        let guard = limits.guard_redirects;

        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() > max_redirects {
                return attempt.error(RedirectRejection::TooMany);
            }
            if guard {
                if let Err(e) = check_url(attempt.url()) {
                    return attempt.error(RedirectRejection::Unsafe(e));
                }
            }
            attempt.follow()
        });

        let client = Client::builder()
            .timeout(limits.timeout)
            .redirect(policy)
            .user_agent(limits.user_agent.as_str())
            .build()
            .map_err(|e| MetadataError::FetchFailed(e.to_string()))?;

        Ok(Fetcher { client, limits })
    }

    /// GET `url` and return the body decoded as (lossy) UTF-8.
    ///
    /// The body is read chunk by chunk and abandoned as soon as it grows past
    /// `max_body_bytes`.
    pub async fn fetch(&self, url: &Url) -> Result<String, MetadataError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::FetchFailed(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        let max = self.limits.max_body_bytes;
        if response.content_length().is_some_and(|len| len > max as u64) {
            return Err(MetadataError::ResponseTooLarge);
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            if body.len() + chunk.len() > max {
                return Err(MetadataError::ResponseTooLarge);
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn classify(err: reqwest::Error) -> MetadataError {
    if err.is_timeout() {
        return MetadataError::Timeout;
    }
    if err.is_redirect() {
        return match find_rejection(&err) {
            Some(RedirectRejection::Unsafe(inner)) => inner.clone(),
            Some(RedirectRejection::TooMany) | None => MetadataError::TooManyRedirects,
        };
    }
    MetadataError::FetchFailed(err.to_string())
}

fn find_rejection<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a RedirectRejection> {
    let mut source = err.source();
    while let Some(e) = source {
        if let Some(rejection) = e.downcast_ref::<RedirectRejection>() {
            return Some(rejection);
        }
        source = e.source();
    }
    None
}
