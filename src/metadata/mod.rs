//! Fetch an arbitrary user-supplied URL and summarise it.
//!
//! The pipeline is validate → fetch → parse, each stage returning a typed
//! [`MetadataError`].

pub mod error;
pub mod fallback;
pub mod fetch;
pub mod parse;
pub mod validate;

use std::sync::Arc;

use tokio::task::JoinError;
use url::Url;

pub use error::{BlockReason, MetadataError};
pub use fallback::{hostname_fallback, DEFAULT_FAVICON_PROXY};
pub use fetch::{FetchLimits, Fetcher};
pub use parse::extract_metadata;
pub use validate::validate_url;

use crate::models::ExtractedMetadata;

#[derive(Clone)]
pub struct MetadataExtractor {
    fetcher: Fetcher,
    favicon_proxy: Arc<str>,
}

impl MetadataExtractor {
    pub fn new(limits: FetchLimits, favicon_proxy: &str) -> Result<Self, MetadataError> {
        Ok(MetadataExtractor {
            fetcher: Fetcher::new(limits)?,
            favicon_proxy: Arc::from(favicon_proxy),
        })
    }

    /// Strict pipeline: every failure is returned to the caller.
    pub async fn extract(&self, input: &str) -> Result<ExtractedMetadata, MetadataError> {
        let url = validate(input)?;
        self.fetch_and_parse(&url).await
    }

    /// Best-effort pipeline for any syntactically valid, safe URL.
    ///
    /// Unparseable or unsafe input is still an error. Network failures, and a
    /// fetch task that dies outright, degrade to [`hostname_fallback`].
    pub async fn extract_or_fallback(
        &self,
        input: &str,
    ) -> Result<ExtractedMetadata, MetadataError> {
        let url = validate(input)?;
        self.fetch_or_fallback(url).await
    }

    /// Fallback tier of [`extract_or_fallback`](Self::extract_or_fallback)
    /// for a URL that has already passed validation.
    pub async fn fetch_or_fallback(&self, url: Url) -> Result<ExtractedMetadata, MetadataError> {
        let this = self.clone();
        let target = url.clone();
        let outcome = tokio::spawn(async move { this.fetch_and_parse(&target).await }).await;
        settle(&url, outcome, &self.favicon_proxy)
    }

    async fn fetch_and_parse(&self, url: &Url) -> Result<ExtractedMetadata, MetadataError> {
        let html = self.fetcher.fetch(url).await.map_err(|e| {
            tracing::warn!(error = %e, url = %url, "Failed to fetch URL for metadata");
            e
        })?;
        Ok(extract_metadata(&html, url))
    }
}

fn settle(
    url: &Url,
    outcome: Result<Result<ExtractedMetadata, MetadataError>, JoinError>,
    favicon_proxy: &str,
) -> Result<ExtractedMetadata, MetadataError> {
    match outcome {
        Ok(Ok(metadata)) => Ok(metadata),
        Ok(Err(e)) if e.is_recoverable() => {
            tracing::info!(url = %url, reason = %e, "Using hostname fallback for metadata");
            Ok(hostname_fallback(url, favicon_proxy))
        }
        Ok(Err(e)) => Err(e),
        Err(e) => {
            tracing::error!(error = ?e, url = %url, "Metadata task failed unexpectedly");
            Ok(hostname_fallback(url, favicon_proxy))
        }
    }
}

fn validate(input: &str) -> Result<Url, MetadataError> {
    validate_url(input).map_err(|e| {
        tracing::debug!(reason = %e, "Rejected metadata URL");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> MetadataExtractor {
        MetadataExtractor::new(FetchLimits::default(), DEFAULT_FAVICON_PROXY).unwrap()
    }

    #[tokio::test]
    async fn invalid_url_produces_no_fallback() {
        let result = extractor().extract_or_fallback("definitely not a url").await;
        assert_eq!(result, Err(MetadataError::InvalidUrl));
    }

    #[tokio::test]
    async fn blocked_host_is_not_downgraded() {
        let result = extractor().extract_or_fallback("http://192.168.1.1/router").await;
        assert_eq!(
            result,
            Err(MetadataError::BlockedHost(BlockReason::PrivateIp))
        );
    }

    #[tokio::test]
    async fn disallowed_scheme_is_not_downgraded() {
        let result = extractor().extract_or_fallback("file:///etc/passwd").await;
        assert_eq!(result, Err(MetadataError::DisallowedScheme));
    }

    #[tokio::test]
    async fn panicked_fetch_task_falls_back() {
        let url = Url::parse("https://www.example.com/page").unwrap();
        fn crash() -> Result<ExtractedMetadata, MetadataError> {
            panic!("fetch task crashed")
        }

        let crashed = tokio::spawn(async { crash() }).await;
        assert!(crashed.is_err());

        let metadata = settle(&url, crashed, DEFAULT_FAVICON_PROXY).unwrap();
        assert_eq!(metadata, hostname_fallback(&url, DEFAULT_FAVICON_PROXY));
        assert_eq!(metadata.title, "example.com");
    }

    #[test]
    fn settle_passes_unsafe_redirect_through() {
        let url = Url::parse("https://example.com/").unwrap();
        let outcome = Ok(Err(MetadataError::BlockedHost(BlockReason::Localhost)));
        assert_eq!(
            settle(&url, outcome, DEFAULT_FAVICON_PROXY),
            Err(MetadataError::BlockedHost(BlockReason::Localhost))
        );
    }

    #[tokio::test]
    async fn strict_extract_rejects_before_fetching() {
        let result = extractor().extract("http://metadata.google.internal/x").await;
        assert_eq!(
            result,
            Err(MetadataError::BlockedHost(BlockReason::InternalDomain))
        );
    }
}
