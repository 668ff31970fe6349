use url::Url;

use crate::models::ExtractedMetadata;

pub const DEFAULT_FAVICON_PROXY: &str = "https://www.google.com/s2/favicons";

/// Synthetic record used when a safe URL could not be fetched: the bare
/// hostname as title and a favicon from the proxy service.
///
/// The host goes into the proxy query as-is; IPv6 hosts keep their brackets.
pub fn hostname_fallback(url: &Url, favicon_proxy: &str) -> ExtractedMetadata {
    let host = url.host_str().unwrap_or_default();
    let title = host.strip_prefix("www.").unwrap_or(host);

    ExtractedMetadata {
        title: title.to_string(),
        description: String::new(),
        thumbnail: String::new(),
        favicon: format!("{favicon_proxy}?domain={host}&sz=128"),
    }
}
