use thiserror::Error;

/// Why a host was refused by [`validate_url`](super::validate_url).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Localhost,
    PrivateIp,
    InternalDomain,
}

impl BlockReason {
    pub fn message(self) -> &'static str {
        match self {
            BlockReason::Localhost => "Access to localhost is not allowed",
            BlockReason::PrivateIp => "Access to private IP ranges is not allowed",
            BlockReason::InternalDomain => "Access to internal domains is not allowed",
        }
    }
}

/// Every way a metadata extraction can fail.
///
/// The first three variants are judgements about the input and are shown to
/// the user as-is. The rest are network failures against an otherwise safe
/// URL; callers may paper over those with a hostname fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("Only HTTP and HTTPS protocols are allowed")]
    DisallowedScheme,

    #[error("{}", .0.message())]
    BlockedHost(BlockReason),

    #[error("Request timed out")]
    Timeout,

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Response exceeds the maximum allowed size")]
    ResponseTooLarge,

    #[error("Failed to fetch URL: {0}")]
    FetchFailed(String),
}

impl MetadataError {
    /// `true` for network-layer failures, which the fallback tier may absorb.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MetadataError::Timeout
                | MetadataError::TooManyRedirects
                | MetadataError::ResponseTooLarge
                | MetadataError::FetchFailed(_)
        )
    }
}
