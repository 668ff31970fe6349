use serde::{Deserialize, Serialize};
use validator::Validate;

/// Summary of a remote page returned by `POST /api/metadata`.
///
/// Never persisted here. Every field is always present; a value that could
/// not be found is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub favicon: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MetadataRequest {
    #[serde(default)]
    #[validate(
        required(message = "URL is required"),
        length(min = 1, message = "URL is required")
    )]
    pub url: Option<String>,
}
