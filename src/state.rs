use std::sync::Arc;

use crate::metadata::MetadataExtractor;

/// Shared application state passed to all handlers and extractors.
/// The JWT secret is read once at startup rather than on every request.
#[derive(Clone)]
pub struct AppState {
    pub jwt_secret: Arc<str>,
    pub extractor: MetadataExtractor,
}
