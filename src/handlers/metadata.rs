use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::{ExtractedMetadata, MetadataRequest};
use crate::state::AppState;

fn validation_error(e: validator::ValidationErrors) -> AppError {
    AppError::Validation(
        e.field_errors()
            .values()
            .flat_map(|v| v.iter())
            .filter_map(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// A body that is JSON but not the right shape (e.g. `{"url": 5}`) is an
/// invalid URL as far as the caller is concerned.
fn body_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(_) => AppError::Validation("Invalid URL format".into()),
        other => AppError::Validation(other.body_text()),
    }
}

fn require_url(payload: Result<Json<MetadataRequest>, JsonRejection>) -> AppResult<String> {
    let Json(req) = payload.map_err(body_error)?;
    req.validate().map_err(validation_error)?;
    req.url
        .ok_or_else(|| AppError::Validation("URL is required".into()))
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// POST /api/metadata
///
/// Fetches the URL and returns its metadata. Unsafe or malformed URLs are
/// rejected with 400; fetch failures surface as 502.
pub async fn extract_metadata(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<MetadataRequest>, JsonRejection>,
) -> AppResult<Json<ExtractedMetadata>> {
    let url = require_url(payload)?;
    tracing::debug!(user = %auth.user_id, url = %url, "Extracting metadata");

    let metadata = state.extractor.extract(&url).await?;
    Ok(Json(metadata))
}

/// POST /api/metadata/preview
///
/// Like [`extract_metadata`] but never fails on an unreachable site: the
/// response falls back to the hostname and a proxied favicon. Unsafe or
/// malformed URLs are still rejected with 400.
pub async fn preview_metadata(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<MetadataRequest>, JsonRejection>,
) -> AppResult<Json<ExtractedMetadata>> {
    let url = require_url(payload)?;
    tracing::debug!(user = %auth.user_id, url = %url, "Building metadata preview");

    let metadata = state.extractor.extract_or_fallback(&url).await?;
    Ok(Json(metadata))
}
