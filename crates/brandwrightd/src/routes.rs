//! API routes for brandwrightd
//!
//! Every failure is returned as `{"error": "..."}` with the status from
//! `GenerationError::status_code`. Request bodies are read as raw bytes and
//! parsed as JSON whatever their `Content-Type` says.

use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use brandwright_common::insights::{
    CitationReviewRequest, CitationSuggestions, TrendingQueries, TrendingQueriesRequest,
    VisibilityReviewRequest, VisibilitySuggestions,
};
use brandwright_common::{ErrorBody, GeneratedContent, GenerationError, RawBrandContentRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

type AppStateArc = Arc<AppState>;

/// Error response wrapper
#[derive(Debug)]
pub struct ApiError(pub GenerationError);

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!("  Request failed: {}", self.0);
        } else {
            warn!("  Rejected request: {}", self.0);
        }

        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Parse a buffered body as JSON, reporting a malformed one as a 400
fn json_body<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, ApiError> {
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError(GenerationError::PayloadTooLarge)
        } else {
            ApiError(GenerationError::InvalidRequest(rejection.body_text()))
        }
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError(GenerationError::InvalidRequest(e.to_string())))
}

/// Give bare 408/413 responses from the timeout and body-limit layers the
/// same `{error}` body as every other failure.
pub async fn envelope_layer_errors(response: Response) -> Response {
    let error = match response.status() {
        StatusCode::REQUEST_TIMEOUT => GenerationError::RequestTimeout,
        StatusCode::PAYLOAD_TOO_LARGE => GenerationError::PayloadTooLarge,
        _ => return response,
    };

    let is_json = response.headers().get(header::CONTENT_TYPE)
        == Some(&HeaderValue::from_static("application/json"));
    if is_json {
        return response;
    }
    ApiError(error).into_response()
}

// ============================================================================
// Generate Routes
// ============================================================================

pub fn generate_routes() -> Router<AppStateArc> {
    Router::new().route("/api/generate", post(generate_content))
}

async fn generate_content(
    State(state): State<AppStateArc>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GeneratedContent>, ApiError> {
    // Credential problems outrank anything wrong with the request
    state.service.require_generator()?;
    let raw: RawBrandContentRequest = json_body(body)?;

    let content = state.service.generate(&raw).await?;
    Ok(Json(content))
}

// ============================================================================
// Insight Routes
// ============================================================================

pub fn insight_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/insights/trending-queries", post(trending_queries))
        .route("/api/insights/visibility", post(review_visibility))
        .route("/api/insights/citations", post(review_citations))
}

async fn trending_queries(
    State(state): State<AppStateArc>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TrendingQueries>, ApiError> {
    state.service.require_generator()?;
    let req: TrendingQueriesRequest = json_body(body)?;
    Ok(Json(state.service.trending_queries(&req).await?))
}

async fn review_visibility(
    State(state): State<AppStateArc>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<VisibilitySuggestions>, ApiError> {
    state.service.require_generator()?;
    let req: VisibilityReviewRequest = json_body(body)?;
    Ok(Json(state.service.review_visibility(&req).await?))
}

async fn review_citations(
    State(state): State<AppStateArc>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CitationSuggestions>, ApiError> {
    state.service.require_generator()?;
    let req: CitationReviewRequest = json_body(body)?;
    Ok(Json(state.service.review_citations(&req).await?))
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub provider_configured: bool,
    pub model: Option<String>,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let configured = state.service.is_configured();

    Json(HealthResponse {
        status: if configured { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        provider_configured: configured,
        model: state.service.model().map(str::to_string),
    })
}
