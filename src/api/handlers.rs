//! API Handlers
//!
//! HTTP request handlers for the data layer endpoints. Handlers stay thin:
//! they decode the request, call into [`DataCore`] and shape the response.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::CacheStats;
use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::models::{
    compile_schema, filter_from_query, CacheActionResponse, CreateRequest, DeleteResponse,
    HealthResponse, InvalidateRequest, RowsResponse, UpdateRequest, ValidateRequest,
};
use crate::sanitize::sanitize;
use crate::service::{DataCore, WriteOutcome};
use crate::store::MemoryRowStore;
use crate::validation::ValidationResult;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub core: DataCore,
}

impl AppState {
    pub fn new(core: DataCore) -> Self {
        Self { core }
    }

    /// Builds state backed by an in-process row store.
    pub fn from_config(config: &Config) -> Self {
        Self::new(DataCore::from_config(config, Arc::new(MemoryRowStore::new())))
    }
}

/// Maps a write outcome to a response. Rejections carry the validation
/// result with 422 so clients can show per-field messages.
fn write_response(outcome: WriteOutcome, applied: StatusCode) -> Response {
    match outcome {
        WriteOutcome::Applied { .. } => (applied, Json(outcome)).into_response(),
        WriteOutcome::Rejected { validation } => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(validation)).into_response()
        }
    }
}

// == Collections ==

/// Handler for GET /collections/:name
pub async fn list_rows_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<RowsResponse>> {
    let filter = filter_from_query(&params);
    let rows = state.core.fetch(&name, &filter).await?;
    Ok(Json(RowsResponse::new(name, rows)))
}

/// Handler for POST /collections/:name
pub async fn create_row_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<CreateRequest>,
) -> Result<Response> {
    if !req.record.is_object() {
        return Err(CoreError::InvalidRequest(
            "Record must be a JSON object".to_string(),
        ));
    }
    let schema = compile_schema(req.schema.as_ref())?;
    let outcome = state.core.create(&name, &req.record, schema.as_ref()).await?;
    Ok(write_response(outcome, StatusCode::CREATED))
}

/// Handler for PATCH /collections/:name
pub async fn update_rows_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Result<Response> {
    if let Some(error_msg) = req.validate() {
        return Err(CoreError::InvalidRequest(error_msg));
    }
    let schema = compile_schema(req.schema.as_ref())?;
    let outcome = state
        .core
        .update(&name, &req.to_filter(), &req.patch, schema.as_ref())
        .await?;
    Ok(write_response(outcome, StatusCode::OK))
}

/// Handler for DELETE /collections/:name
///
/// Refuses an unfiltered delete; wiping a whole collection is not exposed.
pub async fn delete_rows_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<DeleteResponse>> {
    let filter = filter_from_query(&params);
    if filter.eq.is_empty() {
        return Err(CoreError::InvalidRequest(
            "Delete requires at least one filter condition".to_string(),
        ));
    }
    let deleted = state.core.delete(&name, &filter).await?;
    Ok(Json(DeleteResponse::new(&name, deleted)))
}

// == Sanitize / Validate ==

/// Handler for POST /sanitize
pub async fn sanitize_handler(Json(payload): Json<Value>) -> Result<Json<Value>> {
    Ok(Json(sanitize(&payload)?))
}

/// Handler for POST /validate
pub async fn validate_handler(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidationResult>> {
    let schema = req.schema.compile()?;
    Ok(Json(state.core.validate(&req.data, &schema)))
}

// == Cache ==

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.core.cache_stats().await)
}

/// Handler for POST /cache/invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<CacheActionResponse>> {
    if req.pattern.is_empty() {
        return Err(CoreError::InvalidRequest(
            "Pattern cannot be empty".to_string(),
        ));
    }
    let removed = state.core.invalidate_pattern(&req.pattern).await;
    info!(pattern = %req.pattern, removed, "cache invalidated");
    Ok(Json(CacheActionResponse::new(
        format!("Invalidated keys matching '{}'", req.pattern),
        removed,
    )))
}

/// Handler for POST /cache/cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CacheActionResponse> {
    let removed = state.core.cache().write().await.cleanup();
    Json(CacheActionResponse::new("Expired entries removed", removed))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<CacheActionResponse> {
    let removed = state.core.clear_cache().await;
    Json(CacheActionResponse::new("Cache cleared", removed))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
