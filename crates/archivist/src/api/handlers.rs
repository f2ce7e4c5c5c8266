//! API request handlers.
//!
//! Store and catalog operations do synchronous file I/O, so every handler runs
//! its work on the blocking pool.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    Result,
    store::KnowledgeStore,
    types::{CatalogOverview, FileInfo, FileMetadata, MetadataPatch},
};

use super::{
    error::ApiError,
    types::{ApiState, HealthResponse, RecentQuery, SearchQuery},
};

async fn blocking<T, F>(state: &ApiState, f: F) -> std::result::Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&KnowledgeStore) -> Result<T> + Send + 'static,
{
    let router = state.router.clone();
    let outcome = tokio::task::spawn_blocking(move || f(router.store().as_ref())).await?;
    Ok(outcome?)
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_records: state.router.store().catalog().len(),
    })
}

/// GET /files
pub async fn list_files_handler(State(state): State<ApiState>) -> std::result::Result<Json<Vec<String>>, ApiError> {
    Ok(Json(blocking(&state, |store| store.list_files()).await?))
}

/// Read a file's extracted text.
///
/// GET /files/{name}
pub async fn read_file_handler(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> std::result::Result<Response, ApiError> {
    let content = blocking(&state, move |store| store.read_file(&name)).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content).into_response())
}

/// Write a file; the request body is the content.
///
/// PUT /files/{name}
pub async fn write_file_handler(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    body: String,
) -> std::result::Result<(StatusCode, Json<FileMetadata>), ApiError> {
    let metadata = blocking(&state, move |store| store.write_file(&name, &body)).await?;
    Ok((StatusCode::CREATED, Json(metadata)))
}

/// GET /info/{name}
pub async fn file_info_handler(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> std::result::Result<Json<FileInfo>, ApiError> {
    Ok(Json(blocking(&state, move |store| store.file_info(&name)).await?))
}

/// Apply a partial metadata update. Absent fields are left unchanged.
///
/// PUT /metadata/{name}
pub async fn update_metadata_handler(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Json(patch): Json<MetadataPatch>,
) -> std::result::Result<Json<FileMetadata>, ApiError> {
    Ok(Json(
        blocking(&state, move |store| store.update_metadata(&name, &patch)).await?,
    ))
}

/// GET /files-with-metadata
pub async fn files_with_metadata_handler(
    State(state): State<ApiState>,
) -> std::result::Result<Json<Vec<FileMetadata>>, ApiError> {
    Ok(Json(blocking(&state, |store| store.list_files_with_metadata()).await?))
}

/// GET /overview
pub async fn overview_handler(State(state): State<ApiState>) -> std::result::Result<Json<CatalogOverview>, ApiError> {
    Ok(Json(blocking(&state, |store| Ok(store.catalog().overview())).await?))
}

/// Files whose content contains the query, case-insensitively.
///
/// GET /search?query=
pub async fn search_handler(
    State(state): State<ApiState>,
    Query(params): Query<SearchQuery>,
) -> std::result::Result<Json<Vec<String>>, ApiError> {
    Ok(Json(
        blocking(&state, move |store| store.search_files(&params.query)).await?,
    ))
}

/// GET /search-metadata?query=
pub async fn search_metadata_handler(
    State(state): State<ApiState>,
    Query(params): Query<SearchQuery>,
) -> std::result::Result<Json<Vec<FileMetadata>>, ApiError> {
    Ok(Json(
        blocking(&state, move |store| Ok(store.catalog().search(&params.query))).await?,
    ))
}

/// GET /category/{category}
pub async fn category_handler(
    State(state): State<ApiState>,
    Path(category): Path<String>,
) -> std::result::Result<Json<Vec<FileMetadata>>, ApiError> {
    Ok(Json(
        blocking(&state, move |store| Ok(store.catalog().by_category(&category))).await?,
    ))
}

/// Records ordered by last access, newest first; never-read records come last.
///
/// GET /recent?limit=
pub async fn recent_handler(
    State(state): State<ApiState>,
    Query(params): Query<RecentQuery>,
) -> std::result::Result<Json<Vec<FileMetadata>>, ApiError> {
    Ok(Json(
        blocking(&state, move |store| Ok(store.catalog().recent(params.limit))).await?,
    ))
}

/// Handle one raw JSON-RPC message.
///
/// POST /mcp
///
/// Protocol errors are JSON-RPC error envelopes with status 200. Notifications
/// get 202 and an empty body.
pub async fn mcp_handler(State(state): State<ApiState>, body: String) -> std::result::Result<Response, ApiError> {
    let router = state.router.clone();
    let response = tokio::task::spawn_blocking(move || router.handle(&body)).await?;

    Ok(match response {
        Some(json) => ([(header::CONTENT_TYPE, "application/json")], json).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    })
}
