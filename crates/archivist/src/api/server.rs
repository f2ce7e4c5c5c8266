//! API server setup and configuration.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::{Result, error::ArchivistError, mcp::McpRouter};

use super::{
    handlers::{
        category_handler, file_info_handler, files_with_metadata_handler, health_handler, list_files_handler,
        mcp_handler, overview_handler, read_file_handler, recent_handler, search_handler, search_metadata_handler,
        update_metadata_handler, write_file_handler,
    },
    types::{ApiSizeLimits, ApiState},
};

pub const MAX_REQUEST_BODY_ENV: &str = "ARCHIVIST_MAX_REQUEST_BODY_BYTES";
pub const CORS_ORIGINS_ENV: &str = "ARCHIVIST_CORS_ORIGINS";

/// Parse the request body limit from `ARCHIVIST_MAX_REQUEST_BODY_BYTES`.
///
/// Falls back to the 100 MB default if unset, zero or not a number.
fn parse_size_limits_from_env() -> ApiSizeLimits {
    if let Ok(value) = std::env::var(MAX_REQUEST_BODY_ENV) {
        match value.parse::<usize>() {
            Ok(bytes) if bytes > 0 => {
                tracing::info!("Request body limit configured from environment: {} bytes", bytes);
                return ApiSizeLimits::new(bytes);
            }
            _ => tracing::warn!(
                "Invalid {}='{}', must be a positive integer",
                MAX_REQUEST_BODY_ENV,
                value
            ),
        }
    }

    ApiSizeLimits::default()
}

fn cors_layer() -> CorsLayer {
    if let Ok(origins_str) = std::env::var(CORS_ORIGINS_ENV) {
        let origins: Vec<_> = origins_str
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();

        if !origins.is_empty() {
            tracing::info!("CORS configured with {} explicit allowed origin(s)", origins.len());
            return CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any);
        }
        tracing::warn!("{} set but empty or invalid, falling back to permissive CORS", CORS_ORIGINS_ENV);
    } else {
        tracing::warn!(
            "CORS configured to allow all origins (default). Set {} to a comma-separated list of origins to restrict it",
            CORS_ORIGINS_ENV
        );
    }
    CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
}

/// Create the API router with default size limits.
///
/// Public so the routes can be nested into a larger application.
pub fn create_router(router: Arc<McpRouter>) -> Router {
    create_router_with_limits(router, ApiSizeLimits::default())
}

pub fn create_router_with_limits(router: Arc<McpRouter>, limits: ApiSizeLimits) -> Router {
    let state = ApiState { router };

    Router::new()
        .route("/health", get(health_handler))
        .route("/files", get(list_files_handler))
        .route("/files/{*name}", get(read_file_handler).put(write_file_handler))
        .route("/info/{*name}", get(file_info_handler))
        .route("/metadata/{*name}", axum::routing::put(update_metadata_handler))
        .route("/files-with-metadata", get(files_with_metadata_handler))
        .route("/overview", get(overview_handler))
        .route("/search", get(search_handler))
        .route("/search-metadata", get(search_metadata_handler))
        .route("/category/{category}", get(category_handler))
        .route("/recent", get(recent_handler))
        .route("/mcp", post(mcp_handler))
        .layer(DefaultBodyLimit::max(limits.max_request_body_bytes))
        .layer(RequestBodyLimitLayer::new(limits.max_request_body_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server, reading the body limit from the environment.
pub async fn serve(router: Arc<McpRouter>, host: impl AsRef<str>, port: u16) -> Result<()> {
    serve_with_limits(router, host, port, parse_size_limits_from_env()).await
}

pub async fn serve_with_limits(
    router: Arc<McpRouter>,
    host: impl AsRef<str>,
    port: u16,
    limits: ApiSizeLimits,
) -> Result<()> {
    let ip: IpAddr = host
        .as_ref()
        .parse()
        .map_err(|e| ArchivistError::validation(format!("Invalid host address: {}", e)))?;

    let addr = SocketAddr::new(ip, port);
    let app = create_router_with_limits(router, limits);

    tracing::info!("Starting Archivist API server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(ArchivistError::Io)?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ArchivistError::Other(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::core::config::ServerConfig;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app() -> (TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let router = McpRouter::from_config(&ServerConfig::with_store_path(dir.path())).unwrap();
        (dir, create_router(Arc::new(router)))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn put(uri: &str, content_type: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, app) = app();
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "healthy");
    }

    #[tokio::test]
    async fn test_write_read_and_list() {
        let (_dir, app) = app();

        let (status, body) = send(&app, put("/files/notes/a.md", "text/plain", "# Budget")).await;
        assert_eq!(status, StatusCode::CREATED);
        let record: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(record["filename"], "notes/a.md");

        let (status, body) = send(&app, get("/files/notes/a.md")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "# Budget");

        let (_, body) = send(&app, get("/files")).await;
        let files: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(files, vec!["notes/a.md".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let (_dir, app) = app();
        let (status, body) = send(&app, get("/info/missing.txt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["error_type"], "NotFoundError");
    }

    #[tokio::test]
    async fn test_metadata_update_and_search() {
        let (_dir, app) = app();
        send(&app, put("/files/q3.txt", "text/plain", "revenue")).await;

        let (status, _) = send(
            &app,
            put("/metadata/q3.txt", "application/json", r#"{"tags":["finance"]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, get("/search-metadata?query=finance")).await;
        let records: Vec<Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["filename"], "q3.txt");

        let (_, body) = send(&app, get("/search?query=REVENUE")).await;
        let files: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(files, vec!["q3.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_recent_lists_last_read_first() {
        let (_dir, app) = app();
        for name in ["a.txt", "b.txt", "c.txt"] {
            send(&app, put(&format!("/files/{name}"), "text/plain", name)).await;
        }
        send(&app, get("/files/c.txt")).await;
        send(&app, get("/files/a.txt")).await;

        let (status, body) = send(&app, get("/recent?limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        let records: Vec<Value> = serde_json::from_str(&body).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r["filename"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["a.txt", "c.txt"]);

        let (_, body) = send(&app, get("/recent")).await;
        let records: Vec<Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2]["filename"], "b.txt");
    }

    #[tokio::test]
    async fn test_mcp_endpoint() {
        let (_dir, app) = app();

        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .body(Body::from(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["id"], 7);

        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .body(Body::from(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(body.is_empty());
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_size_limits() {
        unsafe {
            std::env::remove_var(MAX_REQUEST_BODY_ENV);
        }
        assert_eq!(parse_size_limits_from_env().max_request_body_bytes, 100 * 1024 * 1024);

        unsafe {
            std::env::set_var(MAX_REQUEST_BODY_ENV, "1048576");
        }
        assert_eq!(parse_size_limits_from_env().max_request_body_bytes, 1_048_576);

        unsafe {
            std::env::set_var(MAX_REQUEST_BODY_ENV, "0");
        }
        assert_eq!(parse_size_limits_from_env().max_request_body_bytes, 100 * 1024 * 1024);

        unsafe {
            std::env::remove_var(MAX_REQUEST_BODY_ENV);
        }
    }
}
