//! REST API server for the knowledge store.
//!
//! An Axum router exposing the store and catalog operations as plain HTTP
//! endpoints, plus a `POST /mcp` endpoint that accepts a raw JSON-RPC message.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /files` - List store files
//! - `GET /files/{name}` - Read a file's text
//! - `PUT /files/{name}` - Write a file (body is the content)
//! - `GET /info/{name}` - Filesystem facts for a file
//! - `PUT /metadata/{name}` - Partial metadata update (JSON body)
//! - `GET /files-with-metadata` - Every file with its catalog record
//! - `GET /overview` - Catalog statistics
//! - `GET /search?query=` - Content search
//! - `GET /search-metadata?query=` - Metadata search
//! - `GET /category/{category}` - Records in a category, newest first
//! - `GET /recent?limit=` - Most recently read records (default 10)
//! - `POST /mcp` - One JSON-RPC message; 202 with an empty body for notifications
//!
//! # Examples
//!
//! ```no_run
//! use archivist::{McpRouter, ServerConfig, api::serve};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> archivist::Result<()> {
//!     let config = ServerConfig::with_store_path("./knowledgeStore");
//!     let router = Arc::new(McpRouter::from_config(&config)?);
//!     serve(router, "127.0.0.1", 8080).await?;
//!     Ok(())
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! curl -X PUT --data-binary @notes.md http://localhost:8080/files/notes.md
//! curl http://localhost:8080/files/notes.md
//! curl -X PUT -H 'Content-Type: application/json' \
//!      -d '{"tags":["finance"]}' http://localhost:8080/metadata/notes.md
//! curl 'http://localhost:8080/search-metadata?query=finance'
//! curl -d '{"jsonrpc":"2.0","id":1,"method":"tools/list"}' http://localhost:8080/mcp
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, create_router_with_limits, serve, serve_with_limits};
pub use types::{ApiSizeLimits, ApiState, ErrorResponse, HealthResponse, RecentQuery, SearchQuery};
