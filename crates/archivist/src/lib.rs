//! Archivist - Knowledge Store MCP Server
//!
//! Archivist exposes a directory of documents to AI assistants over the Model Context
//! Protocol. Clients speak JSON-RPC 2.0 and call ten tools that list, read, search
//! and write files, and that query a persistent metadata catalog kept next to them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use archivist::{McpRouter, ServerConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> archivist::Result<()> {
//! let config = ServerConfig::with_store_path("./knowledgeStore");
//! let router = Arc::new(McpRouter::from_config(&config)?);
//! archivist::transport::run_stdio(router).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **MCP** (`mcp`): JSON-RPC envelopes, method routing and the tool invoker
//! - **Store** (`store`): file operations over the store root
//! - **Catalog** (`catalog`): per-file metadata persisted as a single JSON document
//! - **Extractors** (`extractors`, `plugins`): priority-based text extraction by extension
//! - **Transports** (`transport`, `api`): stdio, TCP and an optional HTTP API

#![deny(unsafe_code)]

pub mod catalog;
pub mod core;
pub mod error;
pub mod extractors;
pub mod mcp;
pub mod plugins;
pub mod store;
pub mod transport;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

pub use error::{ArchivistError, Result};
pub use types::*;

pub use catalog::MetadataCatalog;
pub use core::config::ServerConfig;
pub use mcp::{McpError, McpRouter, ToolInvoker};
pub use plugins::{ContentExtractor, ExtractorRegistry, Plugin};
pub use store::KnowledgeStore;
