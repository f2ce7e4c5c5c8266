//! MCP (Model Context Protocol) surface.
//!
//! A hand-rolled JSON-RPC 2.0 router exposing the knowledge store as ten tools.
//! Transports only move raw strings; all protocol semantics live in
//! [`router::McpRouter`].
//!
//! # Example
//!
//! ```rust
//! use archivist::core::config::ServerConfig;
//! use archivist::mcp::McpRouter;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let router = McpRouter::from_config(&ServerConfig::with_store_path(dir.path())).unwrap();
//!
//! let response = router
//!     .handle(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
//!     .unwrap();
//! assert!(response.contains("read_file"));
//! assert!(router.handle(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).is_none());
//! ```

pub mod error;
pub mod protocol;
pub mod router;
pub mod tools;

pub use error::McpError;
pub use protocol::{RequestId, Response, ToolResult};
pub use router::McpRouter;
pub use tools::{ToolCall, ToolDescriptor, ToolInvoker, tool_descriptors};
