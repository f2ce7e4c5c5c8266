//! Standard-stream transport.
//!
//! stdout carries JSON-RPC only; logs must go to stderr.

use crate::Result;
use crate::mcp::McpRouter;
use std::sync::Arc;
use tokio::io::BufReader;

/// Serve JSON-RPC on stdin/stdout until stdin closes.
pub async fn run_stdio(router: Arc<McpRouter>) -> Result<()> {
    tracing::info!("MCP server listening on stdio");

    let reader = BufReader::new(tokio::io::stdin());
    super::serve_lines(router, reader, tokio::io::stdout()).await?;

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
