//! TCP transport: one task per connection, newline-delimited messages.

use crate::Result;
use crate::mcp::McpRouter;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};

/// Bind `addr` and serve connections forever.
pub async fn serve_tcp(router: Arc<McpRouter>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("MCP server listening on tcp://{}", listener.local_addr()?);
    accept_loop(router, listener).await
}

/// Serve connections accepted from an already bound listener.
pub async fn accept_loop(router: Arc<McpRouter>, listener: TcpListener) -> Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        tracing::debug!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(router, stream).await {
                tracing::warn!("Connection {} closed with error: {}", peer, e);
            } else {
                tracing::debug!("Connection {} closed", peer);
            }
        });
    }
}

async fn handle_connection(router: Arc<McpRouter>, stream: TcpStream) -> Result<()> {
    let (read_half, write_half) = stream.into_split();
    super::serve_lines(router, BufReader::new(read_half), write_half).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ServerConfig;
    use serde_json::Value;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_tcp_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let router = Arc::new(McpRouter::from_config(&ServerConfig::with_store_path(dir.path())).unwrap());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(accept_loop(router, listener));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        write_half
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":\"t-1\",\"method\":\"resources/list\"}\n")
            .await
            .unwrap();

        let mut lines = BufReader::new(read_half).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["id"], "t-1");
        assert_eq!(value["result"]["resources"], serde_json::json!([]));

        server.abort();
    }
}
