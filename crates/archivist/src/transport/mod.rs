//! Transport adapters.
//!
//! Each transport moves newline-delimited messages between a byte stream and
//! [`McpRouter::handle`](crate::mcp::McpRouter::handle). Messages from one stream
//! are handled strictly in order: the next line is not read until the previous
//! response has been written.

pub mod stdio;
pub mod tcp;

pub use stdio::run_stdio;
pub use tcp::serve_tcp;

use crate::Result;
use crate::mcp::McpRouter;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Serve newline-delimited JSON-RPC over `reader`/`writer` until EOF.
///
/// Blank lines are skipped. Lines that are not valid UTF-8 are decoded lossily
/// and handed to the router like any other message. Each message runs on the
/// blocking pool because the router does synchronous file I/O.
pub async fn serve_lines<R, W>(router: Arc<McpRouter>, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = match String::from_utf8(std::mem::take(&mut buf)) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Message is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        let handler = Arc::clone(&router);
        let response = match tokio::task::spawn_blocking(move || handler.handle(&line)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Message handler task failed: {}", e);
                continue;
            }
        };

        if let Some(response) = response {
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ServerConfig;
    use serde_json::Value;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_serve_lines_answers_in_order_and_skips_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let router = Arc::new(McpRouter::from_config(&ServerConfig::with_store_path(dir.path())).unwrap());

        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );

        let mut output = Vec::new();
        serve_lines(router, BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        let responses: Vec<Value> = text.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let router = Arc::new(McpRouter::from_config(&ServerConfig::with_store_path(dir.path())).unwrap());

        let mut input = Vec::new();
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"read_file\",\"arguments\":{\"filename\":\"caf\xFF.txt\"}}}\n");
        input.extend_from_slice(b"\xFF\xFE garbage\n");
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"prompts/list"}"#);
        input.push(b'\n');

        let mut output = Vec::new();
        serve_lines(router, BufReader::new(input.as_slice()), &mut output)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        let responses: Vec<Value> = text.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(responses.len(), 3);

        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["isError"], true);

        assert_eq!(responses[1]["id"], "1");
        assert_eq!(responses[1]["error"]["code"], -32603);

        assert_eq!(responses[2]["id"], 2);
        assert_eq!(responses[2]["result"]["prompts"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let router = Arc::new(McpRouter::from_config(&ServerConfig::with_store_path(dir.path())).unwrap());

        let input = br#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#;
        let mut output = Vec::new();
        serve_lines(router, BufReader::new(&input[..]), &mut output)
            .await
            .unwrap();

        let value: Value = serde_json::from_str(String::from_utf8(output).unwrap().trim()).unwrap();
        assert_eq!(value["id"], 3);
    }
}
