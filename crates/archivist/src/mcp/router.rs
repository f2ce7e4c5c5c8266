//! Protocol message router.
//!
//! [`McpRouter::handle`] is the single entry point every transport uses: raw
//! message in, optional raw response out. Nothing it is given can make it fail;
//! malformed input, unknown methods and panics in tools all come back as
//! JSON-RPC error envelopes.

use crate::catalog::MetadataCatalog;
use crate::core::config::ServerConfig;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{
    InitializeResult, RequestId, Response, RpcMethod, ServerCapabilities, ServerInfo, ToolResult, ToolsCallParams,
    is_notification_method,
};
use crate::mcp::tools::{ToolInvoker, tool_descriptors};
use crate::store::KnowledgeStore;
use serde_json::{Value, json};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Routes JSON-RPC messages to protocol handlers and tools.
#[derive(Debug, Clone)]
pub struct McpRouter {
    server_info: ServerInfo,
    protocol_version: String,
    invoker: ToolInvoker,
}

impl McpRouter {
    pub fn new(config: &ServerConfig, store: Arc<KnowledgeStore>) -> Self {
        Self {
            server_info: ServerInfo {
                name: config.server_name.clone(),
                version: config.server_version.clone(),
            },
            protocol_version: config.protocol_version.clone(),
            invoker: ToolInvoker::new(store),
        }
    }

    /// Open the catalog and store described by `config` and build a router over them.
    pub fn from_config(config: &ServerConfig) -> crate::Result<Self> {
        config.validate()?;
        let catalog = Arc::new(MetadataCatalog::open(config)?);
        let store = Arc::new(KnowledgeStore::new(config, catalog)?);
        Ok(Self::new(config, store))
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        self.invoker.store()
    }

    pub fn invoker(&self) -> &ToolInvoker {
        &self.invoker
    }

    /// Handle one raw message. `None` means the message was a notification.
    pub fn handle(&self, raw: &str) -> Option<String> {
        self.handle_message(raw).map(|response| response.to_json())
    }

    /// Handle one raw message, returning the typed response envelope.
    ///
    /// A `method` that is absent or not a JSON string (`null`, a number, an
    /// object) is an invalid request (-32600), not an unknown method.
    pub fn handle_message(&self, raw: &str) -> Option<Response> {
        let message: Value = match serde_json::from_str(raw) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!("Unparseable message: {}", e);
                return Some(Response::error(RequestId::fallback(), &McpError::Parse(e.to_string())));
            }
        };

        let inbound_id = message.get("id").and_then(RequestId::from_value);
        let has_id = inbound_id.is_some();
        let id = inbound_id.unwrap_or_else(RequestId::fallback);

        let Some(method) = message.get("method").and_then(Value::as_str) else {
            return Some(Response::error(
                id,
                &McpError::InvalidRequest("missing method".to_string()),
            ));
        };

        if method == RpcMethod::Initialized.as_str() {
            tracing::debug!("Client initialized");
            return None;
        }
        if is_notification_method(method) && !has_id {
            tracing::debug!("Ignoring notification {}", method);
            return None;
        }

        let params = message.get("params");
        tracing::debug!("Dispatching {}", method);

        let outcome = catch_unwind(AssertUnwindSafe(|| self.dispatch(method, params)));
        match outcome {
            Ok(Ok(result)) => Some(Response::success(id, result)),
            Ok(Err(e)) => {
                tracing::debug!("{} failed: {}", method, e);
                Some(Response::error(id, &e))
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                tracing::error!("Panic while handling {}: {}", method, reason);
                Some(Response::error(id, &McpError::Internal(reason)))
            }
        }
    }

    fn dispatch(&self, method: &str, params: Option<&Value>) -> Result<Value, McpError> {
        match RpcMethod::parse(method)? {
            RpcMethod::Initialize => Ok(serde_json::to_value(InitializeResult {
                protocol_version: self.protocol_version.clone(),
                server_info: self.server_info.clone(),
                capabilities: ServerCapabilities::default(),
            })?),
            RpcMethod::ToolsList => Ok(json!({ "tools": tool_descriptors() })),
            RpcMethod::ToolsCall => Ok(serde_json::to_value(self.call_tool(params))?),
            RpcMethod::PromptsList => Ok(json!({ "prompts": [] })),
            RpcMethod::ResourcesList => Ok(json!({ "resources": [] })),
            // never dispatched, filtered out in handle_message
            RpcMethod::Initialized => Ok(Value::Null),
        }
    }

    fn call_tool(&self, params: Option<&Value>) -> ToolResult {
        match ToolsCallParams::decode(params) {
            Ok(call) => ToolResult::from_text(self.invoker.invoke(&call.name, &call.arguments)),
            Err(text) => ToolResult::from_text(text),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    fn router() -> (TempDir, McpRouter) {
        let dir = tempdir().unwrap();
        let config = ServerConfig::with_store_path(dir.path());
        let router = McpRouter::from_config(&config).unwrap();
        (dir, router)
    }

    fn parse(response: Option<String>) -> Value {
        serde_json::from_str(&response.expect("expected a response")).unwrap()
    }

    #[test]
    fn test_initialize() {
        let (_dir, router) = router();
        let value = parse(router.handle(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#));

        assert_eq!(value["id"], 1);
        assert_eq!(value["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(value["result"]["serverInfo"]["name"], "Knowledge Store MCP Server");
        assert_eq!(value["result"]["serverInfo"]["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(value["result"]["capabilities"]["tools"], json!({}));
    }

    #[test]
    fn test_initialized_notification_is_silent() {
        let (_dir, router) = router();
        assert!(router.handle(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).is_none());
        assert!(
            router
                .handle(r#"{"jsonrpc":"2.0","id":5,"method":"notifications/initialized"}"#)
                .is_none()
        );
    }

    #[test]
    fn test_other_notifications_without_id_are_silent() {
        let (_dir, router) = router();
        assert!(
            router
                .handle(r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":3}}"#)
                .is_none()
        );
    }

    #[test]
    fn test_parse_error_uses_fallback_id() {
        let (_dir, router) = router();
        let value = parse(router.handle("{not json"));
        assert_eq!(value["id"], "1");
        assert_eq!(value["error"]["code"], -32603);
        assert!(value["error"]["message"].as_str().unwrap().starts_with("Internal error: "));
    }

    #[test]
    fn test_missing_method() {
        let (_dir, router) = router();
        let value = parse(router.handle(r#"{"jsonrpc":"2.0","id":"abc"}"#));
        assert_eq!(value["id"], "abc");
        assert_eq!(value["error"]["code"], -32600);
        assert_eq!(value["error"]["message"], "Invalid Request: missing method");
    }

    #[test]
    fn test_non_string_method_is_invalid_request() {
        let (_dir, router) = router();
        for raw in [
            r#"{"jsonrpc":"2.0","id":1,"method":5}"#,
            r#"{"jsonrpc":"2.0","id":1,"method":null}"#,
        ] {
            let value = parse(router.handle(raw));
            assert_eq!(value["error"]["code"], -32600);
            assert_eq!(value["error"]["message"], "Invalid Request: missing method");
        }
    }

    #[test]
    fn test_unknown_method() {
        let (_dir, router) = router();
        let value = parse(router.handle(r#"{"jsonrpc":"2.0","id":9,"method":"tools/delete"}"#));
        assert_eq!(value["error"]["code"], -32603);
        assert_eq!(value["error"]["message"], "Internal error: Method not found: tools/delete");
    }

    #[test]
    fn test_request_without_id_still_answered() {
        let (_dir, router) = router();
        let value = parse(router.handle(r#"{"jsonrpc":"2.0","method":"prompts/list"}"#));
        assert_eq!(value["id"], "1");
        assert_eq!(value["result"]["prompts"], json!([]));
    }

    #[test]
    fn test_null_and_object_ids_fall_back() {
        let (_dir, router) = router();
        let value = parse(router.handle(r#"{"jsonrpc":"2.0","id":null,"method":"resources/list"}"#));
        assert_eq!(value["id"], "1");
        assert_eq!(value["result"]["resources"], json!([]));

        let value = parse(router.handle(r#"{"jsonrpc":"2.0","id":{"x":1},"method":"tools/list"}"#));
        assert_eq!(value["id"], "1");
    }

    #[test]
    fn test_tools_list() {
        let (_dir, router) = router();
        let value = parse(router.handle(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#));
        let tools = value["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 10);
        assert!(tools.iter().all(|tool| tool["inputSchema"]["type"] == "object"));
    }

    #[test]
    fn test_tools_call_missing_params_and_name() {
        let (_dir, router) = router();

        let value = parse(router.handle(r#"{"jsonrpc":"2.0","id":3,"method":"tools/call"}"#));
        assert_eq!(value["result"]["content"][0]["text"], "Error: Missing params for tools/call");
        assert_eq!(value["result"]["isError"], true);

        let value = parse(router.handle(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{}}"#));
        assert_eq!(value["result"]["content"][0]["text"], "Error: Missing tool name");
        assert_eq!(value["result"]["isError"], true);
    }

    #[test]
    fn test_tools_call_round_trip() {
        let (_dir, router) = router();

        let value = parse(router.handle(
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"write_file","arguments":{"filename":"a.txt","content":"hello"}}}"#,
        ));
        assert_eq!(value["result"]["content"][0]["text"], "File written successfully: a.txt");
        assert_eq!(value["result"]["isError"], false);

        let value = parse(router.handle(
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"read_file","arguments":{"filename":"a.txt"}}}"#,
        ));
        assert_eq!(value["result"]["content"][0]["text"], "hello");
    }
}
