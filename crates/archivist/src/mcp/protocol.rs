//! JSON-RPC 2.0 envelope types and MCP result payloads.
//!
//! A [`Response`] always carries an id and exactly one of `result` or `error`.
//! Both properties hold by construction.

use crate::mcp::error::McpError;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// Id substituted when the inbound message has none.
pub const FALLBACK_ID: &str = "1";

/// Request identifier, passed back with its original JSON type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
}

impl RequestId {
    pub fn fallback() -> Self {
        RequestId::String(FALLBACK_ID.to_string())
    }

    /// Usable id from an inbound `id` value; `None` for null, bool, array or object.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(RequestId::Number(n.clone())),
            Value::String(s) => Some(RequestId::String(s.clone())),
            _ => None,
        }
    }
}

/// Methods the router knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    Initialize,
    Initialized,
    ToolsList,
    ToolsCall,
    PromptsList,
    ResourcesList,
}

impl RpcMethod {
    pub fn parse(method: &str) -> Result<Self, McpError> {
        match method {
            "initialize" => Ok(RpcMethod::Initialize),
            "notifications/initialized" => Ok(RpcMethod::Initialized),
            "tools/list" => Ok(RpcMethod::ToolsList),
            "tools/call" => Ok(RpcMethod::ToolsCall),
            "prompts/list" => Ok(RpcMethod::PromptsList),
            "resources/list" => Ok(RpcMethod::ResourcesList),
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::Initialize => "initialize",
            RpcMethod::Initialized => "notifications/initialized",
            RpcMethod::ToolsList => "tools/list",
            RpcMethod::ToolsCall => "tools/call",
            RpcMethod::PromptsList => "prompts/list",
            RpcMethod::ResourcesList => "resources/list",
        }
    }
}

/// Methods under this prefix are notifications and never answered without an id.
pub fn is_notification_method(method: &str) -> bool {
    method.starts_with("notifications/")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
}

/// The `result` / `error` half of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(ErrorObject),
}

/// Outbound JSON-RPC response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: RequestId,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Response {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: RequestId, error: &McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: Outcome::Error(ErrorObject {
                code: error.code(),
                message: error.to_string(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// Serialize to a single line of JSON.
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                format!(
                    r#"{{"jsonrpc":"2.0","id":"{}","error":{{"code":{},"message":"Internal error"}}}}"#,
                    FALLBACK_ID,
                    crate::mcp::error::INTERNAL_ERROR
                )
            }
        }
    }
}

/// `tools/call` parameters after envelope decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolsCallParams {
    pub name: String,
    pub arguments: Value,
}

impl ToolsCallParams {
    /// Decode `params`; on failure returns the error text for the tool result.
    pub fn decode(params: Option<&Value>) -> Result<Self, &'static str> {
        let params = match params {
            Some(Value::Object(map)) => map,
            _ => return Err("Error: Missing params for tools/call"),
        };

        let name = match params.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => return Err("Error: Missing tool name"),
        };

        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
        Ok(Self { name, arguments })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub server_info: ServerInfo,
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Capability set advertised at `initialize`; every entry is an empty object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerCapabilities {
    pub tools: EmptyObject,
    pub prompts: EmptyObject,
    pub resources: EmptyObject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmptyObject {}

/// Result of `tools/call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    /// Wrap tool text; texts starting with `"Error: "` are flagged as errors.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            is_error: text.starts_with("Error: "),
            content: vec![ToolContent::Text { text }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_id_from_value() {
        assert_eq!(RequestId::from_value(&json!(7)), Some(RequestId::Number(7.into())));
        assert_eq!(
            RequestId::from_value(&json!("abc")),
            Some(RequestId::String("abc".to_string()))
        );
        assert_eq!(RequestId::from_value(&Value::Null), None);
        assert_eq!(RequestId::from_value(&json!(true)), None);
        assert_eq!(RequestId::from_value(&json!({"nested": 1})), None);
    }

    #[test]
    fn test_success_response_shape() {
        let response = Response::success(RequestId::Number(3.into()), json!({"ok": true}));
        let value: Value = serde_json::from_str(&response.to_json()).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 3);
        assert_eq!(value["result"]["ok"], true);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let response = Response::error(
            RequestId::fallback(),
            &McpError::InvalidRequest("missing method".to_string()),
        );
        assert!(response.is_error());

        let value: Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["error"]["code"], -32600);
        assert_eq!(value["error"]["message"], "Invalid Request: missing method");
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_response_deserializes_back() {
        let response = Response::success(RequestId::String("x".to_string()), json!([1, 2]));
        let parsed: Response = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_rpc_method_parse() {
        assert_eq!(RpcMethod::parse("tools/call").unwrap(), RpcMethod::ToolsCall);
        assert_eq!(RpcMethod::parse("initialize").unwrap().as_str(), "initialize");
        assert!(matches!(
            RpcMethod::parse("tools/delete"),
            Err(McpError::MethodNotFound(m)) if m == "tools/delete"
        ));
        assert!(is_notification_method("notifications/cancelled"));
        assert!(!is_notification_method("tools/list"));
    }

    #[test]
    fn test_tools_call_params_decode() {
        assert_eq!(
            ToolsCallParams::decode(None).unwrap_err(),
            "Error: Missing params for tools/call"
        );
        assert_eq!(
            ToolsCallParams::decode(Some(&json!({"arguments": {}}))).unwrap_err(),
            "Error: Missing tool name"
        );

        let params = ToolsCallParams::decode(Some(&json!({"name": "list_files"}))).unwrap();
        assert_eq!(params.name, "list_files");
        assert_eq!(params.arguments, Value::Null);
    }

    #[test]
    fn test_initialize_result_shape() {
        let result = InitializeResult {
            protocol_version: "2024-11-05".to_string(),
            server_info: ServerInfo {
                name: "Knowledge Store MCP Server".to_string(),
                version: "1.0.0".to_string(),
            },
            capabilities: ServerCapabilities::default(),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["protocolVersion"], "2024-11-05");
        assert_eq!(value["serverInfo"]["name"], "Knowledge Store MCP Server");
        assert_eq!(value["capabilities"], json!({"tools": {}, "prompts": {}, "resources": {}}));
    }

    #[test]
    fn test_tool_result_error_flag() {
        let ok = serde_json::to_value(ToolResult::from_text("Files in knowledge store:\na.txt")).unwrap();
        assert_eq!(ok["isError"], false);
        assert_eq!(ok["content"][0]["type"], "text");

        let err = ToolResult::from_text("Error: filename parameter is required");
        assert!(err.is_error);
    }
}
