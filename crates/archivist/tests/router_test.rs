//! JSON-RPC envelope properties of the router.

use archivist::plugins::{ContentExtractor, Plugin};
use archivist::{ExtractorRegistry, KnowledgeStore, McpRouter, MetadataCatalog, Result, ServerConfig};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn router() -> (TempDir, McpRouter) {
    let dir = tempfile::tempdir().unwrap();
    let router = McpRouter::from_config(&ServerConfig::with_store_path(dir.path())).unwrap();
    (dir, router)
}

fn call(router: &McpRouter, message: Value) -> Value {
    let response = router.handle(&message.to_string()).expect("expected a response");
    serde_json::from_str(&response).unwrap()
}

fn tool(router: &McpRouter, name: &str, arguments: Value) -> (String, bool) {
    let value = call(
        router,
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call", "params": {"name": name, "arguments": arguments}}),
    );
    (
        value["result"]["content"][0]["text"].as_str().unwrap().to_string(),
        value["result"]["isError"].as_bool().unwrap(),
    )
}

#[test]
fn test_every_response_has_id_and_exactly_one_outcome() {
    let (_dir, router) = router();
    let inputs = [
        "",
        "[]",
        "42",
        r#"{"jsonrpc":"2.0"}"#,
        r#"{"jsonrpc":"2.0","id":1,"method":7}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"initialize"}"#,
        r#"{"jsonrpc":"2.0","id":"s","method":"tools/list"}"#,
        r#"{"jsonrpc":"2.0","id":3,"method":"nope"}"#,
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":"oops"}"#,
        r#"{"jsonrpc":"2.0","id":5,"method":"notifications/progress"}"#,
    ];

    for input in inputs {
        let response = router.handle(input).unwrap_or_else(|| panic!("no response for {input:?}"));
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert!(value.get("id").is_some(), "missing id for {input:?}");
        assert!(
            value.get("result").is_some() ^ value.get("error").is_some(),
            "expected exactly one of result/error for {input:?}"
        );
    }
}

#[test]
fn test_ids_are_echoed_with_their_type() {
    let (_dir, router) = router();
    assert_eq!(call(&router, json!({"jsonrpc": "2.0", "id": 42, "method": "tools/list"}))["id"], 42);
    assert_eq!(
        call(&router, json!({"jsonrpc": "2.0", "id": "req-9", "method": "tools/list"}))["id"],
        "req-9"
    );
}

#[test]
fn test_non_string_method_is_invalid_request() {
    let (_dir, router) = router();
    let value = call(&router, json!({"jsonrpc": "2.0", "id": 1, "method": 7}));
    assert_eq!(value["error"]["code"], -32600);
}

#[test]
fn test_tool_error_texts() {
    let (_dir, router) = router();

    let (text, is_error) = tool(&router, "read_file", json!({}));
    assert_eq!(text, "Error: filename parameter is required");
    assert!(is_error);

    let (text, is_error) = tool(&router, "read_file", json!({"filename": "missing.txt"}));
    assert!(text.starts_with("Error: "));
    assert!(is_error);

    let (text, is_error) = tool(&router, "read_file", json!({"filename": "../escape.txt"}));
    assert!(text.starts_with("Error: "));
    assert!(is_error);

    let (text, is_error) = tool(&router, "delete_everything", json!({}));
    assert_eq!(text, "Unknown tool: delete_everything");
    assert!(!is_error);
}

#[test]
fn test_metadata_round_trip_through_tools() {
    let (_dir, router) = router();

    tool(&router, "write_file", json!({"filename": "q3.txt", "content": "revenue up"}));
    let (text, is_error) = tool(
        &router,
        "update_file_metadata",
        json!({"filename": "q3.txt", "tags": ["finance"], "description": "Quarterly numbers"}),
    );
    assert_eq!(text, "Metadata updated successfully for: q3.txt");
    assert!(!is_error);

    let (text, _) = tool(&router, "search_files_by_metadata", json!({"query": "FINANCE"}));
    assert!(text.contains("q3.txt"));

    let (text, _) = tool(&router, "get_file_info", json!({"filename": "q3.txt"}));
    let info: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(info["filename"], "q3.txt");
    assert_eq!(info["size"], 10);
    assert_eq!(info["mimeType"], "text/plain");

    let (text, _) = tool(&router, "get_knowledge_store_overview", json!({}));
    assert!(text.contains("📊 Total Files: 1"));
    assert!(text.contains("text: 1"));
}

struct PanickingExtractor;

impl Plugin for PanickingExtractor {
    fn name(&self) -> &str {
        "panicking-extractor"
    }
    fn version(&self) -> String {
        "0.0.1".to_string()
    }
    fn initialize(&self) -> Result<()> {
        Ok(())
    }
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

impl ContentExtractor for PanickingExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["boom"]
    }

    fn extract(&self, _path: &Path, _extension: &str) -> Result<String> {
        panic!("extractor exploded");
    }
}

#[test]
fn test_panicking_tool_becomes_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::with_store_path(dir.path());

    let mut registry = ExtractorRegistry::with_defaults().unwrap();
    registry.register(Arc::new(PanickingExtractor)).unwrap();

    let catalog = Arc::new(MetadataCatalog::open(&config).unwrap());
    let store = Arc::new(KnowledgeStore::with_registry(&config, catalog, registry).unwrap());
    let router = McpRouter::new(&config, store);

    std::fs::write(dir.path().join("x.boom"), "content").unwrap();

    let value = call(
        &router,
        json!({"jsonrpc": "2.0", "id": 11, "method": "tools/call", "params": {"name": "read_file", "arguments": {"filename": "x.boom"}}}),
    );
    assert_eq!(value["id"], 11);
    assert_eq!(value["error"]["code"], -32603);
    assert!(value["error"]["message"].as_str().unwrap().contains("extractor exploded"));

    // the router keeps working afterwards
    let value = call(&router, json!({"jsonrpc": "2.0", "id": 12, "method": "tools/list"}));
    assert!(value.get("result").is_some());
}
