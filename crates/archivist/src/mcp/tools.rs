//! Tool registry and invoker.
//!
//! The tool set is fixed at compile time. [`tool_descriptors`] is what
//! `tools/list` advertises, [`ToolCall`] is the decoded form of a call and
//! [`ToolInvoker`] runs it against the knowledge store.

use crate::store::KnowledgeStore;
use crate::store::format::{
    format_category, format_content_matches, format_file_list, format_metadata_listing, format_metadata_matches,
    format_overview,
};
use crate::types::MetadataPatch;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use thiserror::Error;

/// Advertised description of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn no_arguments() -> Value {
    json!({"type": "object", "properties": {}, "required": []})
}

fn string_property(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

static TOOLS: Lazy<Vec<ToolDescriptor>> = Lazy::new(|| {
    vec![
        ToolDescriptor {
            name: "list_files",
            description: "List all files in the knowledge store with basic info",
            input_schema: no_arguments(),
        },
        ToolDescriptor {
            name: "list_files_with_metadata",
            description: "List all files with rich metadata including descriptions, tags, categories, and size warnings",
            input_schema: no_arguments(),
        },
        ToolDescriptor {
            name: "read_file",
            description: "Read the content of a specific file",
            input_schema: json!({
                "type": "object",
                "properties": {"filename": string_property("Name of the file to read")},
                "required": ["filename"]
            }),
        },
        ToolDescriptor {
            name: "search_files",
            description: "Search for files containing specific text in content",
            input_schema: json!({
                "type": "object",
                "properties": {"query": string_property("Search query")},
                "required": ["query"]
            }),
        },
        ToolDescriptor {
            name: "search_files_by_metadata",
            description: "Search files by metadata (description, tags, category, summary) - smarter than content search",
            input_schema: json!({
                "type": "object",
                "properties": {"query": string_property("Metadata search query")},
                "required": ["query"]
            }),
        },
        ToolDescriptor {
            name: "get_files_by_category",
            description: "Get all files in a specific category (document, text, image, etc.)",
            input_schema: json!({
                "type": "object",
                "properties": {"category": string_property("Category name")},
                "required": ["category"]
            }),
        },
        ToolDescriptor {
            name: "get_knowledge_store_overview",
            description: "Get overview of the knowledge store with statistics and categories",
            input_schema: no_arguments(),
        },
        ToolDescriptor {
            name: "get_file_info",
            description: "Get detailed metadata information about a file",
            input_schema: json!({
                "type": "object",
                "properties": {"filename": string_property("Name of the file")},
                "required": ["filename"]
            }),
        },
        ToolDescriptor {
            name: "update_file_metadata",
            description: "Update metadata for a file (description, tags, category, summary)",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filename": string_property("Name of the file"),
                    "description": string_property("File description"),
                    "tags": {"type": "array", "items": {"type": "string"}, "description": "Tags for the file"},
                    "category": string_property("File category"),
                    "summary": string_property("File summary")
                },
                "required": ["filename"]
            }),
        },
        ToolDescriptor {
            name: "write_file",
            description: "Write content to a file",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filename": string_property("Name of the file to write"),
                    "content": string_property("Content to write to the file")
                },
                "required": ["filename", "content"]
            }),
        },
    ]
});

/// Every tool, in advertised order.
pub fn tool_descriptors() -> &'static [ToolDescriptor] {
    &TOOLS
}

/// A decoded tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    ListFiles,
    ListFilesWithMetadata,
    ReadFile { filename: String },
    SearchFiles { query: String },
    SearchFilesByMetadata { query: String },
    GetFilesByCategory { category: String },
    GetKnowledgeStoreOverview,
    GetFileInfo { filename: String },
    UpdateFileMetadata { filename: String, patch: MetadataPatch },
    WriteFile { filename: String, content: String },
}

/// Why a tool call could not be decoded. `Display` is the text returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Error: {0}")]
    MissingParameter(&'static str),

    #[error("Error: Invalid arguments for {tool}: {detail}")]
    InvalidArguments { tool: String, detail: String },
}

#[derive(Deserialize)]
struct FilenameArgs {
    filename: Option<String>,
}

#[derive(Deserialize)]
struct QueryArgs {
    query: Option<String>,
}

#[derive(Deserialize)]
struct CategoryArgs {
    category: Option<String>,
}

#[derive(Deserialize)]
struct UpdateMetadataArgs {
    filename: Option<String>,
    #[serde(flatten)]
    patch: MetadataPatch,
}

#[derive(Deserialize)]
struct WriteFileArgs {
    filename: Option<String>,
    content: Option<String>,
}

const FILENAME_REQUIRED: &str = "filename parameter is required";
const QUERY_REQUIRED: &str = "query parameter is required";

impl ToolCall {
    /// Decode `arguments` for the tool called `name`.
    ///
    /// Null or absent arguments count as an empty object. Unknown fields are ignored.
    pub fn decode(name: &str, arguments: &Value) -> Result<Self, ToolCallError> {
        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            Value::Object(_) => arguments.clone(),
            _ => {
                return Err(ToolCallError::InvalidArguments {
                    tool: name.to_string(),
                    detail: "arguments must be a JSON object".to_string(),
                });
            }
        };

        match name {
            "list_files" => Ok(ToolCall::ListFiles),
            "list_files_with_metadata" => Ok(ToolCall::ListFilesWithMetadata),
            "get_knowledge_store_overview" => Ok(ToolCall::GetKnowledgeStoreOverview),
            "read_file" => {
                let args: FilenameArgs = parse_args(name, arguments)?;
                Ok(ToolCall::ReadFile {
                    filename: required(args.filename, FILENAME_REQUIRED)?,
                })
            }
            "get_file_info" => {
                let args: FilenameArgs = parse_args(name, arguments)?;
                Ok(ToolCall::GetFileInfo {
                    filename: required(args.filename, FILENAME_REQUIRED)?,
                })
            }
            "search_files" => {
                let args: QueryArgs = parse_args(name, arguments)?;
                Ok(ToolCall::SearchFiles {
                    query: required(args.query, QUERY_REQUIRED)?,
                })
            }
            "search_files_by_metadata" => {
                let args: QueryArgs = parse_args(name, arguments)?;
                Ok(ToolCall::SearchFilesByMetadata {
                    query: required(args.query, QUERY_REQUIRED)?,
                })
            }
            "get_files_by_category" => {
                let args: CategoryArgs = parse_args(name, arguments)?;
                Ok(ToolCall::GetFilesByCategory {
                    category: required(args.category, "category parameter is required")?,
                })
            }
            "update_file_metadata" => {
                let args: UpdateMetadataArgs = parse_args(name, arguments)?;
                Ok(ToolCall::UpdateFileMetadata {
                    filename: required(args.filename, FILENAME_REQUIRED)?,
                    patch: args.patch,
                })
            }
            "write_file" => {
                let args: WriteFileArgs = parse_args(name, arguments)?;
                match (args.filename, args.content) {
                    (Some(filename), Some(content)) => Ok(ToolCall::WriteFile { filename, content }),
                    _ => Err(ToolCallError::MissingParameter(
                        "filename and content parameters are required",
                    )),
                }
            }
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::ListFiles => "list_files",
            ToolCall::ListFilesWithMetadata => "list_files_with_metadata",
            ToolCall::ReadFile { .. } => "read_file",
            ToolCall::SearchFiles { .. } => "search_files",
            ToolCall::SearchFilesByMetadata { .. } => "search_files_by_metadata",
            ToolCall::GetFilesByCategory { .. } => "get_files_by_category",
            ToolCall::GetKnowledgeStoreOverview => "get_knowledge_store_overview",
            ToolCall::GetFileInfo { .. } => "get_file_info",
            ToolCall::UpdateFileMetadata { .. } => "update_file_metadata",
            ToolCall::WriteFile { .. } => "write_file",
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolCallError> {
    serde_json::from_value(arguments).map_err(|e| ToolCallError::InvalidArguments {
        tool: tool.to_string(),
        detail: e.to_string(),
    })
}

fn required(value: Option<String>, message: &'static str) -> Result<String, ToolCallError> {
    value.ok_or(ToolCallError::MissingParameter(message))
}

/// Runs decoded tool calls against the knowledge store.
#[derive(Debug, Clone)]
pub struct ToolInvoker {
    store: Arc<KnowledgeStore>,
}

impl ToolInvoker {
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    /// Invoke tool `name`. Never fails: every failure is rendered as text.
    pub fn invoke(&self, name: &str, arguments: &Value) -> String {
        let call = match ToolCall::decode(name, arguments) {
            Ok(call) => call,
            Err(e) => {
                tracing::debug!("Rejected call to '{}': {}", name, e);
                return e.to_string();
            }
        };

        match self.execute(&call) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Tool '{}' failed: {}", call.name(), e);
                format!("Error: {}", e)
            }
        }
    }

    /// Run a decoded call.
    pub fn execute(&self, call: &ToolCall) -> crate::Result<String> {
        let catalog = self.store.catalog();

        match call {
            ToolCall::ListFiles => Ok(format_file_list(&self.store.list_files()?)),
            ToolCall::ListFilesWithMetadata => Ok(format_metadata_listing(&self.store.list_files_with_metadata()?)),
            ToolCall::ReadFile { filename } => self.store.read_file(filename),
            ToolCall::SearchFiles { query } => Ok(format_content_matches(query, &self.store.search_files(query)?)),
            ToolCall::SearchFilesByMetadata { query } => Ok(format_metadata_matches(query, &catalog.search(query))),
            ToolCall::GetFilesByCategory { category } => Ok(format_category(category, &catalog.by_category(category))),
            ToolCall::GetKnowledgeStoreOverview => Ok(format_overview(&catalog.overview())),
            ToolCall::GetFileInfo { filename } => Ok(serde_json::to_string(&self.store.file_info(filename)?)?),
            ToolCall::UpdateFileMetadata { filename, patch } => {
                let metadata = self.store.update_metadata(filename, patch)?;
                Ok(format!("Metadata updated successfully for: {}", metadata.filename))
            }
            ToolCall::WriteFile { filename, content } => {
                let metadata = self.store.write_file(filename, content)?;
                Ok(format!("File written successfully: {}", metadata.filename))
            }
        }
    }
}
