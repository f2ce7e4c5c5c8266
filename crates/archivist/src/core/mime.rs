//! MIME type detection and category inference.
//!
//! Maps file extensions to MIME types and to the coarse categories used by the
//! metadata catalog, and derives default tags from file names.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

pub const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";
pub const MARKDOWN_MIME_TYPE: &str = "text/markdown";
pub const HTML_MIME_TYPE: &str = "text/html";
pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const JSON_MIME_TYPE: &str = "application/json";
pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";

/// Extension to MIME type mapping for the formats the store cares about most.
static EXT_TO_MIME: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert("txt", PLAIN_TEXT_MIME_TYPE);
    m.insert("log", PLAIN_TEXT_MIME_TYPE);
    m.insert("md", MARKDOWN_MIME_TYPE);
    m.insert("markdown", MARKDOWN_MIME_TYPE);
    m.insert("html", HTML_MIME_TYPE);
    m.insert("htm", HTML_MIME_TYPE);
    m.insert("csv", "text/csv");
    m.insert("json", JSON_MIME_TYPE);
    m.insert("yaml", "application/x-yaml");
    m.insert("yml", "application/x-yaml");
    m.insert("toml", "application/toml");
    m.insert("xml", "application/xml");
    m.insert("rst", "text/x-rst");

    m.insert("pdf", PDF_MIME_TYPE);
    m.insert("rtf", "application/rtf");
    m.insert(
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    );
    m.insert("doc", "application/msword");
    m.insert("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet");
    m.insert("xls", "application/vnd.ms-excel");
    m.insert(
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    );
    m.insert("ppt", "application/vnd.ms-powerpoint");

    m.insert("jpg", "image/jpeg");
    m.insert("jpeg", "image/jpeg");
    m.insert("png", "image/png");
    m.insert("gif", "image/gif");
    m.insert("bmp", "image/bmp");
    m.insert("webp", "image/webp");
    m.insert("svg", "image/svg+xml");

    m.insert("mp4", "video/mp4");
    m.insert("avi", "video/x-msvideo");
    m.insert("mov", "video/quicktime");
    m.insert("mp3", "audio/mpeg");
    m.insert("wav", "audio/wav");

    m.insert("zip", "application/zip");
    m.insert("rar", "application/vnd.rar");

    m
});

/// Category assigned to a file by its extension.
static EXT_TO_CATEGORY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    for ext in ["pdf", "rtf", "docx", "doc"] {
        m.insert(ext, "document");
    }
    for ext in ["txt", "md"] {
        m.insert(ext, "text");
    }
    for ext in ["xlsx", "xls"] {
        m.insert(ext, "spreadsheet");
    }
    for ext in ["pptx", "ppt"] {
        m.insert(ext, "presentation");
    }
    for ext in ["jpg", "jpeg", "png", "gif"] {
        m.insert(ext, "image");
    }
    for ext in ["mp4", "avi", "mov"] {
        m.insert(ext, "video");
    }
    for ext in ["mp3", "wav"] {
        m.insert(ext, "audio");
    }
    for ext in ["zip", "rar"] {
        m.insert(ext, "archive");
    }

    m
});

/// Filename keywords and the tag each one adds.
const KEYWORD_TAGS: &[(&[&str], &str)] = &[
    (&["report"], "report"),
    (&["spec", "requirement"], "specification"),
    (&["manual", "guide"], "guide"),
    (&["contract", "agreement"], "legal"),
    (&["budget", "financial"], "finance"),
    (&["meeting", "notes"], "meeting"),
];

/// Category used when the extension is not recognized.
pub const DEFAULT_CATEGORY: &str = "other";

/// Detect the MIME type of a path from its extension.
///
/// Falls back to `mime_guess`, then to `application/octet-stream`.
pub fn detect_mime_type(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let extension = path.extension().and_then(|ext| ext.to_str()).map(|s| s.to_lowercase());

    if let Some(ext) = &extension
        && let Some(mime_type) = EXT_TO_MIME.get(ext.as_str())
    {
        return mime_type.to_string();
    }

    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| OCTET_STREAM_MIME_TYPE.to_string())
}

/// Category for a lower-cased extension (`"pdf"` → `"document"`).
pub fn category_for_extension(extension: &str) -> &'static str {
    EXT_TO_CATEGORY
        .get(extension.to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Default tags for a file: its extension followed by keyword tags from the name.
///
/// Keywords are matched case-insensitively against the whole identifier. A tag is
/// added at most once.
pub fn default_tags(filename: &str) -> Vec<String> {
    let lower = filename.to_lowercase();
    let mut tags = Vec::new();

    if let Some(ext) = Path::new(&lower).extension().and_then(|ext| ext.to_str())
        && !ext.is_empty()
    {
        tags.push(ext.to_string());
    }

    for (keywords, tag) in KEYWORD_TAGS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) && !tags.iter().any(|t| t == tag) {
            tags.push((*tag).to_string());
        }
    }

    tags
}
