//! Human-readable renderings of store and catalog results.
//!
//! These are the texts tool calls return to agents.

use crate::types::{CatalogOverview, FileMetadata};
use std::fmt::Write;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Format a byte count as `B`, `KB`, `MB` or `GB` with one decimal.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let value = bytes as f64;
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if value < MB {
        format!("{:.1} KB", value / KB)
    } else if value < GB {
        format!("{:.1} MB", value / MB)
    } else {
        format!("{:.1} GB", value / GB)
    }
}

pub fn format_file_list(files: &[String]) -> String {
    if files.is_empty() {
        return "No files found in knowledge store".to_string();
    }
    format!("Files in knowledge store:\n{}", files.join("\n"))
}

pub fn format_metadata_listing(records: &[FileMetadata]) -> String {
    if records.is_empty() {
        return "No files found in knowledge store".to_string();
    }

    let mut out = String::new();
    out.push_str("📚 Files in Knowledge Store with Metadata:\n");
    out.push_str(RULE);
    out.push('\n');

    for metadata in records {
        let _ = write!(out, "\n📄 {}", metadata.filename);
        if let Some(description) = &metadata.description {
            let _ = write!(out, "\n   📝 Description: {}", description);
        }
        if let Some(summary) = &metadata.summary {
            let _ = write!(out, "\n   📋 Summary: {}", summary);
        }
        let _ = write!(out, "\n   📂 Category: {}", metadata.category);
        if !metadata.tags.is_empty() {
            let _ = write!(out, "\n   🏷️  Tags: {}", metadata.tags.join(", "));
        }
        let _ = write!(out, "\n   💾 Size: {}", format_file_size(metadata.size));
        if metadata.is_large_file {
            out.push_str(" ⚠️ Large file - consider reading summary first");
        }
        out.push('\n');
    }

    out
}

pub fn format_content_matches(query: &str, files: &[String]) -> String {
    if files.is_empty() {
        return format!("No files found matching query: {}", query);
    }

    let lines: Vec<String> = files
        .iter()
        .map(|file| format!("{} - Content matches query", file))
        .collect();
    format!("Files matching query '{}':\n{}", query, lines.join("\n"))
}

pub fn format_metadata_matches(query: &str, records: &[FileMetadata]) -> String {
    if records.is_empty() {
        return format!("No files found matching metadata query: {}", query);
    }

    let mut out = format!("Files matching metadata query '{}':\n", query);
    for metadata in records {
        let _ = write!(out, "\n📄 {}", metadata.filename);
        if let Some(description) = &metadata.description {
            let _ = write!(out, "\n   Description: {}", description);
        }
        if let Some(summary) = &metadata.summary {
            let _ = write!(out, "\n   Summary: {}", summary);
        }
        if !metadata.tags.is_empty() {
            let _ = write!(out, "\n   Tags: {}", metadata.tags.join(", "));
        }
        let _ = write!(out, "\n   Category: {}", metadata.category);
        let _ = write!(out, "\n   Size: {}", format_file_size(metadata.size));
        if metadata.is_large_file {
            out.push_str(" ⚠️ Large file - consider using summary");
        }
        out.push('\n');
    }

    out
}

pub fn format_category(category: &str, records: &[FileMetadata]) -> String {
    if records.is_empty() {
        return format!("No files found in category: {}", category);
    }

    let mut out = format!("Files in category '{}':\n", category);
    for metadata in records {
        let _ = write!(out, "\n📄 {}", metadata.filename);
        if let Some(description) = &metadata.description {
            let _ = write!(out, " - {}", description);
        }
        if metadata.is_large_file {
            out.push_str(" ⚠️ Large file");
        }
    }

    out
}

/// Overview text; categories are listed by count descending, then by name.
pub fn format_overview(overview: &CatalogOverview) -> String {
    let mut out = String::new();
    out.push_str("📚 Knowledge Store Overview\n");
    out.push_str(RULE);
    out.push('\n');
    let _ = writeln!(out, "📊 Total Files: {}", overview.total_files);
    let _ = writeln!(out, "💾 Total Size: {}", format_file_size(overview.total_size));
    let _ = writeln!(out, "⚠️  Large Files: {}\n", overview.large_files);

    if !overview.category_counts.is_empty() {
        let mut counts: Vec<(&String, &usize)> = overview.category_counts.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        out.push_str("📂 Files by Category:\n");
        for (category, count) in counts {
            let _ = writeln!(out, "   {}: {}", category, count);
        }
    }

    out
}
