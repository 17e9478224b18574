//! Local file fetching
//!
//! Reads text-based documents off disk. Missing files, oversized files and
//! unsupported extensions are failed outcomes; the engine persists those
//! records with the error in their metadata.

use crate::fetch::FetchOutcome;
use crate::source::source_basename;
use std::path::Path;

/// Files larger than this are refused
pub const MAX_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;

/// Extensions treated as plain text beyond .md/.txt
const TEXT_EXTENSIONS: &[&str] = &[
    "py", "js", "rs", "java", "cpp", "c", "h", "html", "htm", "css", "xml", "json", "yaml", "yml",
    "sql", "sh", "csv", "tsv", "log", "ini", "cfg", "conf", "toml",
];

/// Reads and normalizes one local document
pub async fn fetch_file(path_str: &str) -> FetchOutcome {
    let path = Path::new(path_str);
    let title = Some(source_basename(path_str));

    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(_) => {
            tracing::warn!("File not found: {}", path_str);
            return FetchOutcome::failure(format!("File not found: {}", path_str), title);
        }
    };

    if metadata.len() > MAX_FILE_SIZE_BYTES {
        let error = format!(
            "File too large: {} bytes > {} bytes",
            metadata.len(),
            MAX_FILE_SIZE_BYTES
        );
        tracing::warn!("Skipping {}: {}", path_str, error);
        return FetchOutcome::failure(error, title);
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if !is_text_extension(&ext) {
        let error = format!("Unsupported file type: .{}", ext);
        tracing::warn!("Cannot parse {}: {}", path_str, error);
        return FetchOutcome::failure(error, title);
    }

    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            tracing::info!("Read {}: content_length={}", path_str, text.len());
            FetchOutcome {
                text,
                title,
                raw_html: None,
                error: None,
            }
        }
        Err(e) => FetchOutcome::failure(format!("FileReadError: {}", e), title),
    }
}

fn is_text_extension(ext: &str) -> bool {
    ext == "md" || ext == "txt" || TEXT_EXTENSIONS.contains(&ext)
}
