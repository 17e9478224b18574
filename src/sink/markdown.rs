//! Markdown file sink
//!
//! Each stored source becomes one Markdown file named
//! `{session}_{name}_{hash8}.md`, where `hash8` is the first eight hex
//! characters of the SHA-256 of the normalized source identity. The hash
//! suffix is the durable identity: on startup the sink scans the output
//! directory for existing suffixes, so re-running against the same
//! directory skips sources persisted by earlier runs.

use crate::sink::{ContentRecord, Sink, SinkError};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Maximum characters of title carried into the filename
const NAME_CHARS: usize = 50;

/// Sink writing one Markdown file per processed source
pub struct MarkdownSink {
    output_dir: PathBuf,
    session: String,
    ledger: Mutex<HashSet<String>>,
}

impl MarkdownSink {
    /// Opens a sink over `output_dir`, creating it if needed and seeding
    /// the ledger from files already present
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, SinkError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).map_err(|source| SinkError::CreateDir {
            path: output_dir.display().to_string(),
            source,
        })?;

        let ledger = seed_ledger(&output_dir);
        if !ledger.is_empty() {
            tracing::info!(
                "Found {} previously stored sources in {}",
                ledger.len(),
                output_dir.display()
            );
        }

        let session = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

        Ok(Self {
            output_dir,
            session,
            ledger: Mutex::new(ledger),
        })
    }

    fn file_path(&self, record: &ContentRecord<'_>, hash8: &str) -> PathBuf {
        let name = record
            .title
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.to_string())
            .unwrap_or_else(|| "untitled".to_string());
        let safe = safe_filename(&name);
        self.output_dir
            .join(format!("{}_{}_{}.md", self.session, safe, hash8))
    }

    fn render(&self, record: &ContentRecord<'_>) -> String {
        let title = record
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled");

        let mut body = String::new();
        body.push_str(&format!("# {}\n\n", title));
        body.push_str("## Metadata\n\n");
        body.push_str(&format!("- **Source:** {}\n", record.source));
        body.push_str(&format!(
            "- **Scraped:** {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        body.push_str(&format!("- **Details:** {}\n", record.metadata_summary));
        if let Some(score) = record.topic_relevance {
            body.push_str(&format!("- **Topic Relevance:** {:.3}\n", score));
        }
        body.push_str("\n## Content\n\n");
        body.push_str(record.text);
        body.push('\n');
        body
    }
}

impl Sink for MarkdownSink {
    fn is_processed(&self, source: &str) -> bool {
        let hash8 = source_hash8(source);
        self.ledger.lock().unwrap().contains(&hash8)
    }

    fn store(&self, record: &ContentRecord<'_>) -> Result<(), SinkError> {
        let hash8 = source_hash8(record.source);

        // Atomic check-and-claim; a repeat store is a no-op
        if !self.ledger.lock().unwrap().insert(hash8.clone()) {
            tracing::debug!("Already stored, skipping: {}", record.source);
            return Ok(());
        }

        let path = self.file_path(record, &hash8);
        let body = self.render(record);

        if let Err(source) = std::fs::write(&path, body) {
            self.ledger.lock().unwrap().remove(&hash8);
            return Err(SinkError::Write {
                path: path.display().to_string(),
                source,
            });
        }

        tracing::info!("Stored {} -> {}", record.source, path.display());
        Ok(())
    }
}

/// First eight hex characters of the SHA-256 of the source identity
fn source_hash8(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    hex::encode(digest)[..8].to_string()
}

/// Collects the hash suffixes of Markdown files already in the directory
fn seed_ledger(dir: &Path) -> HashSet<String> {
    let mut ledger = HashSet::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return ledger,
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(stem) = name.strip_suffix(".md") {
            if let Some(suffix) = stem.rsplit('_').next() {
                if suffix.len() == 8 && suffix.chars().all(|c| c.is_ascii_hexdigit()) {
                    ledger.insert(suffix.to_string());
                }
            }
        }
    }

    ledger
}

/// Reduces a title to a filesystem-safe fragment
fn safe_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    let collapsed: String = cleaned
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let truncated: String = collapsed.chars().take(NAME_CHARS).collect();
    if truncated.is_empty() {
        "untitled".to_string()
    } else {
        truncated
    }
}
