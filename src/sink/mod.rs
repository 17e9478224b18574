//! Persistence of processed sources
//!
//! The engine talks to storage through the [`Sink`] trait: one idempotence
//! check and one store call per source. Every processed source gets stored,
//! including failed fetches, so a crawl leaves a visible record of
//! everything it touched.

mod markdown;

pub use markdown::MarkdownSink;

use thiserror::Error;

/// Storage-layer errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create output directory '{path}': {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// One processed source's record, as handed to the sink
#[derive(Debug, Clone)]
pub struct ContentRecord<'a> {
    /// Normalized source identity
    pub source: &'a str,

    /// Extracted or fallback title
    pub title: Option<&'a str>,

    /// Human-readable metadata summary, comma-joined parts
    pub metadata_summary: &'a str,

    /// Extracted plain text; empty for failed fetches
    pub text: &'a str,

    /// Topic relevance, when topic pruning was active
    pub topic_relevance: Option<f32>,
}

/// Durable destination for processed content
pub trait Sink: Send + Sync {
    /// Whether this source was already persisted, this run or a prior one
    fn is_processed(&self, source: &str) -> bool;

    /// Persists one record; a repeat store of the same source is a no-op
    fn store(&self, record: &ContentRecord<'_>) -> Result<(), SinkError>;
}
