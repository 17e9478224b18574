//! Inkcrawl: a topic-aware content crawler
//!
//! This crate crawls web pages and local documents, optionally scores their
//! relevance to a user-supplied topic, and persists extracted content as
//! Markdown files. The crawl engine owns a deduplicating frontier and
//! dispatches fetch/score/store work across a bounded worker pool.

pub mod config;
pub mod engine;
pub mod fetch;
pub mod semantic;
pub mod sink;
pub mod source;

use thiserror::Error;

/// Umbrella error for assembling and running a crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors turning a raw source string into a canonical identity
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Invalid file path: {0}")]
    Path(String),
}

/// Result type alias for assembling and running a crawl
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for source identity operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use engine::{CrawlEngine, CrawlSummary, Frontier, WorkItem};
pub use fetch::{ContentFetcher, FetchOutcome, Fetcher};
pub use semantic::{Scorer, SemanticScorer};
pub use sink::{ContentRecord, MarkdownSink, Sink};
pub use source::{normalize_source, Source, SourceKind};
