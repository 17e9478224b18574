//! Content fetching for web and file sources
//!
//! The engine sees one seam here: [`Fetcher::fetch`] takes a source and
//! returns a [`FetchOutcome`]. Failures are data, not errors — a failed
//! fetch comes back with an error message and empty content so the engine
//! can persist a visible record of it instead of dropping the source.

mod file;
mod http;
mod parser;

pub use parser::{extract_links, DiscoveredLink};

use crate::config::FetchConfig;
use crate::source::{self, SourceKind};
use async_trait::async_trait;

/// What came back from fetching one source
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Extracted plain text; empty on failure
    pub text: String,

    /// Extracted title, if any
    pub title: Option<String>,

    /// Raw HTML body; only populated for successful web fetches
    pub raw_html: Option<String>,

    /// Error description when the fetch failed
    pub error: Option<String>,
}

impl FetchOutcome {
    /// Builds a failed outcome with the given error and optional title
    pub fn failure(error: impl Into<String>, title: Option<String>) -> Self {
        Self {
            text: String::new(),
            title,
            raw_html: None,
            error: Some(error.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Retrieves raw content for one source
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, source: &str) -> FetchOutcome;
}

/// Default fetcher handling both web URLs and local files
pub struct ContentFetcher {
    client: reqwest::Client,
}

impl ContentFetcher {
    /// Builds a fetcher with a shared HTTP client from the fetch settings
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = http::build_http_client(config)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for ContentFetcher {
    async fn fetch(&self, source: &str) -> FetchOutcome {
        match SourceKind::of(source) {
            SourceKind::Web => http::fetch_web(&self.client, source).await,
            SourceKind::File => file::fetch_file(source).await,
        }
    }
}

/// Title fallback when a fetch produced none: the file's basename for local
/// sources, the URL itself for web sources
pub fn fallback_title(source: &str) -> String {
    match SourceKind::of(source) {
        SourceKind::Web => source.to_string(),
        SourceKind::File => source::source_basename(source),
    }
}
