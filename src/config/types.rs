use serde::Deserialize;

/// Top-level configuration, as loaded from a TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl engine configuration
///
/// Set once at engine construction and immutable for the duration of a run.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Number of concurrent workers processing sources
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Maximum link-hop depth from initial sources; -1 means unlimited
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: i32,

    /// Optional topic for relevance scoring and crawl pruning
    #[serde(default)]
    pub topic: Option<String>,

    /// Pages scoring below this against the topic are persisted but their
    /// outbound links are not followed
    #[serde(rename = "topic-threshold", default = "default_topic_threshold")]
    pub topic_threshold: f32,

    /// Above 0.8 this also switches link filtering into advanced
    /// (per-anchor scoring) mode
    #[serde(rename = "link-threshold", default = "default_link_threshold")]
    pub link_threshold: f32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            max_depth: default_max_depth(),
            topic: None,
            topic_threshold: default_topic_threshold(),
            link_threshold: default_link_threshold(),
        }
    }
}

impl CrawlConfig {
    /// Returns true if `depth` still has link-following budget left
    pub fn within_depth(&self, depth: u32) -> bool {
        self.max_depth == -1 || (depth as i64) < self.max_depth as i64
    }
}

/// Fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User agent sent with HTTP requests
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Semantic scorer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SemanticConfig {
    /// Embedding service host, e.g. "http://localhost:11434"; None disables
    /// embedding-backed scoring (the keyword heuristic still applies)
    #[serde(rename = "embedding-host", default)]
    pub embedding_host: Option<String>,

    /// Embedding model name
    #[serde(rename = "embed-model", default = "default_embed_model")]
    pub embed_model: String,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            embedding_host: None,
            embed_model: default_embed_model(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the Markdown records are written to
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_max_workers() -> usize {
    5
}

fn default_max_depth() -> i32 {
    1
}

fn default_topic_threshold() -> f32 {
    0.5
}

fn default_link_threshold() -> f32 {
    0.6
}

fn default_user_agent() -> String {
    format!("inkcrawl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_embed_model() -> String {
    "mxbai-embed-large".to_string()
}

fn default_output_dir() -> String {
    "scraped_content".to_string()
}
