//! Inkcrawl command-line interface

use clap::Parser;
use inkcrawl::config::{load_config, validate, Config};
use inkcrawl::{ContentFetcher, CrawlEngine, MarkdownSink, Scorer, SemanticScorer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "inkcrawl",
    version,
    about = "Topic-aware crawler for web pages and local documents"
)]
struct Cli {
    /// Initial sources: URLs or local file paths
    #[arg(required = true)]
    sources: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write Markdown records into
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Maximum link-hop depth (-1 for unlimited)
    #[arg(short, long)]
    depth: Option<i32>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Topic to score content against; pages below the topic threshold are
    /// stored but their links are not followed
    #[arg(short, long)]
    topic: Option<String>,

    /// Minimum topic relevance for following a page's links
    #[arg(long)]
    topic_threshold: Option<f32>,

    /// Link acceptance threshold; above 0.8 anchors are scored individually
    #[arg(long)]
    link_threshold: Option<f32>,

    /// Embedding service host, e.g. http://localhost:11434
    #[arg(long)]
    embedding_host: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("inkcrawl=info,warn"),
            1 => EnvFilter::new("inkcrawl=debug,info"),
            2 => EnvFilter::new("inkcrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges CLI flags over the file-or-default configuration
fn resolve_config(cli: &Cli) -> inkcrawl::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    if let Some(output_dir) = &cli.output_dir {
        config.output.output_dir = output_dir.clone();
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(workers) = cli.workers {
        config.crawler.max_workers = workers;
    }
    if let Some(topic) = &cli.topic {
        config.crawler.topic = Some(topic.clone());
    }
    if let Some(threshold) = cli.topic_threshold {
        config.crawler.topic_threshold = threshold;
    }
    if let Some(threshold) = cli.link_threshold {
        config.crawler.link_threshold = threshold;
    }
    if let Some(host) = &cli.embedding_host {
        config.semantic.embedding_host = Some(host.clone());
    }

    validate(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> inkcrawl::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    let fetcher = Arc::new(ContentFetcher::new(&config.fetch)?);
    let scorer: Arc<dyn Scorer> = Arc::new(SemanticScorer::new(&config.semantic).await);
    let sink = Arc::new(MarkdownSink::new(&config.output.output_dir)?);

    let engine = CrawlEngine::new(config.crawler, fetcher, Some(scorer), sink)?;
    let summary = engine.run(&cli.sources).await;

    println!(
        "Processed {} sources, discovered {} links in {:.1}s",
        summary.sources_processed,
        summary.links_discovered,
        summary.elapsed.as_secs_f64()
    );

    Ok(())
}
