//! The crawl engine: dispatch loop and per-source pipeline
//!
//! `run` drains the frontier in batches sized `min(2 * max_workers,
//! queue_len)` and spawns one task per item, with a semaphore bounding how
//! many run at once. Batches are also the growth boundary: links found
//! while a batch is in flight are enqueued immediately but only dispatched
//! once the whole batch has been awaited, which keeps queue growth
//! observable between rounds.

use crate::config::{validate_crawl_config, CrawlConfig};
use crate::engine::{filter_links, Frontier, WorkItem, ORIGIN_INITIAL};
use crate::fetch::{extract_links, fallback_title, FetchOutcome, Fetcher};
use crate::semantic::{Embedding, Scorer};
use crate::sink::{ContentRecord, Sink};
use crate::source::{source_basename, SourceKind};
use crate::ConfigResult;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Characters of origin identity carried into metadata
const ORIGIN_NOTE_CHARS: usize = 50;

/// What a finished crawl did
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Sources fetched and stored (skips excluded)
    pub sources_processed: usize,

    /// Links accepted into the frontier from processed pages
    pub links_discovered: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Orchestrates fetching, scoring, storing and frontier growth
///
/// Each `run` owns a fresh frontier and visited set; only the sink's
/// processed ledger carries over between runs.
pub struct CrawlEngine {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    scorer: Option<Arc<dyn Scorer>>,
    sink: Arc<dyn Sink>,
}

impl CrawlEngine {
    /// Builds an engine, rejecting configurations that cannot run
    ///
    /// A zero worker count is the one construction-time failure: it would
    /// deadlock the dispatch loop, so it is refused here rather than
    /// tolerated.
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        scorer: Option<Arc<dyn Scorer>>,
        sink: Arc<dyn Sink>,
    ) -> ConfigResult<Self> {
        validate_crawl_config(&config)?;
        Ok(Self {
            config,
            fetcher,
            scorer,
            sink,
        })
    }

    /// Crawls from the given initial sources until the frontier is empty
    pub async fn run(&self, initial: &[String]) -> CrawlSummary {
        let started = Instant::now();

        let frontier = Arc::new(Frontier::new());
        let added = frontier.enqueue(initial, 0, ORIGIN_INITIAL);
        tracing::info!(
            "Starting crawl: {} initial sources, max_depth={}, max_workers={}",
            added,
            self.config.max_depth,
            self.config.max_workers
        );

        let topic_embedding = self.resolve_topic().await;

        let semaphore = Arc::new(Semaphore::new(self.config.max_workers));
        let mut sources_processed = 0;
        let mut links_discovered = 0;
        let mut round = 0u64;

        while !frontier.is_empty() {
            let batch_size = (2 * self.config.max_workers).min(frontier.len());
            let batch = frontier.drain_batch(batch_size);
            round += 1;
            tracing::debug!("Dispatching round {}: {} items", round, batch.len());

            let mut handles = Vec::with_capacity(batch.len());
            for item in batch {
                let worker = Worker {
                    config: self.config.clone(),
                    fetcher: Arc::clone(&self.fetcher),
                    scorer: self.scorer.clone(),
                    sink: Arc::clone(&self.sink),
                    frontier: Arc::clone(&frontier),
                    topic_embedding: topic_embedding.clone(),
                };
                let semaphore = Arc::clone(&semaphore);
                handles.push(tokio::spawn(async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(p) => p,
                        Err(_) => return ItemResult::default(),
                    };
                    worker.process(item).await
                }));
            }

            for joined in futures::future::join_all(handles).await {
                match joined {
                    Ok(result) => {
                        if result.processed {
                            sources_processed += 1;
                        }
                        links_discovered += result.links_enqueued;
                    }
                    Err(e) => {
                        // A panicked worker loses its item but never the run
                        tracing::error!("Worker task panicked: {}", e);
                    }
                }
            }
        }

        let elapsed = started.elapsed();
        tracing::info!(
            "Crawl complete: {} sources processed, {} links discovered in {:.1}s",
            sources_processed,
            links_discovered,
            elapsed.as_secs_f64()
        );

        CrawlSummary {
            sources_processed,
            links_discovered,
            elapsed,
        }
    }

    /// Resolves the topic once per run; None disables topic pruning
    async fn resolve_topic(&self) -> Option<Embedding> {
        let topic = self.config.topic.as_deref()?;
        let scorer = self.scorer.as_ref()?;

        match scorer.topic_representation(topic).await {
            Some(embedding) => {
                tracing::info!(
                    "Topic pruning active: '{}' (threshold {:.2})",
                    topic,
                    self.config.topic_threshold
                );
                Some(embedding)
            }
            None => {
                tracing::warn!(
                    "Could not resolve topic '{}', crawling without topic pruning",
                    topic
                );
                None
            }
        }
    }
}

#[derive(Debug, Default)]
struct ItemResult {
    processed: bool,
    links_enqueued: usize,
}

/// Per-item state cloned into each spawned task
struct Worker {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    scorer: Option<Arc<dyn Scorer>>,
    sink: Arc<dyn Sink>,
    frontier: Arc<Frontier>,
    topic_embedding: Option<Embedding>,
}

impl Worker {
    /// Runs the full pipeline for one work item
    async fn process(&self, item: WorkItem) -> ItemResult {
        let source = item.source.as_str();

        if self.sink.is_processed(source) {
            tracing::debug!("Skipping already-stored source: {}", source);
            return ItemResult::default();
        }

        tracing::info!("Processing (depth {}): {}", item.depth, source);
        let outcome = self.fetcher.fetch(source).await;

        let topic_relevance = self.score_topic(&outcome).await;
        let metadata_summary = self.metadata_summary(&item, &outcome);
        let title = outcome
            .title
            .clone()
            .unwrap_or_else(|| fallback_title(source));

        let record = ContentRecord {
            source,
            title: Some(&title),
            metadata_summary: &metadata_summary,
            text: &outcome.text,
            topic_relevance,
        };
        if let Err(e) = self.sink.store(&record) {
            // Storage failure loses this record, not the crawl
            tracing::error!("Failed to store {}: {}", source, e);
        }

        let links_enqueued = self.discover_links(&item, &outcome, topic_relevance).await;

        ItemResult {
            processed: true,
            links_enqueued,
        }
    }

    /// Scores topic relevance when pruning is active and content exists
    async fn score_topic(&self, outcome: &FetchOutcome) -> Option<f32> {
        if outcome.is_failure() || outcome.text.is_empty() {
            return None;
        }
        let topic = self.config.topic.as_deref()?;
        self.topic_embedding.as_ref()?;
        let scorer = self.scorer.as_ref()?;
        Some(scorer.score_topic_relevance(&outcome.text, topic).await)
    }

    /// Builds the comma-joined metadata summary for one record
    fn metadata_summary(&self, item: &WorkItem, outcome: &FetchOutcome) -> String {
        let mut parts = vec![format!(
            "crawled {}",
            chrono::Local::now().format("%Y-%m-%d")
        )];

        match &outcome.error {
            Some(error) => parts.push(format!("Error: {}", error)),
            None => match item.source.kind() {
                SourceKind::Web => parts.push("HTML page".to_string()),
                SourceKind::File => {
                    let ext = std::path::Path::new(item.source.as_str())
                        .extension()
                        .map(|e| e.to_string_lossy().to_uppercase())
                        .unwrap_or_else(|| "TEXT".to_string());
                    parts.push(format!("{} document", ext));
                }
            },
        }

        if item.origin != ORIGIN_INITIAL {
            let via: String = source_basename(&item.origin)
                .chars()
                .take(ORIGIN_NOTE_CHARS)
                .collect();
            parts.push(format!("found via {}", via));
        }

        parts.join(", ")
    }

    /// Extracts, filters and enqueues outbound links when the page is
    /// eligible for traversal
    async fn discover_links(
        &self,
        item: &WorkItem,
        outcome: &FetchOutcome,
        topic_relevance: Option<f32>,
    ) -> usize {
        if outcome.is_failure() {
            return 0;
        }
        let raw_html = match (item.source.kind(), &outcome.raw_html) {
            (SourceKind::Web, Some(html)) => html,
            _ => return 0,
        };
        if !self.config.within_depth(item.depth) {
            tracing::debug!("Depth limit reached at {}, not following links", item.depth);
            return 0;
        }
        if let Some(score) = topic_relevance {
            if score < self.config.topic_threshold {
                tracing::info!(
                    "Pruning {}: topic relevance {:.3} below threshold {:.2}",
                    item.source.as_str(),
                    score,
                    self.config.topic_threshold
                );
                return 0;
            }
        }

        let links = extract_links(raw_html, item.source.as_str());
        if links.is_empty() {
            return 0;
        }

        let scorer = self.scorer.as_deref();
        let kept = filter_links(links, &outcome.text, self.config.link_threshold, scorer).await;
        self.frontier
            .enqueue(&kept, item.depth + 1, item.source.as_str())
    }
}
