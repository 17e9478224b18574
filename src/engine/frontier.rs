//! Frontier: the pending-work queue plus its deduplication guard
//!
//! The frontier owns two pieces of shared state: a FIFO queue of work items
//! and the set of every normalized source identity seen during the run. Both
//! live behind one mutex so that normalize/check/insert is a single atomic
//! step per source; concurrent enqueues from workers can never push the same
//! identity twice.

use crate::source::{normalize_source, Source};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// Origin sentinel for sources passed directly to `run`
pub const ORIGIN_INITIAL: &str = "initial";

/// One unit of pending crawl work
///
/// Immutable once enqueued.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Normalized source identity
    pub source: Source,

    /// Link-hop distance from the initial sources
    pub depth: u32,

    /// Identity of the source this one was discovered on, or
    /// [`ORIGIN_INITIAL`]
    pub origin: String,
}

#[derive(Debug, Default)]
struct FrontierInner {
    queue: VecDeque<WorkItem>,
    visited: HashSet<String>,
}

/// Thread-safe work queue with visited-set deduplication
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<FrontierInner>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues sources at the given depth, skipping any identity already
    /// seen this run
    ///
    /// Sources that fail normalization are dropped with a warning; they are
    /// never enqueued and never abort the caller.
    ///
    /// # Returns
    ///
    /// The number of sources actually added to the queue.
    pub fn enqueue(&self, sources: &[String], depth: u32, origin: &str) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let mut added = 0;

        for raw in sources {
            let source = match normalize_source(raw) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Skipping invalid source '{}': {}", raw, e);
                    continue;
                }
            };

            if inner.visited.insert(source.as_str().to_string()) {
                inner.queue.push_back(WorkItem {
                    source,
                    depth,
                    origin: origin.to_string(),
                });
                added += 1;
            }
        }

        if added > 0 {
            tracing::debug!(
                "Added {} sources at depth {}, queue size now {}",
                added,
                depth,
                inner.queue.len()
            );
        }

        added
    }

    /// Pops up to `max_count` items without blocking
    ///
    /// Returns fewer items if the queue holds fewer; an empty vector means
    /// the frontier is exhausted.
    pub fn drain_batch(&self, max_count: usize) -> Vec<WorkItem> {
        let mut inner = self.inner.lock().unwrap();
        let count = max_count.min(inner.queue.len());
        inner.queue.drain(..count).collect()
    }

    /// Returns the number of pending items
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn urls(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_enqueue_and_drain_fifo() {
        let frontier = Frontier::new();
        let added = frontier.enqueue(
            &urls(&["https://example.com/a", "https://example.com/b"]),
            0,
            ORIGIN_INITIAL,
        );
        assert_eq!(added, 2);

        let batch = frontier.drain_batch(10);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].source.as_str(), "https://example.com/a");
        assert_eq!(batch[1].source.as_str(), "https://example.com/b");
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_duplicate_identities_enqueued_once() {
        let frontier = Frontier::new();
        let added = frontier.enqueue(
            &urls(&[
                "https://example.com/page",
                "https://EXAMPLE.com/page#section",
                "https://example.com/page/",
            ]),
            0,
            ORIGIN_INITIAL,
        );
        assert_eq!(added, 1);
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_visited_blocks_re_enqueue_after_drain() {
        let frontier = Frontier::new();
        frontier.enqueue(&urls(&["https://example.com/a"]), 0, ORIGIN_INITIAL);
        let _ = frontier.drain_batch(1);

        // A cycle pointing back at a drained source must not re-enter
        let added = frontier.enqueue(&urls(&["https://example.com/a"]), 1, "https://example.com/b");
        assert_eq!(added, 0);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_invalid_sources_dropped() {
        let frontier = Frontier::new();
        // Blank strings fail normalization; anything that is not an
        // http(s) URL is taken as a file path and still enqueues
        let added = frontier.enqueue(
            &urls(&["ftp://example.com/a", "https://example.com/ok", "   "]),
            0,
            ORIGIN_INITIAL,
        );
        assert_eq!(added, 2);
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_drain_batch_respects_max() {
        let frontier = Frontier::new();
        let sources: Vec<String> = (0..10)
            .map(|i| format!("https://example.com/page{}", i))
            .collect();
        frontier.enqueue(&sources, 0, ORIGIN_INITIAL);

        let batch = frontier.drain_batch(4);
        assert_eq!(batch.len(), 4);
        assert_eq!(frontier.len(), 6);

        let rest = frontier.drain_batch(100);
        assert_eq!(rest.len(), 6);
    }

    #[test]
    fn test_concurrent_enqueue_dedupes() {
        let frontier = Arc::new(Frontier::new());
        let shared = urls(&["https://example.com/shared"]);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let frontier = Arc::clone(&frontier);
                let shared = shared.clone();
                std::thread::spawn(move || frontier.enqueue(&shared, 1, "https://example.com/"))
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 1);
        assert_eq!(frontier.len(), 1);
    }
}
