//! Topic and link relevance scoring
//!
//! When an embedding backend is configured and reachable, text is compared
//! by cosine similarity of embeddings. Without one the scorer reports
//! itself unavailable and produces no topic representation, so the engine
//! crawls with topic pruning disabled and link filtering in fast mode.
//!
//! Scoring never fails the crawl: a backend error on one comparison logs a
//! warning and falls through to a keyword-overlap heuristic for that
//! comparison.

mod embedding;

pub use embedding::{cosine_similarity, EmbeddingClient};

use crate::config::SemanticConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Dense vector representation of a piece of text
pub type Embedding = Vec<f32>;

/// Characters of document text considered for topic relevance
const TOPIC_TEXT_CHARS: usize = 2000;

/// Bounded size of the embedding cache
const CACHE_CAPACITY: usize = 1000;

/// Relevance scoring over text, topics and link anchors
///
/// All scores are in `[0, 1]`.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Whether embedding-backed scoring is usable
    fn is_available(&self) -> bool;

    /// Resolves a reusable representation of the topic, or None when the
    /// scorer cannot score against this topic at all
    async fn topic_representation(&self, topic: &str) -> Option<Embedding>;

    /// Scores how relevant a document's text is to the topic
    async fn score_topic_relevance(&self, text: &str, topic: &str) -> f32;

    /// Scores how relevant a link's anchor text is to the page excerpt it
    /// appeared on
    async fn score_link_relevance(&self, excerpt: &str, anchor: &str) -> f32;
}

/// Default scorer: embedding backend when configured, keyword overlap
/// otherwise
pub struct SemanticScorer {
    client: Option<EmbeddingClient>,
    cache: Mutex<EmbeddingCache>,
}

/// Insertion-ordered cache so eviction drops the oldest entry
struct EmbeddingCache {
    entries: HashMap<String, Embedding>,
    order: Vec<String>,
}

impl EmbeddingCache {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<Embedding> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: String, value: Embedding) {
        if self.entries.contains_key(&key) {
            return;
        }
        if self.entries.len() >= CACHE_CAPACITY {
            let oldest = self.order.remove(0);
            self.entries.remove(&oldest);
        }
        self.order.push(key.clone());
        self.entries.insert(key, value);
    }
}

impl SemanticScorer {
    /// Builds a scorer from configuration
    ///
    /// Availability is decided here, once: a configured host that does not
    /// answer a probe request leaves the scorer in keyword-fallback mode for
    /// the whole run.
    pub async fn new(config: &SemanticConfig) -> Self {
        let client = match &config.embedding_host {
            Some(host) => {
                let candidate = EmbeddingClient::new(host, &config.embed_model);
                if candidate.probe().await {
                    tracing::info!("Embedding backend available at {}", host);
                    Some(candidate)
                } else {
                    tracing::warn!(
                        "Embedding backend at {} unreachable, using keyword fallback",
                        host
                    );
                    None
                }
            }
            None => {
                tracing::info!("No embedding backend configured, using keyword fallback");
                None
            }
        };

        Self {
            client,
            cache: Mutex::new(EmbeddingCache::new()),
        }
    }

    /// Embeds text, consulting the cache first
    async fn embed(&self, text: &str) -> Option<Embedding> {
        let client = self.client.as_ref()?;

        if let Some(hit) = self.cache.lock().unwrap().get(text) {
            return Some(hit);
        }

        match client.embed(text).await {
            Ok(embedding) => {
                self.cache
                    .lock()
                    .unwrap()
                    .insert(text.to_string(), embedding.clone());
                Some(embedding)
            }
            Err(e) => {
                tracing::warn!("Embedding request failed: {}", e);
                None
            }
        }
    }

    async fn embedding_similarity(&self, a: &str, b: &str) -> Option<f32> {
        let ea = self.embed(a).await?;
        let eb = self.embed(b).await?;
        Some(cosine_similarity(&ea, &eb).clamp(0.0, 1.0))
    }
}

#[async_trait]
impl Scorer for SemanticScorer {
    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    async fn topic_representation(&self, topic: &str) -> Option<Embedding> {
        let topic = topic.trim();
        if topic.is_empty() || self.client.is_none() {
            return None;
        }
        self.embed(topic).await
    }

    async fn score_topic_relevance(&self, text: &str, topic: &str) -> f32 {
        let excerpt = truncate_chars(text, TOPIC_TEXT_CHARS);
        if let Some(score) = self.embedding_similarity(excerpt, topic).await {
            return score;
        }
        keyword_topic_score(excerpt, topic)
    }

    async fn score_link_relevance(&self, excerpt: &str, anchor: &str) -> f32 {
        if let Some(score) = self.embedding_similarity(excerpt, anchor).await {
            return score;
        }
        keyword_link_score(excerpt, anchor)
    }
}

/// Fraction of topic keywords present in the text
fn keyword_topic_score(text: &str, topic: &str) -> f32 {
    let text = text.to_lowercase();
    let keywords: Vec<String> = topic
        .to_lowercase()
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();

    if keywords.is_empty() {
        return 0.0;
    }

    let matches = keywords.iter().filter(|k| text.contains(k.as_str())).count();
    matches as f32 / keywords.len() as f32
}

/// Coarse anchor relevance: high when the anchor text appears in the
/// excerpt, low otherwise
fn keyword_link_score(excerpt: &str, anchor: &str) -> f32 {
    let anchor = anchor.trim().to_lowercase();
    if !anchor.is_empty() && excerpt.to_lowercase().contains(&anchor) {
        0.7
    } else {
        0.3
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SemanticConfig;

    fn offline_config() -> SemanticConfig {
        SemanticConfig {
            embedding_host: None,
            embed_model: "mxbai-embed-large".to_string(),
        }
    }

    #[test]
    fn test_keyword_topic_score_fraction() {
        let text = "rust async runtimes compared in depth";
        assert_eq!(keyword_topic_score(text, "rust async"), 1.0);
        assert_eq!(keyword_topic_score(text, "rust python"), 0.5);
        assert_eq!(keyword_topic_score(text, "haskell"), 0.0);
    }

    #[test]
    fn test_keyword_topic_score_case_insensitive() {
        assert_eq!(keyword_topic_score("All About RUST", "rust"), 1.0);
    }

    #[test]
    fn test_keyword_topic_score_empty_topic() {
        assert_eq!(keyword_topic_score("anything", "   "), 0.0);
    }

    #[test]
    fn test_keyword_link_score() {
        let excerpt = "a guide to garden tools and watering cans";
        assert_eq!(keyword_link_score(excerpt, "garden tools"), 0.7);
        assert_eq!(keyword_link_score(excerpt, "stock tips"), 0.3);
    }

    #[tokio::test]
    async fn test_offline_scorer_not_available() {
        let scorer = SemanticScorer::new(&offline_config()).await;
        assert!(!scorer.is_available());
    }

    #[tokio::test]
    async fn test_offline_topic_representation_absent() {
        // Without a backend there is no topic representation, so callers
        // must treat topic pruning as disabled
        let scorer = SemanticScorer::new(&offline_config()).await;
        assert!(scorer.topic_representation("rust crates").await.is_none());
        assert!(scorer.topic_representation("  ").await.is_none());
    }

    #[tokio::test]
    async fn test_offline_scoring_uses_keywords() {
        let scorer = SemanticScorer::new(&offline_config()).await;
        let score = scorer
            .score_topic_relevance("an essay on rust memory safety", "rust safety")
            .await;
        assert!((score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cache_evicts_oldest() {
        let mut cache = EmbeddingCache::new();
        for i in 0..CACHE_CAPACITY + 1 {
            cache.insert(format!("key{}", i), vec![i as f32]);
        }
        assert!(cache.get("key0").is_none());
        assert!(cache.get("key1").is_some());
        assert_eq!(cache.entries.len(), CACHE_CAPACITY);
    }
}
