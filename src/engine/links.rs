//! Link filtering policy
//!
//! The filtering mode is chosen by the link threshold itself, not by a
//! separate flag: thresholds at or below [`ADVANCED_MODE_FLOOR`] take the
//! fast path that accepts every link without any scoring, while higher
//! thresholds enable per-anchor relevance scoring against the page's
//! leading content.

use crate::fetch::DiscoveredLink;
use crate::semantic::Scorer;

/// Link thresholds above this value switch filtering into advanced mode
pub const ADVANCED_MODE_FLOOR: f32 = 0.8;

/// Maximum number of characters of page content compared against anchors
const EXCERPT_CHARS: usize = 1000;

/// Filters discovered links according to the threshold-driven policy
///
/// Fast mode (threshold <= 0.8, or no scorer available): every link is
/// accepted unconditionally.
///
/// Advanced mode (threshold > 0.8 and the scorer reports itself available):
/// links with anchor text are kept only when the anchor scores at least
/// `link_threshold` against the page's leading excerpt; links without
/// anchor text carry no signal to filter on and are always kept.
pub async fn filter_links(
    links: Vec<DiscoveredLink>,
    page_text: &str,
    link_threshold: f32,
    scorer: Option<&dyn Scorer>,
) -> Vec<String> {
    let scorer = match scorer {
        Some(s) if link_threshold > ADVANCED_MODE_FLOOR && s.is_available() => s,
        _ => {
            tracing::debug!("Fast link mode: accepting {} links unscored", links.len());
            return links.into_iter().map(|l| l.url).collect();
        }
    };
    let excerpt = truncate_chars(page_text, EXCERPT_CHARS);
    tracing::debug!(
        "Advanced link mode (threshold {:.2}): scoring {} links",
        link_threshold,
        links.len()
    );

    let mut kept = Vec::new();
    for link in links {
        if link.anchor.is_empty() {
            kept.push(link.url);
            continue;
        }

        let score = scorer.score_link_relevance(excerpt, &link.anchor).await;
        if score >= link_threshold {
            kept.push(link.url);
        } else {
            tracing::trace!(
                "Dropping link {} (anchor relevance {:.4} < {:.2})",
                link.url,
                score,
                link_threshold
            );
        }
    }

    kept
}

/// Truncates a string to at most `max` characters on a char boundary
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::semantic::Embedding;

    /// Scorer double returning one fixed value for every comparison
    struct FixedScorer {
        score: f32,
        available: bool,
    }

    #[async_trait]
    impl Scorer for FixedScorer {
        fn is_available(&self) -> bool {
            self.available
        }

        async fn topic_representation(&self, _topic: &str) -> Option<Embedding> {
            self.available.then(Vec::new)
        }

        async fn score_topic_relevance(&self, _text: &str, _topic: &str) -> f32 {
            self.score
        }

        async fn score_link_relevance(&self, _excerpt: &str, _anchor: &str) -> f32 {
            self.score
        }
    }

    fn link(url: &str, anchor: &str) -> DiscoveredLink {
        DiscoveredLink {
            url: url.to_string(),
            anchor: anchor.to_string(),
        }
    }

    fn sample_links() -> Vec<DiscoveredLink> {
        vec![
            link("https://example.com/a", "deep dive on widgets"),
            link("https://example.com/b", ""),
            link("https://example.com/c", "unrelated footer"),
        ]
    }

    #[tokio::test]
    async fn test_fast_mode_ignores_scores() {
        let scorer = FixedScorer {
            score: 0.1,
            available: true,
        };
        let kept = filter_links(sample_links(), "page text", 0.6, Some(&scorer)).await;
        assert_eq!(kept.len(), 3);
    }

    #[tokio::test]
    async fn test_advanced_mode_drops_low_scoring_anchors() {
        let scorer = FixedScorer {
            score: 0.1,
            available: true,
        };
        let kept = filter_links(sample_links(), "page text", 0.9, Some(&scorer)).await;
        // Only the anchorless link survives
        assert_eq!(kept, vec!["https://example.com/b".to_string()]);
    }

    #[tokio::test]
    async fn test_advanced_mode_keeps_high_scoring_anchors() {
        let scorer = FixedScorer {
            score: 0.95,
            available: true,
        };
        let kept = filter_links(sample_links(), "page text", 0.9, Some(&scorer)).await;
        assert_eq!(kept.len(), 3);
    }

    #[tokio::test]
    async fn test_high_threshold_without_scorer_falls_back_to_fast() {
        let kept = filter_links(sample_links(), "page text", 0.95, None).await;
        assert_eq!(kept.len(), 3);

        let unavailable = FixedScorer {
            score: 0.0,
            available: false,
        };
        let kept = filter_links(sample_links(), "page text", 0.95, Some(&unavailable)).await;
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte chars must not be split
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
