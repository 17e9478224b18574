//! HTTP client for an Ollama-style embedding backend

use crate::semantic::Embedding;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout for individual embedding requests
const EMBED_TIMEOUT_SECS: u64 = 30;

/// Timeout for the availability probe
const PROBE_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Embedding,
}

/// Client for `POST {host}/api/embeddings`
pub struct EmbeddingClient {
    client: reqwest::Client,
    endpoint: String,
    probe_endpoint: String,
    model: String,
}

impl EmbeddingClient {
    pub fn new(host: &str, model: &str) -> Self {
        let host = host.trim_end_matches('/');
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/embeddings", host),
            probe_endpoint: format!("{}/api/tags", host),
            model: model.to_string(),
        }
    }

    /// Checks whether the backend answers at all
    pub async fn probe(&self) -> bool {
        let result = self
            .client
            .get(&self.probe_endpoint)
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Embedding probe failed: {}", e);
                false
            }
        }
    }

    /// Embeds one piece of text
    pub async fn embed(&self, text: &str) -> Result<Embedding, reqwest::Error> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(Duration::from_secs(EMBED_TIMEOUT_SECS))
            .json(&EmbedRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: EmbedResponse = response.json().await?;
        Ok(body.embedding)
    }
}

/// Cosine similarity of two vectors; 0 when either has no magnitude or the
/// dimensions disagree
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
