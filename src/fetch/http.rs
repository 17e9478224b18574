//! HTTP fetching for web sources
//!
//! Builds the shared HTTP client and turns one GET request into a
//! [`FetchOutcome`]: non-success statuses, non-HTML content types and
//! transport errors all come back as failed outcomes rather than crate
//! errors.

use crate::config::FetchConfig;
use crate::fetch::{parser, FetchOutcome};
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with the configured user agent and timeouts
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one web page and extracts its title and text
///
/// The raw body is kept on success so the engine can run link extraction
/// over it; failures carry the error message and no content.
pub async fn fetch_web(client: &Client, url: &str) -> FetchOutcome {
    tracing::debug!("Fetching URL: {}", url);

    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection error: {}", e)
            } else {
                format!("RequestError: {}", e)
            };
            tracing::warn!("Error fetching {}: {}", url, error);
            return FetchOutcome::failure(error, None);
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("HTTP {} fetching {}", status.as_u16(), url);
        return FetchOutcome::failure(format!("HTTP {}", status.as_u16()), None);
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    if !content_type.contains("html") {
        tracing::warn!("URL {} returned {}, not HTML", url, content_type);
        return FetchOutcome::failure(format!("Non-HTML content type: {}", content_type), None);
    }

    let body = match response.text().await {
        Ok(b) => b,
        Err(e) => {
            return FetchOutcome::failure(format!("Failed to read body: {}", e), None);
        }
    };

    // Parsing is synchronous; the parsed document never crosses an await
    let (title, text) = parser::extract_title_and_text(&body);

    tracing::info!(
        "Fetched {}: title={:?}, content_length={}",
        url,
        title,
        text.len()
    );

    FetchOutcome {
        text,
        title: title.or_else(|| Some(url.to_string())),
        raw_html: Some(body),
        error: None,
    }
}
