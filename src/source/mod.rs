//! Source identity handling
//!
//! A source is one crawlable unit: either a web URL or a local file path.
//! This module turns raw source strings into canonical identities so the
//! frontier can deduplicate them, and provides small helpers shared by the
//! fetcher and the sink.

mod normalize;

pub use normalize::normalize_url;

use crate::SourceError;
use std::path::Path;

/// The two kinds of crawlable sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Web,
    File,
}

impl SourceKind {
    /// Classifies a source string by scheme
    pub fn of(source: &str) -> SourceKind {
        if is_web_source(source) {
            SourceKind::Web
        } else {
            SourceKind::File
        }
    }
}

/// A normalized source identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    identity: String,
    kind: SourceKind,
}

impl Source {
    pub fn as_str(&self) -> &str {
        &self.identity
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }
}

/// Returns true if the source string is a web URL
pub fn is_web_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Normalizes a raw source string into its canonical identity
///
/// Web sources go through URL normalization (see [`normalize_url`]); file
/// sources resolve to an absolute path without touching the filesystem, so
/// a path to a not-yet-existing file still gets a stable identity.
pub fn normalize_source(raw: &str) -> Result<Source, SourceError> {
    if is_web_source(raw) {
        let url = normalize_url(raw)?;
        Ok(Source {
            identity: url.into(),
            kind: SourceKind::Web,
        })
    } else {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SourceError::Path("empty source".to_string()));
        }
        let absolute = std::path::absolute(Path::new(trimmed))
            .map_err(|e| SourceError::Path(format!("{}: {}", trimmed, e)))?;
        Ok(Source {
            identity: absolute.to_string_lossy().into_owned(),
            kind: SourceKind::File,
        })
    }
}

/// Returns the last path segment of a source, used for title fallbacks and
/// "found via" metadata
pub fn source_basename(source: &str) -> String {
    if is_web_source(source) {
        source
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty() && !s.starts_with("http"))
            .unwrap_or(source)
            .to_string()
    } else {
        Path::new(source)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sources() {
        assert_eq!(SourceKind::of("https://example.com/"), SourceKind::Web);
        assert_eq!(SourceKind::of("http://example.com/"), SourceKind::Web);
        assert_eq!(SourceKind::of("/tmp/notes.md"), SourceKind::File);
        assert_eq!(SourceKind::of("notes.md"), SourceKind::File);
    }

    #[test]
    fn test_normalize_web_source() {
        let source = normalize_source("https://Example.com/page#intro").unwrap();
        assert_eq!(source.kind(), SourceKind::Web);
        assert_eq!(source.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_normalize_file_source_is_absolute() {
        let source = normalize_source("/var/data/report.txt").unwrap();
        assert_eq!(source.kind(), SourceKind::File);
        assert_eq!(source.as_str(), "/var/data/report.txt");

        let relative = normalize_source("data/report.txt").unwrap();
        assert!(Path::new(relative.as_str()).is_absolute());
        assert!(relative.as_str().ends_with("data/report.txt"));
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(normalize_source("   ").is_err());
    }

    #[test]
    fn test_same_identity_after_normalization() {
        let a = normalize_source("https://example.com/docs/").unwrap();
        let b = normalize_source("https://EXAMPLE.com/docs#top").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_source_basename() {
        assert_eq!(source_basename("https://example.com/a/b/page"), "page");
        assert_eq!(source_basename("/tmp/dir/report.txt"), "report.txt");
        assert_eq!(source_basename("https://example.com/"), "example.com");
    }
}
