//! HTML parsing: title, visible text, and outbound links
//!
//! # Link Extraction Rules
//!
//! **Include:** `<a href="...">` tags with their anchor text, resolved
//! against the base URL, fragments stripped.
//!
//! **Exclude:** empty hrefs, fragment-only links, `javascript:`, `mailto:`,
//! `tel:` and `data:` schemes, and anything that is not http/https after
//! resolution.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{Html, Selector};
use url::Url;

/// One candidate outbound link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Absolute URL, fragment stripped
    pub url: String,

    /// Anchor text with whitespace collapsed; may be empty
    pub anchor: String,
}

/// Elements whose text content is boilerplate, not page content
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "aside", "head"];

/// Extracts the page title and the visible text content in one parse
///
/// The title comes from `<title>`, falling back to the first `<h1>`. Text
/// collection skips script, style, nav, footer and aside subtrees and
/// collapses all whitespace runs to single spaces.
pub fn extract_title_and_text(html: &str) -> (Option<String>, String) {
    let document = Html::parse_document(html);

    let title = extract_title(&document);

    let mut raw = String::new();
    collect_text(document.tree.root(), &mut raw);
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    (title, text)
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;
    let from_title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty());

    if from_title.is_some() {
        return from_title;
    }

    let h1_selector = Selector::parse("h1").ok()?;
    document
        .select(&h1_selector)
        .next()
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
}

fn collect_text(node: NodeRef<Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Element(el) => {
                if !SKIPPED_ELEMENTS.contains(&el.name()) {
                    collect_text(child, out);
                }
            }
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            _ => {}
        }
    }
}

/// Extracts candidate outbound links from raw HTML
///
/// # Arguments
///
/// * `html` - The raw HTML content
/// * `base_url` - The page's own URL, for resolving relative hrefs
pub fn extract_links(html: &str, base_url: &str) -> Vec<DiscoveredLink> {
    let base = match Url::parse(base_url) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Cannot resolve links against '{}': {}", base_url, e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(h) => h.trim(),
            None => continue,
        };

        if let Some(url) = resolve_link(href, &base) {
            let anchor = element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            links.push(DiscoveredLink { url, anchor });
        }
    }

    tracing::debug!("Extracted {} links from {}", links.len(), base_url);
    links
}

/// Resolves an href to an absolute http(s) URL, or None if excluded
fn resolve_link(href: &str, base: &Url) -> Option<String> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base.join(href) {
        Ok(mut absolute) => {
            if absolute.scheme() != "http" && absolute.scheme() != "https" {
                return None;
            }
            absolute.set_fragment(None);
            Some(absolute.to_string())
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/page";

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>Test Page</title></head><body></body></html>"#;
        let (title, _) = extract_title_and_text(html);
        assert_eq!(title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let html = r#"<html><body><h1>Heading  Title</h1><p>body</p></body></html>"#;
        let (title, _) = extract_title_and_text(html);
        assert_eq!(title, Some("Heading Title".to_string()));
    }

    #[test]
    fn test_no_title() {
        let html = r#"<html><body><p>just text</p></body></html>"#;
        let (title, _) = extract_title_and_text(html);
        assert_eq!(title, None);
    }

    #[test]
    fn test_text_skips_boilerplate() {
        let html = r#"<html><head><style>.x{}</style></head><body>
            <script>var x = 1;</script>
            <nav>Menu Items</nav>
            <p>Real   content
            here</p>
            <footer>Copyright</footer>
        </body></html>"#;
        let (_, text) = extract_title_and_text(html);
        assert_eq!(text, "Real content here");
    }

    #[test]
    fn test_extract_absolute_link_with_anchor() {
        let html = r#"<html><body><a href="https://other.com/page">Other  Site</a></body></html>"#;
        let links = extract_links(html, BASE);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://other.com/page");
        assert_eq!(links[0].anchor, "Other Site");
    }

    #[test]
    fn test_extract_relative_link() {
        let html = r#"<html><body><a href="/other">Link</a></body></html>"#;
        let links = extract_links(html, BASE);
        assert_eq!(links[0].url, "https://example.com/other");
    }

    #[test]
    fn test_empty_anchor_preserved() {
        let html = r#"<html><body><a href="/icon"><img src="x.png"></a></body></html>"#;
        let links = extract_links(html, BASE);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].anchor, "");
    }

    #[test]
    fn test_fragment_stripped_from_links() {
        let html = r#"<html><body><a href="/doc#section">Doc</a></body></html>"#;
        let links = extract_links(html, BASE);
        assert_eq!(links[0].url, "https://example.com/doc");
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r##"<html><body>
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:a@b.c">Mail</a>
            <a href="tel:+123">Call</a>
            <a href="data:text/html,x">Data</a>
            <a href="#section">Jump</a>
            <a href="">Empty</a>
            <a href="/keep">Keep</a>
        </body></html>"##;
        let links = extract_links(html, BASE);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/keep");
    }

    #[test]
    fn test_invalid_base_yields_nothing() {
        let html = r#"<html><body><a href="/x">X</a></body></html>"#;
        assert!(extract_links(html, "not a url").is_empty());
    }
}
