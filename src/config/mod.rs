//! Configuration module for Inkcrawl
//!
//! This module holds the crawl engine's configuration plus the settings of
//! its collaborators (fetcher, scorer, sink), with optional loading from a
//! TOML file.
//!
//! # Example
//!
//! ```no_run
//! use inkcrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("inkcrawl.toml")).unwrap();
//! println!("Crawling with {} workers", config.crawler.max_workers);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{Config, CrawlConfig, FetchConfig, OutputConfig, SemanticConfig};
pub use validation::{validate, validate_crawl_config};
