//! Crawl engine: frontier, dispatch loop and link policy

mod crawler;
mod frontier;
mod links;

pub use crawler::{CrawlEngine, CrawlSummary};
pub use frontier::{Frontier, WorkItem, ORIGIN_INITIAL};
pub use links::{filter_links, ADVANCED_MODE_FLOOR};
