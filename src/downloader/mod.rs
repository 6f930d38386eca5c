//! Retrieval of the sanctions export.
//!
//! The main entry point is [`RemoteFeed::fetch`], which reads the RSS feed, follows its
//! XML enclosure and returns the raw document bytes.

mod document_fetcher;
mod feed_resolver;

// Re-export public API
pub use document_fetcher::{build_client, fetch_bytes, RemoteFeed};
pub use feed_resolver::parse_enclosure_url;
