//! Document discovery: a depth-bounded, de-duplicating BFS over hyperlinks or
//! a directory tree, with pluggable fetchers.

pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod frontier;
pub mod html;
pub mod location;
pub mod log;
pub mod robots;

pub use coordinator::{CrawlConfig, Crawler, Fetched};
pub use error::{CrawlError, FetchError};
pub use fetch::{FileFetcher, Fetcher, HttpFetcher, HttpOptions};
pub use frontier::{scan_documents, walk, Entry, Frontier};
pub use html::Page;
pub use location::Location;
pub use log::{DiscoveryLog, DISCOVERY_LOG_FILE};
