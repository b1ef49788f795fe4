use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure to fetch or parse a single location. Never fatal to a crawl.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {location} failed: {source}")]
    Request { location: String, source: reqwest::Error },

    #[error("{location} answered with status {status}")]
    Status { location: String, status: u16 },

    #[error("{location} is not HTML ({content_type})")]
    NotHtml { location: String, content_type: String },

    #[error("{location} exceeds {limit} bytes")]
    TooLarge { location: String, limit: usize },

    #[error("fetching {location} timed out after {after:?}")]
    Timeout { location: String, after: Duration },

    #[error("robots.txt disallows {location}")]
    RobotsDenied { location: String },

    #[error("{location} is not a fetchable location")]
    Unsupported { location: String },

    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed {seed:?}: {reason}")]
    InvalidSeed { seed: String, reason: String },

    #[error("document sink closed before the crawl finished")]
    SinkClosed,

    #[error("discovery log: {0}")]
    Log(#[from] std::io::Error),
}
