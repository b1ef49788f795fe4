use crate::html::{extract, Page};
use crate::robots::RobotsCache;
use crate::{FetchError, Location};
use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;

/// Turns a location into extracted page fields and outbound links.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, location: &Location) -> Result<Page, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_page_bytes: usize,
    pub respect_robots: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: "sift-bot/0.1 (+https://example.com/bot)".to_string(),
            timeout: Duration::from_secs(12),
            max_page_bytes: 2 * 1024 * 1024,
            respect_robots: true,
        }
    }
}

pub struct HttpFetcher {
    client: Client,
    options: HttpOptions,
    robots: RobotsCache,
}

impl HttpFetcher {
    pub fn new(options: HttpOptions) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(options.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(options.timeout)
            .build()?;
        let robots = RobotsCache::new(&options.user_agent);
        Ok(Self { client, options, robots })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, location: &Location) -> Result<Page, FetchError> {
        let Some(url) = location.as_url() else {
            return Err(FetchError::Unsupported { location: location.to_string() });
        };
        let loc = || location.to_string();
        if self.options.respect_robots && !self.robots.allowed(&self.client, url).await {
            return Err(FetchError::RobotsDenied { location: loc() });
        }

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request { location: loc(), source })?;
        if !resp.status().is_success() {
            return Err(FetchError::Status { location: loc(), status: resp.status().as_u16() });
        }
        if let Some(ct) = resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            if !ct.starts_with("text/html") {
                return Err(FetchError::NotHtml { location: loc(), content_type: ct.to_string() });
            }
        }
        let limit = self.options.max_page_bytes;
        if resp.content_length().is_some_and(|len| len as usize > limit) {
            return Err(FetchError::TooLarge { location: loc(), limit });
        }
        // Redirects may have moved us; links resolve against the final URL.
        let final_url = resp.url().clone();
        let bytes = resp.bytes().await.map_err(|source| FetchError::Request { location: loc(), source })?;
        if bytes.len() > limit {
            return Err(FetchError::TooLarge { location: loc(), limit });
        }
        let html = String::from_utf8_lossy(&bytes);
        Ok(extract(&html, Some(&final_url)))
    }
}

/// Reads HTML files from disk. Used by the directory mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, location: &Location) -> Result<Page, FetchError> {
        let Location::Path(path) = location else {
            return Err(FetchError::Unsupported { location: location.to_string() });
        };
        let bytes = tokio::fs::read(path).await.map_err(|source| FetchError::Io { path: path.clone(), source })?;
        Ok(extract(&String::from_utf8_lossy(&bytes), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_fetcher_reads_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.html");
        std::fs::write(&path, "<html><head><title>Doc A</title></head><body>alpha beta</body></html>").unwrap();
        let page = FileFetcher.fetch(&Location::from_path(&path)).await.unwrap();
        assert_eq!(page.title, "Doc A");
        assert_eq!(page.body, "alpha beta");
    }

    #[tokio::test]
    async fn file_fetcher_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileFetcher.fetch(&Location::from_path(dir.path().join("none.html"))).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[tokio::test]
    async fn file_fetcher_rejects_urls() {
        let loc = Location::parse_url("https://example.com/").unwrap();
        assert!(matches!(FileFetcher.fetch(&loc).await, Err(FetchError::Unsupported { .. })));
    }
}
