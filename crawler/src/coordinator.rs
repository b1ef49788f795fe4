//! Crawl coordinator.
//!
//! The coordinator is the only owner of the frontier and the discovery log.
//! Each BFS level is fetched by up to `workers` concurrent requests, and the
//! results are merged back in frontier order. Discovery order therefore depends
//! only on what the fetcher returns, never on which request finishes first.
//! Fetched pages go to the index writer over a bounded channel.

use crate::fetch::Fetcher;
use crate::frontier::{Entry, Frontier};
use crate::html::Page;
use crate::log::DiscoveryLog;
use crate::{CrawlError, FetchError, Location};
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Hops from the seed whose links are still followed; the seed is depth 0.
    pub max_depth: usize,
    /// Concurrent fetches per level.
    pub workers: usize,
    /// Expiry counts as a failed fetch.
    pub fetch_timeout: Duration,
    /// Only follow links on the seed's host.
    pub same_host_only: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self { max_depth: 1, workers: 8, fetch_timeout: Duration::from_secs(12), same_host_only: false }
    }
}

/// A successfully fetched location, in discovery order.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub location: Location,
    pub depth: usize,
    pub page: Page,
}

pub struct Crawler<F> {
    fetcher: F,
    config: CrawlConfig,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F, config: CrawlConfig) -> Self { Self { fetcher, config } }

    pub fn config(&self) -> &CrawlConfig { &self.config }

    /// Breadth-first crawl from `seed`. Every successfully fetched page is sent
    /// to `pages`; the discovered locations are returned in discovery order.
    pub async fn crawl(
        &self,
        seed: Location,
        pages: mpsc::Sender<Fetched>,
        mut log: Option<&mut DiscoveryLog>,
    ) -> Result<Vec<Entry<Location>>, CrawlError> {
        let seed_host = seed.host().map(str::to_string);
        if let Some(log) = log.as_deref_mut() {
            log.record(&seed.to_string(), 0)?;
        }
        let mut frontier = Frontier::new(seed, Some(self.config.max_depth));
        let (mut fetched, mut failed) = (0usize, 0usize);

        loop {
            let level = frontier.next_level();
            let Some(depth) = level.first().map(|e| e.depth) else { break };
            tracing::info!(depth, size = level.len(), "crawling level");

            let results = self.fetch_level(level);
            futures::pin_mut!(results);
            while let Some((entry, result)) = results.next().await {
                let page = match result {
                    Ok(page) => page,
                    Err(err) => {
                        failed += 1;
                        tracing::warn!(location = %entry.location, %err, "skipping location");
                        continue;
                    }
                };
                if frontier.expands(entry.depth) {
                    for link in &page.links {
                        let Some(next) = Location::parse_url(link) else { continue };
                        if self.config.same_host_only && next.host() != seed_host.as_deref() {
                            continue;
                        }
                        if frontier.discover(next.clone(), entry.depth + 1) {
                            if let Some(log) = log.as_deref_mut() {
                                log.record(&next.to_string(), entry.depth + 1)?;
                            }
                        }
                    }
                }
                fetched += 1;
                pages
                    .send(Fetched { location: entry.location, depth: entry.depth, page })
                    .await
                    .map_err(|_| CrawlError::SinkClosed)?;
            }
        }

        let discovered = frontier.into_discovered();
        tracing::info!(discovered = discovered.len(), fetched, failed, "crawl finished");
        Ok(discovered)
    }

    /// Fetch a fixed list of locations (no link following), sending pages in list order.
    pub async fn fetch_all(&self, locations: Vec<Location>, pages: mpsc::Sender<Fetched>) -> Result<usize, CrawlError> {
        let entries: Vec<Entry<Location>> = locations.into_iter().map(|location| Entry { location, depth: 0 }).collect();
        let mut fetched = 0usize;
        let results = self.fetch_level(entries);
        futures::pin_mut!(results);
        while let Some((entry, result)) = results.next().await {
            match result {
                Ok(page) => {
                    fetched += 1;
                    pages
                        .send(Fetched { location: entry.location, depth: 0, page })
                        .await
                        .map_err(|_| CrawlError::SinkClosed)?;
                }
                Err(err) => tracing::warn!(location = %entry.location, %err, "skipping location"),
            }
        }
        Ok(fetched)
    }

    fn fetch_level(
        &self,
        level: Vec<Entry<Location>>,
    ) -> impl Stream<Item = (Entry<Location>, Result<Page, FetchError>)> + '_ {
        stream::iter(level)
            .map(move |entry| async move {
                let result = self.fetch_one(&entry.location).await;
                (entry, result)
            })
            .buffered(self.config.workers.max(1))
    }

    async fn fetch_one(&self, location: &Location) -> Result<Page, FetchError> {
        let after = self.config.fetch_timeout;
        match tokio::time::timeout(after, self.fetcher.fetch(location)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout { location: location.to_string(), after }),
        }
    }
}
