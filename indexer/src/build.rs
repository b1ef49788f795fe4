use anyhow::{Context, Result};
use sift_core::persist::{save_index, IndexPaths};
use sift_core::{IndexError, IndexWriter, NewDocument, Normalizer, SearchIndex};
use sift_crawler::{
    scan_documents, CrawlConfig, CrawlError, Crawler, DiscoveryLog, Fetched, Fetcher, FileFetcher, Location,
    DISCOVERY_LOG_FILE,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DOCUMENT_EXTENSIONS: &[&str] = &["html", "htm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// An index was already present; nothing was fetched or written.
    Existing,
    Built { num_docs: u32, discovered: usize },
}

/// Builds an index directory once. Every entry point is a no-op when the
/// directory already holds a complete index.
pub struct IndexBuilder {
    paths: IndexPaths,
    normalizer: Arc<dyn Normalizer>,
}

impl IndexBuilder {
    pub fn new(index_dir: impl AsRef<Path>, normalizer: Arc<dyn Normalizer>) -> Self {
        Self { paths: IndexPaths::new(index_dir), normalizer }
    }

    pub fn index_dir(&self) -> &Path { &self.paths.root }

    /// Index every HTML file below `docs_dir`.
    pub async fn files(&self, docs_dir: &Path, workers: usize) -> Result<BuildOutcome> {
        if self.skip_existing() {
            return Ok(BuildOutcome::Existing);
        }
        let files: Vec<PathBuf> = scan_documents(docs_dir, DOCUMENT_EXTENSIONS)
            .with_context(|| format!("scan {}", docs_dir.display()))?;
        tracing::info!(docs_dir = %docs_dir.display(), files = files.len(), "indexing document folder");
        let discovered = files.len();

        let (tx, rx) = mpsc::channel(workers.max(1) * 2);
        let writer = spawn_writer(self.normalizer.clone(), rx);
        let crawler = Crawler::new(FileFetcher, CrawlConfig { workers, ..CrawlConfig::default() });
        let sent = crawler.fetch_all(files.into_iter().map(Location::from_path).collect(), tx).await;
        let index = writer.await.context("index writer panicked")??;
        sent?;
        self.persist(index, discovered)
    }

    /// Crawl from `seed` and index every page that could be fetched. The
    /// discovery log is recreated inside the index directory.
    pub async fn crawl<F: Fetcher>(&self, crawler: &Crawler<F>, seed: &str) -> Result<BuildOutcome> {
        if self.skip_existing() {
            return Ok(BuildOutcome::Existing);
        }
        let seed = Location::parse_url(seed)
            .ok_or_else(|| CrawlError::InvalidSeed { seed: seed.to_string(), reason: "not an absolute http(s) URL".into() })?;
        tracing::info!(%seed, max_depth = crawler.config().max_depth, "crawling");

        let mut log = DiscoveryLog::create(self.paths.root.join(DISCOVERY_LOG_FILE))?;
        let (tx, rx) = mpsc::channel(crawler.config().workers.max(1) * 2);
        let writer = spawn_writer(self.normalizer.clone(), rx);
        let crawled = crawler.crawl(seed, tx, Some(&mut log)).await;
        let index = writer.await.context("index writer panicked")??;
        let discovered = crawled?;
        tracing::info!(log = %log.path().display(), discovered = discovered.len(), "discovery log written");
        log.finish()?;
        self.persist(index, discovered.len())
    }

    fn skip_existing(&self) -> bool {
        let exists = self.paths.exists();
        if exists {
            tracing::info!(index = %self.paths.root.display(), "index exists, skipping build");
        }
        exists
    }

    fn persist(&self, index: SearchIndex, discovered: usize) -> Result<BuildOutcome> {
        save_index(&self.paths, &index)?;
        Ok(BuildOutcome::Built { num_docs: index.num_docs(), discovered })
    }
}

/// The single owner of index mutation: consumes fetched pages in arrival order.
fn spawn_writer(normalizer: Arc<dyn Normalizer>, mut rx: mpsc::Receiver<Fetched>) -> JoinHandle<Result<SearchIndex, IndexError>> {
    tokio::spawn(async move {
        let mut writer = IndexWriter::new(normalizer);
        while let Some(Fetched { location, page, .. }) = rx.recv().await {
            let location = location.to_string();
            writer.add(NewDocument {
                location: &location,
                title: &page.title,
                summary: &page.summary,
                date: page.date.as_deref(),
                body: &page.body,
            })?;
        }
        Ok(writer.finish())
    })
}
