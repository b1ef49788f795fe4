use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sift_core::{Bm25Params, EnglishNormalizer, Field, FieldWeights, ModelKind, Normalizer, SearchConfig};
use sift_crawler::{CrawlConfig, Crawler, HttpFetcher, HttpOptions};
use sift_indexer::{render_json, render_text, BuildOutcome, IndexBuilder, Searcher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Index a document folder or a crawled site, then search it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the HTML files below a folder (once) and run a query
    Files {
        /// Folder holding the documents
        docs: PathBuf,
        /// Index folder; reused when it already holds an index
        index: PathBuf,
        /// Free-text query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Files read concurrently
        #[arg(long, default_value_t = 8)]
        workers: usize,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Crawl from a seed URL (once) and run a query
    Crawl {
        /// Seed URL
        seed: String,
        /// Link hops followed from the seed
        depth: usize,
        /// Index folder; reused when it already holds an index
        index: PathBuf,
        /// Free-text query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[command(flatten)]
        crawl: CrawlArgs,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Model {
    Bm25,
    Tfidf,
}

#[derive(Args)]
struct SearchArgs {
    /// Number of results to print
    #[arg(long, default_value_t = 10)]
    top_k: usize,
    /// Ranking model
    #[arg(long, value_enum, default_value_t = Model::Bm25)]
    model: Model,
    /// BM25 term-frequency saturation
    #[arg(long, default_value_t = 1.2)]
    k1: f64,
    /// BM25 length normalization
    #[arg(long, default_value_t = 0.75)]
    b: f64,
    /// Override the title weight (default 0.5)
    #[arg(long)]
    title_weight: Option<f64>,
    /// Override the body weight (default 2.0)
    #[arg(long)]
    body_weight: Option<f64>,
    /// Override the date weight (default 0.5 when the index has dates)
    #[arg(long)]
    date_weight: Option<f64>,
    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl SearchArgs {
    fn config(&self) -> Result<SearchConfig> {
        let overrides = [(Field::Title, self.title_weight), (Field::Body, self.body_weight), (Field::Date, self.date_weight)];
        let weights = if overrides.iter().any(|(_, w)| w.is_some()) {
            let mut weights = FieldWeights::standard(true);
            for (field, weight) in overrides {
                if let Some(weight) = weight {
                    weights.set(field, weight)?;
                }
            }
            Some(weights)
        } else {
            None
        };
        let model = match self.model {
            Model::Bm25 => ModelKind::Bm25,
            Model::Tfidf => ModelKind::TfIdf,
        };
        Ok(SearchConfig { weights, bm25: Bm25Params::new(self.k1, self.b)?, model, top_k: self.top_k })
    }
}

#[derive(Args)]
struct CrawlArgs {
    /// Concurrent fetches
    #[arg(long, default_value_t = 8)]
    workers: usize,
    /// Per-page timeout in seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent header and robots.txt identity
    #[arg(long, default_value = "sift-bot/0.1 (+https://example.com/bot)")]
    user_agent: String,
    /// Only follow links on the seed's host
    #[arg(long, default_value_t = false)]
    same_host_only: bool,
    /// Do not fetch or obey robots.txt
    #[arg(long, default_value_t = false)]
    ignore_robots: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let normalizer: Arc<dyn Normalizer> = Arc::new(EnglishNormalizer);

    let (index, query, search) = match cli.command {
        Commands::Files { docs, index, query, workers, search } => {
            tracing::info!(docs = %docs.display(), index = %index.display(), "files mode");
            let builder = IndexBuilder::new(&index, normalizer.clone());
            report(&builder, builder.files(&docs, workers).await?);
            (index, query, search)
        }
        Commands::Crawl { seed, depth, index, query, crawl, search } => {
            tracing::info!(%seed, depth, index = %index.display(), "crawl mode");
            let timeout = Duration::from_secs(crawl.timeout_secs);
            let fetcher = HttpFetcher::new(HttpOptions {
                user_agent: crawl.user_agent,
                timeout,
                respect_robots: !crawl.ignore_robots,
                ..HttpOptions::default()
            })?;
            let config = CrawlConfig {
                max_depth: depth,
                workers: crawl.workers,
                fetch_timeout: timeout,
                same_host_only: crawl.same_host_only,
            };
            let builder = IndexBuilder::new(&index, normalizer.clone());
            report(&builder, builder.crawl(&Crawler::new(fetcher, config), &seed).await?);
            (index, query, search)
        }
    };

    let searcher = Searcher::open(&index, normalizer, search.config()?)?;
    let query = query.join(" ");
    let rows = searcher.search(&query)?;
    if search.json {
        println!("{}", render_json(&rows)?);
    } else {
        print!("{}", render_text(&query, &rows));
    }
    Ok(())
}

fn report(builder: &IndexBuilder, outcome: BuildOutcome) {
    let index = builder.index_dir().display();
    match outcome {
        BuildOutcome::Existing => tracing::info!(%index, "using existing index"),
        BuildOutcome::Built { num_docs, discovered } => tracing::info!(%index, num_docs, discovered, "index build complete"),
    }
}
