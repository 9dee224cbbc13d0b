//! Crawl engine - the single-worker crawl loop
//!
//! The engine owns the FIFO work queue and the visited set and drives one
//! page at a time through the full pipeline: fetch, extractor matching,
//! metadata merge, file saving, page-link expansion. Per-page failures are
//! caught at the loop boundary so one bad page never stops the queue from
//! draining.

pub mod fetcher;

use crate::config::Config;
use crate::extract::{
    extract_file_urls, extract_metadata, extract_page_urls, Extractor, PageDocument,
};
use crate::metadata::{MetaMap, MetaValue, URL_KEY};
use crate::options::{OptionView, Options};
use crate::save::{self, SaveOutcome};
use crate::Result;
use fetcher::{build_http_client, PageFetcher};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// User agent sent when the config does not set one
const DEFAULT_USER_AGENT: &str = concat!("magpie/", env!("CARGO_PKG_VERSION"));

/// One queued page: a URL plus the metadata snapshot it inherited
///
/// The snapshot is copied at discovery time; sibling pages discovered from
/// the same parent each carry an independent copy.
#[derive(Debug, Clone)]
pub struct PageWorkItem {
    pub url: String,
    pub metadata: MetaMap,
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages dequeued and processed (including failed ones)
    pub pages_visited: u64,

    /// Pages abandoned after a fetch or extraction error
    pub pages_failed: u64,

    /// Dequeued URLs skipped because they were already visited
    pub pages_skipped: u64,

    /// Pages no extractor matched
    pub pages_unmatched: u64,

    pub files_saved: u64,
    pub files_skipped_existing: u64,
    pub files_skipped_small: u64,
    pub files_skipped_dryrun: u64,
    pub files_failed: u64,
}

impl CrawlSummary {
    fn absorb(&mut self, outcome: &SaveOutcome) {
        self.files_saved += outcome.saved;
        self.files_skipped_existing += outcome.skipped_existing;
        self.files_skipped_small += outcome.skipped_small;
        self.files_skipped_dryrun += outcome.skipped_dryrun;
        self.files_failed += outcome.failed;
    }
}

/// The crawl engine
pub struct Engine {
    queue: VecDeque<PageWorkItem>,
    visited: HashSet<String>,
    extractors: Vec<Extractor>,
    options: Options,
    fetcher: PageFetcher,
    summary: CrawlSummary,
}

impl Engine {
    /// Creates an engine from explicit collaborators
    ///
    /// This is the fetch-client injection point: wrap any configured
    /// `reqwest::Client` in a [`PageFetcher`] and pass it here.
    pub fn new(
        seeds: Vec<String>,
        extractors: Vec<Extractor>,
        options: Options,
        fetcher: PageFetcher,
    ) -> Self {
        let queue = seeds
            .into_iter()
            .map(|url| PageWorkItem {
                url,
                metadata: MetaMap::new(),
            })
            .collect();

        Self {
            queue,
            visited: HashSet::new(),
            extractors,
            options,
            fetcher,
            summary: CrawlSummary::default(),
        }
    }

    /// Builds an engine from a loaded configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let client = build_http_client(&user_agent)?;

        let extractors = config
            .extractors
            .into_iter()
            .map(Extractor::from_config)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let options = Options::merged(&config.options);

        Ok(Self::new(
            config.pages,
            extractors,
            options,
            PageFetcher::new(client),
        ))
    }

    /// Appends an extractor, evaluated after the ones already registered
    ///
    /// Library embedders use this to register extractors carrying custom
    /// hooks.
    pub fn push_extractor(&mut self, extractor: Extractor) {
        self.extractors.push(extractor);
    }

    /// Runs the crawl until the queue is empty
    ///
    /// In dry-run mode the walk is identical but nothing is written to
    /// disk. Page and file errors are logged and counted, never propagated.
    pub async fn run(&mut self, dryrun: bool) -> CrawlSummary {
        while let Some(mut item) = self.queue.pop_front() {
            // The page's own URL overwrites any inherited `url` field
            item.metadata
                .insert(URL_KEY.to_string(), MetaValue::Text(item.url.clone()));

            if self.visited.contains(&item.url) {
                tracing::debug!("Already visited {}, skipping", item.url);
                self.summary.pages_skipped += 1;
                continue;
            }

            // Marked before any extractor runs, so re-discovery from other
            // parents processes the page once
            self.visited.insert(item.url.clone());

            let url = item.url.clone();
            if let Err(e) = self.process_page(item, dryrun).await {
                tracing::error!("Error processing {}: {}", url, e);
                self.summary.pages_failed += 1;
            }
            self.summary.pages_visited += 1;
        }

        tracing::info!(
            "Queue drained: {} pages visited, {} files saved",
            self.summary.pages_visited,
            self.summary.files_saved
        );

        self.summary.clone()
    }

    /// Runs one page through every matching extractor
    async fn process_page(&mut self, item: PageWorkItem, dryrun: bool) -> Result<()> {
        let page_url = Url::parse(&item.url)?;
        tracing::info!("Processing {}", page_url);

        let text = self.fetcher.fetch_text(&page_url).await?;

        // Extraction happens in one synchronous pass so the parsed document
        // does not live across awaits; saving and enqueueing follow in the
        // same per-extractor order.
        let yields = {
            let doc = PageDocument::parse(&text);
            let mut yields = Vec::new();
            for (index, extractor) in self.extractors.iter().enumerate() {
                if !extractor.matches(&page_url, &doc) {
                    continue;
                }
                tracing::debug!("Extractor '{}' matched {}", extractor.description, page_url);
                let extracted = extract_metadata(extractor, &page_url, &doc)?;
                let file_urls = extract_file_urls(extractor, &page_url, &doc)?;
                let page_urls = extract_page_urls(extractor, &page_url, &doc)?;
                yields.push((index, extracted, file_urls, page_urls));
            }
            yields
        };

        if yields.is_empty() {
            tracing::warn!("No extractor matched {}", page_url);
            self.summary.pages_unmatched += 1;
            return Ok(());
        }

        let mut metadata = item.metadata;
        let mut discovered: Vec<PageWorkItem> = Vec::new();

        for (index, extracted, file_urls, page_urls) in yields {
            // Extracted fields overwrite inherited ones; everything else
            // persists and accumulates across matching extractors
            metadata.extend(extracted);

            let extractor = &self.extractors[index];
            let view = OptionView::new(&self.options, &extractor.options);

            // Files are saved before this extractor's page links expand
            match save::save_files(&self.fetcher, &view, &metadata, &file_urls, dryrun).await {
                Ok(outcome) => self.summary.absorb(&outcome),
                Err(e) => tracing::warn!(
                    "File saving failed for {} via '{}': {}",
                    page_url,
                    extractor.description,
                    e
                ),
            }

            for url in page_urls {
                // Fresh snapshot per discovered page
                discovered.push(PageWorkItem {
                    url: url.to_string(),
                    metadata: metadata.clone(),
                });
            }
        }

        self.queue.extend(discovered);
        Ok(())
    }
}

/// Builds an engine from the configuration and runs it to completion
///
/// # Example
///
/// ```no_run
/// use magpie::config::load_config;
/// use magpie::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let summary = crawl(config, false).await?;
/// println!("Saved {} files", summary.files_saved);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, dryrun: bool) -> Result<CrawlSummary> {
    let mut engine = Engine::from_config(config)?;
    Ok(engine.run(dryrun).await)
}
