//! Harvest coordinator - end-to-end run orchestration
//!
//! This module ties one harvest run together:
//! - Compiling selector rules from configuration
//! - Collecting recipe links from the paginated listing
//! - Harvesting detail pages into records
//! - Writing the dataset and the optional run summary
//!
//! A run fails outward only when nothing was found: no links on the
//! listing, or no complete record from any link. In both cases no dataset
//! is written.

use crate::config::Config;
use crate::crawler::detail::DetailRules;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::harvest::{harvest, HarvestPolicy};
use crate::crawler::links::LinkRules;
use crate::crawler::pagination::{collect_links, PaginationPolicy};
use crate::output::{generate_markdown_summary, write_dataset, CsvTableSink, HarvestReport, TableSink};
use crate::state::HarvestState;
use crate::HarvestError;
use chrono::Utc;
use std::path::Path;
use url::Url;

/// Main harvest coordinator structure
pub struct Coordinator<F: PageFetcher> {
    config: Config,
    fetcher: F,
    sink: Box<dyn TableSink>,
    link_rules: LinkRules,
    detail_rules: DetailRules,
    base_url: Url,
    config_hash: Option<String>,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid selectors/URLs or HTTP client failure
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: PageFetcher> Coordinator<F> {
    /// Creates a coordinator around any fetcher
    pub fn with_fetcher(config: Config, fetcher: F) -> Result<Self, HarvestError> {
        let link_rules = LinkRules::from_config(&config.selectors)?;
        let detail_rules = DetailRules::from_config(&config.selectors)?;
        let base_url = config.crawler.base_url()?;
        let sink = Box::new(CsvTableSink::new(config.output.write_bom));

        Ok(Self {
            config,
            fetcher,
            sink,
            link_rules,
            detail_rules,
            base_url,
            config_hash: None,
        })
    }

    /// Replaces the dataset sink
    pub fn with_sink(mut self, sink: Box<dyn TableSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Records the configuration hash in the run report
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one complete harvest
    ///
    /// 1. Collect links from the listing
    /// 2. Harvest detail pages until the target is met
    /// 3. Write the dataset, then the summary if configured
    pub async fn run(&self) -> Result<HarvestReport, HarvestError> {
        let crawler = &self.config.crawler;
        let started_at = Utc::now();
        let mut state = HarvestState::new();

        tracing::info!(
            "Starting harvest of {} (target {} recipes)",
            crawler.listing_url,
            crawler.target_count
        );

        let pagination = PaginationPolicy {
            max_pages: crawler.max_pages,
            page_delay: crawler.page_delay(),
        };
        let pagination_stop = collect_links(
            &self.fetcher,
            &crawler.listing_url,
            &self.base_url,
            &self.link_rules,
            crawler.target_count,
            &pagination,
            &mut state,
        )
        .await;

        tracing::info!(
            "Collected {} recipe links ({:?})",
            state.collected_links.len(),
            pagination_stop
        );

        if state.collected_links.is_empty() {
            return Err(HarvestError::NoLinks {
                listing_url: crawler.listing_url.clone(),
            });
        }

        let policy = HarvestPolicy {
            request_delay: crawler.request_delay(),
            max_retries: crawler.max_retries,
            retry_backoff: crawler.retry_backoff(),
        };
        let harvest_stop = harvest(
            &self.fetcher,
            &self.detail_rules,
            crawler.target_count,
            &policy,
            &mut state,
        )
        .await;

        tracing::info!(
            "Harvest finished ({:?}): {} succeeded, {} skipped",
            harvest_stop,
            state.success_count,
            state.skip_count
        );

        if state.records.is_empty() {
            return Err(HarvestError::NoRecords {
                attempted: state.processed_count,
            });
        }

        let mut report = HarvestReport {
            listing_url: crawler.listing_url.clone(),
            config_hash: self.config_hash.clone(),
            started_at,
            finished_at: started_at,
            pages_visited: state.current_page,
            pagination_stop,
            harvest_stop,
            links_collected: state.collected_links.len(),
            links_processed: state.processed_count,
            success_count: state.success_count,
            skip_count: state.skip_count,
            transport_skips: state.transport_skips,
            incomplete_skips: state.incomplete_skips,
            dataset_path: self.config.output.dataset_path.clone(),
        };

        let records = state.into_records();
        let dataset_path = Path::new(&self.config.output.dataset_path);
        write_dataset(self.sink.as_ref(), &records, dataset_path)?;
        tracing::info!(
            "Wrote {} recipes to {}",
            records.len(),
            dataset_path.display()
        );

        report.finished_at = Utc::now();

        if let Some(summary_path) = &self.config.output.summary_path {
            generate_markdown_summary(&report, Path::new(summary_path))?;
            tracing::info!("Wrote run summary to {}", summary_path);
        }

        Ok(report)
    }
}

/// Runs a complete harvest over HTTP using the given configuration
pub async fn run_harvest(config: Config) -> Result<HarvestReport, HarvestError> {
    Coordinator::new(config)?.run().await
}
