//! Listing pagination
//!
//! Walks `listing_url`, `listing_url&page=2`, ... and accumulates recipe
//! links until the target is reached, a page comes back empty, or the page
//! ceiling is hit. One page is fetched at a time with a fixed pause in
//! between.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::links::{extract_links, LinkRules};
use crate::state::HarvestState;
use std::time::Duration;
use url::Url;

/// Limits applied while walking the listing
#[derive(Debug, Clone)]
pub struct PaginationPolicy {
    /// Highest page number requested
    pub max_pages: u32,
    /// Pause before each page after the first
    pub page_delay: Duration,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            max_pages: 50,
            page_delay: Duration::from_millis(500),
        }
    }
}

/// Why link collection stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStop {
    /// The collected set reached the target and was truncated to it
    TargetReached,
    /// A page yielded no links (or could not be fetched)
    EmptyPage { page: u32 },
    /// The page ceiling was reached
    PageCeiling { page: u32 },
}

/// Builds the URL for a listing page
///
/// Page 1 is the bare listing URL. Later pages append `page=N`, with `&`
/// when the listing URL already carries a query string.
pub fn page_url(listing_url: &str, page: u32) -> String {
    if page <= 1 {
        listing_url.to_string()
    } else if listing_url.contains('?') {
        format!("{}&page={}", listing_url, page)
    } else {
        format!("{}?page={}", listing_url, page)
    }
}

/// Collects up to `target_count` recipe links into `state.collected_links`
///
/// Links keep discovery order and are never duplicated. The loop always
/// terminates: on reaching the target, on an empty page, or after
/// `policy.max_pages` pages.
pub async fn collect_links<F>(
    fetcher: &F,
    listing_url: &str,
    base_url: &Url,
    rules: &LinkRules,
    target_count: usize,
    policy: &PaginationPolicy,
    state: &mut HarvestState,
) -> PaginationStop
where
    F: PageFetcher + ?Sized,
{
    let mut page: u32 = 1;

    loop {
        state.current_page = page;
        let url = page_url(listing_url, page);
        tracing::info!("Fetching listing page {}: {}", page, url);

        let page_links = match fetcher.fetch(&url).await {
            Ok(html) => extract_links(&html, base_url, rules),
            Err(e) => {
                tracing::warn!("Listing page {} failed: {}", page, e);
                Vec::new()
            }
        };

        if page_links.is_empty() {
            tracing::info!("No recipe links on page {}, listing exhausted", page);
            return PaginationStop::EmptyPage { page };
        }

        let added = state.collected_links.extend(page_links);
        tracing::info!(
            "Page {}: {} new links ({} total)",
            page,
            added,
            state.collected_links.len()
        );

        if state.collected_links.len() >= target_count {
            state.collected_links.truncate(target_count);
            return PaginationStop::TargetReached;
        }

        if page >= policy.max_pages {
            tracing::info!("Reached page ceiling of {}", policy.max_pages);
            return PaginationStop::PageCeiling { page };
        }
        page += 1;

        tokio::time::sleep(policy.page_delay).await;
    }
}
