//! Detail-page harvesting
//!
//! Visits the collected links in discovery order, one at a time, and stops
//! as soon as enough complete recipes have been extracted. A failed or
//! incomplete page is counted and skipped; it never ends the run.

use crate::crawler::detail::{try_extract_detail, DetailRules};
use crate::crawler::fetcher::{PageFetchResult, PageFetcher};
use crate::state::{HarvestState, SkipReason};
use std::time::Duration;

/// Pacing and retry behavior for detail requests
#[derive(Debug, Clone)]
pub struct HarvestPolicy {
    /// Pause between consecutive detail links, whatever their outcome
    pub request_delay: Duration,
    /// Extra attempts for retryable transport failures
    pub max_retries: u32,
    /// Backoff before retry `n` is `retry_backoff * n`
    pub retry_backoff: Duration,
}

impl Default for HarvestPolicy {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_secs(1),
            max_retries: 0,
            retry_backoff: Duration::from_secs(2),
        }
    }
}

/// Why harvesting stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestStop {
    TargetReached,
    LinksExhausted,
}

/// Extracts records from `state.collected_links` until `target_success`
/// records exist or the links run out
///
/// Successes land in `state.records`; every other outcome bumps
/// `state.skip_count`. The delay is applied between links unconditionally,
/// so failing pages are paced like successful ones.
pub async fn harvest<F>(
    fetcher: &F,
    rules: &DetailRules,
    target_success: usize,
    policy: &HarvestPolicy,
    state: &mut HarvestState,
) -> HarvestStop
where
    F: PageFetcher + ?Sized,
{
    if state.success_count >= target_success {
        return HarvestStop::TargetReached;
    }

    let links = state.collected_links.as_slice().to_vec();
    let total = links.len();

    for (i, link) in links.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(policy.request_delay).await;
        }

        tracing::info!("[{}/{}] Processing {}", i + 1, total, link);
        state.processed_count += 1;

        let outcome = match fetch_with_retry(fetcher, link, policy).await {
            Ok(html) => try_extract_detail(&html, link, rules).map_err(SkipReason::Incomplete),
            Err(e) => Err(SkipReason::Transport(e)),
        };

        match outcome {
            Ok(record) => {
                tracing::info!("Harvested {}: {}", state.success_count + 1, record.title());
                state.record_success(record);
            }
            Err(reason) => {
                state.record_skip(&reason);
                match &reason {
                    SkipReason::Transport(e) => {
                        tracing::warn!("Skipping {} ({}): {}", link, state.skip_count, e)
                    }
                    SkipReason::Incomplete(missing) => {
                        tracing::warn!("Skipping {} ({}): {}", link, state.skip_count, missing)
                    }
                }
            }
        }

        if state.success_count >= target_success {
            return HarvestStop::TargetReached;
        }
    }

    HarvestStop::LinksExhausted
}

async fn fetch_with_retry<F>(fetcher: &F, url: &str, policy: &HarvestPolicy) -> PageFetchResult
where
    F: PageFetcher + ?Sized,
{
    let mut attempt = 0;
    loop {
        match fetcher.fetch(url).await {
            Err(e) if e.kind.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let backoff = policy.retry_backoff * attempt;
                tracing::debug!(
                    "Retrying {} in {:?} (attempt {}/{}): {}",
                    url,
                    backoff,
                    attempt,
                    policy.max_retries,
                    e
                );
                tokio::time::sleep(backoff).await;
            }
            result => return result,
        }
    }
}
