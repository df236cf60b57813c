//! Link collection across listing pages

use crate::common::{listing_html, recipe_url, EndlessListing, ScriptedFetcher};
use pantry_harvest::config::SelectorConfig;
use pantry_harvest::crawler::{
    collect_links, FetchErrorKind, LinkRules, PaginationPolicy, PaginationStop,
};
use pantry_harvest::HarvestState;
use std::time::Duration;
use url::Url;

const LISTING: &str = "https://www.example.com/issue/view.html?cid=9999scrap";

fn rules() -> LinkRules {
    LinkRules::from_config(&SelectorConfig::default()).unwrap()
}

fn base() -> Url {
    Url::parse("https://www.example.com/").unwrap()
}

fn no_delay(max_pages: u32) -> PaginationPolicy {
    PaginationPolicy {
        max_pages,
        page_delay: Duration::ZERO,
    }
}

fn page(n: u32) -> String {
    format!("{}&page={}", LISTING, n)
}

#[tokio::test]
async fn test_stops_at_first_empty_page() {
    let fetcher = ScriptedFetcher::new()
        .page(LISTING, listing_html(&[1, 2]))
        .page(page(2), listing_html(&[2, 3]))
        .page(page(3), listing_html(&[]));
    let mut state = HarvestState::new();

    let stop = collect_links(&fetcher, LISTING, &base(), &rules(), 100, &no_delay(50), &mut state).await;

    assert_eq!(stop, PaginationStop::EmptyPage { page: 3 });
    assert_eq!(
        state.collected_links.as_slice(),
        &[recipe_url(1), recipe_url(2), recipe_url(3)]
    );
    assert_eq!(fetcher.requests(), vec![LISTING.to_string(), page(2), page(3)]);
}

#[tokio::test]
async fn test_failed_page_counts_as_empty() {
    let fetcher = ScriptedFetcher::new()
        .page(LISTING, listing_html(&[1]))
        .error(page(2), FetchErrorKind::Timeout)
        .page(page(3), listing_html(&[7]));
    let mut state = HarvestState::new();

    let stop = collect_links(&fetcher, LISTING, &base(), &rules(), 100, &no_delay(50), &mut state).await;

    assert_eq!(stop, PaginationStop::EmptyPage { page: 2 });
    assert_eq!(state.collected_links.len(), 1);
    assert_eq!(fetcher.request_count(&page(3)), 0);
}

#[tokio::test]
async fn test_truncates_to_exact_target() {
    let fetcher = ScriptedFetcher::new()
        .page(LISTING, listing_html(&[1, 2, 3]))
        .page(page(2), listing_html(&[4, 5, 6]));
    let mut state = HarvestState::new();

    let stop = collect_links(&fetcher, LISTING, &base(), &rules(), 5, &no_delay(50), &mut state).await;

    assert_eq!(stop, PaginationStop::TargetReached);
    assert_eq!(state.collected_links.len(), 5);
    assert!(!state.collected_links.contains(&recipe_url(6)));
    assert_eq!(state.current_page, 2);
}

#[tokio::test]
async fn test_page_ceiling_ends_an_endless_listing() {
    let fetcher = EndlessListing::new();
    let mut state = HarvestState::new();

    let stop = collect_links(
        &fetcher,
        LISTING,
        &base(),
        &rules(),
        1_000,
        &PaginationPolicy {
            page_delay: Duration::ZERO,
            ..PaginationPolicy::default()
        },
        &mut state,
    )
    .await;

    assert_eq!(stop, PaginationStop::PageCeiling { page: 50 });
    assert_eq!(fetcher.request_count(), 50);
    assert_eq!(state.collected_links.len(), 50);
}

#[tokio::test]
async fn test_duplicate_only_page_does_not_stop_collection() {
    let fetcher = ScriptedFetcher::new()
        .page(LISTING, listing_html(&[1, 2]))
        .page(page(2), listing_html(&[1, 2]))
        .page(page(3), listing_html(&[3]));
    let mut state = HarvestState::new();

    let stop = collect_links(&fetcher, LISTING, &base(), &rules(), 3, &no_delay(50), &mut state).await;

    assert_eq!(stop, PaginationStop::TargetReached);
    assert_eq!(state.collected_links.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_delay_only_between_pages() {
    let fetcher = ScriptedFetcher::new()
        .page(LISTING, listing_html(&[1]))
        .page(page(2), listing_html(&[2]))
        .page(page(3), listing_html(&[3]))
        .page(page(4), listing_html(&[]));
    let mut state = HarvestState::new();
    let policy = PaginationPolicy {
        max_pages: 50,
        page_delay: Duration::from_millis(500),
    };

    let start = tokio::time::Instant::now();
    collect_links(&fetcher, LISTING, &base(), &rules(), 100, &policy, &mut state).await;
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(1_500), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2_000), "elapsed {:?}", elapsed);
}
