//! Crawler module for recipe harvesting
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with transport failure classification
//! - Selector cascades over listing and detail markup
//! - Listing pagination with a page ceiling
//! - Detail harvesting with rate limiting and early stop
//! - Overall run coordination

mod cascade;
mod coordinator;
mod detail;
mod fetcher;
mod harvest;
mod links;
mod pagination;

pub use cascade::{
    compile_selector, element_text, CascadeMatch, CascadeSource, SelectorCascade, TitleCascade,
};
pub use coordinator::{run_harvest, Coordinator};
pub use detail::{extract_detail, try_extract_detail, DetailRules, MissingFields};
pub use fetcher::{
    build_http_client, fetch_url, FetchError, FetchErrorKind, HttpFetcher, PageFetchResult,
    PageFetcher,
};
pub use harvest::{harvest, HarvestPolicy, HarvestStop};
pub use links::{extract_links, resolve_link, LinkRules};
pub use pagination::{collect_links, page_url, PaginationPolicy, PaginationStop};
