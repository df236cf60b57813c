//! Integration tests for the harvester
//!
//! Listing and detail pages are served by wiremock mock servers or by a
//! scripted in-memory fetcher; datasets land in temporary directories.

mod common;
mod fetch_tests;
mod pagination_tests;
mod run_tests;
