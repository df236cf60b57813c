//! Pantry-Harvest: a polite recipe harvester
//!
//! This crate walks a paginated recipe listing, extracts title, ingredients
//! and steps from each detail page through configurable selector cascades,
//! and writes the complete records as a flat table. The ingredient-inventory
//! and recommendation services it feeds are modeled as traits in
//! [`services`].

pub mod config;
pub mod crawler;
pub mod output;
pub mod services;
pub mod state;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("No recipe links found at {listing_url}; check the listing URL or link selectors")]
    NoLinks { listing_url: String },

    #[error("No complete recipes extracted from {attempted} links")]
    NoRecords { attempted: usize },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    collect_links, extract_detail, extract_links, harvest, run_harvest, FetchError,
    FetchErrorKind, HttpFetcher, PageFetcher,
};
pub use state::{HarvestState, LinkSet, RecipeRecord};
