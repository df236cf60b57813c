//! Configuration module for Pantry-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every selector cascade has a built-in default tuned for 10000recipe.com, so a
//! minimal configuration only needs a listing URL and an output path.
//!
//! # Example
//!
//! ```no_run
//! use pantry_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting up to {} recipes", config.crawler.target_count);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetchConfig, OutputConfig, SelectorConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::validate;
