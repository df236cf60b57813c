use crate::config::types::{Config, CrawlerConfig, FetchConfig, OutputConfig, SelectorConfig};
use crate::crawler::compile_selector;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    validate_selector_config(&config.selectors)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_http_url("listing-url", &config.listing_url)?;

    if let Some(origin) = &config.site_origin {
        validate_http_url("site-origin", origin)?;
    }

    if config.target_count < 1 {
        return Err(ConfigError::Validation(format!(
            "target-count must be >= 1, got {}",
            config.target_count
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dataset_path.is_empty() {
        return Err(ConfigError::Validation(
            "dataset-path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every cascade is non-empty and every selector compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    if config.link_marker.is_empty() {
        return Err(ConfigError::Validation(
            "link-marker cannot be empty".to_string(),
        ));
    }

    for (name, min_chars) in [
        ("ingredient-min-chars", config.ingredient_min_chars),
        ("step-min-chars", config.step_min_chars),
    ] {
        if min_chars == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be at least 1",
                name
            )));
        }
    }

    for (name, selectors) in [
        ("links", &config.links),
        ("title", &config.title),
        ("ingredients", &config.ingredients),
        ("steps", &config.steps),
    ] {
        if selectors.is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector list '{}' cannot be empty",
                name
            )));
        }

        for selector in selectors {
            compile_selector(selector)?;
        }
    }

    for (name, markers) in [
        ("ingredient-fallback", &config.ingredient_fallback),
        ("step-fallback", &config.step_fallback),
    ] {
        if markers.iter().any(|m| m.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "'{}' cannot contain empty class markers",
                name
            )));
        }
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use HTTP or HTTPS",
            field, value
        )));
    }

    Ok(())
}
