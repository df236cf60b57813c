//! Recipe link extraction from listing pages
//!
//! The prioritized selectors are all scanned and their hits merged in
//! order, first occurrence wins. The generic scan of every anchor only runs
//! when the whole prioritized pass found nothing.

use crate::config::SelectorConfig;
use crate::crawler::cascade::{compile_selector, compile_selectors};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled link discovery rules
#[derive(Debug, Clone)]
pub struct LinkRules {
    selectors: Vec<(String, Selector)>,
    path_marker: String,
    anchor: Selector,
}

impl LinkRules {
    pub fn new(selectors: &[String], path_marker: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: compile_selectors(selectors)?,
            path_marker: path_marker.to_string(),
            anchor: compile_selector("a[href]")?,
        })
    }

    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Self::new(&config.links, &config.link_marker)
    }

    pub fn path_marker(&self) -> &str {
        &self.path_marker
    }
}

/// Extracts recipe detail links from one listing page
///
/// # Rules
///
/// - Each prioritized selector is scanned in order. Only a match's own
///   `href` counts; anchors nested inside a matched container are not
///   searched, so a container-only selector contributes nothing.
/// - Only hrefs containing the path marker are kept.
/// - Relative hrefs resolve against `base_url`.
/// - `javascript:`, `mailto:`, `tel:`, `data:` and fragment-only hrefs are
///   skipped.
/// - A link already collected from this page is not added again.
///
/// Malformed markup never errors; a page without matches yields an empty
/// vector.
///
/// # Example
///
/// ```
/// use pantry_harvest::config::SelectorConfig;
/// use pantry_harvest::crawler::{extract_links, LinkRules};
/// use url::Url;
///
/// let rules = LinkRules::from_config(&SelectorConfig::default()).unwrap();
/// let base = Url::parse("https://www.10000recipe.com/").unwrap();
/// let html = r#"<a href="/recipe/6903394">Kimchi stew</a><a href="/profile">Me</a>"#;
/// let links = extract_links(html, &base, &rules);
/// assert_eq!(links, vec!["https://www.10000recipe.com/recipe/6903394"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url, rules: &LinkRules) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for (source, selector) in &rules.selectors {
        let before = links.len();
        for element in document.select(selector) {
            push_anchor(element, base_url, rules, &mut links);
        }
        tracing::trace!("Link selector '{}' added {} links", source, links.len() - before);
    }

    if links.is_empty() {
        tracing::debug!("No structural link matches, scanning every anchor");
        for anchor in document.select(&rules.anchor) {
            push_anchor(anchor, base_url, rules, &mut links);
        }
    }

    links
}

fn push_anchor(anchor: ElementRef<'_>, base_url: &Url, rules: &LinkRules, links: &mut Vec<String>) {
    let Some(href) = anchor.value().attr("href") else {
        return;
    };
    if !href.contains(rules.path_marker.as_str()) {
        return;
    }
    if let Some(absolute) = resolve_link(href, base_url) {
        if !links.contains(&absolute) {
            links.push(absolute);
        }
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Same page anchors
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
