//! Selector cascades
//!
//! A cascade is an ordered list of CSS selectors plus the rules applied to
//! whatever the winning selector matched. The first selector that matches
//! at least one element wins; later selectors are never tried and results
//! are never merged across selectors. Only when no selector matches any
//! element does the generic class-substring scan run.

use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Compiles one CSS selector, reporting which one was malformed
pub fn compile_selector(source: &str) -> Result<Selector, ConfigError> {
    Selector::parse(source).map_err(|e| ConfigError::InvalidSelector {
        selector: source.to_string(),
        message: e.to_string(),
    })
}

/// Compiles a list of selectors, keeping their source text for logging
pub fn compile_selectors(sources: &[String]) -> Result<Vec<(String, Selector)>, ConfigError> {
    sources
        .iter()
        .map(|source| Ok((source.clone(), compile_selector(source)?)))
        .collect()
}

/// Text of an element: its text nodes trimmed and joined by single spaces
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Which rule produced a cascade's items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeSource {
    /// A listed selector matched; carries the selector text
    Selector(String),
    /// No selector matched; the class-substring scan ran
    Fallback,
}

/// Items collected by one cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeMatch {
    pub items: Vec<String>,
    pub source: CascadeSource,
}

/// An ordered list of selectors with a minimum item length and a generic
/// class-substring fallback
#[derive(Debug, Clone)]
pub struct SelectorCascade {
    selectors: Vec<(String, Selector)>,
    min_chars: usize,
    fallback_class_markers: Vec<String>,
    any_class: Selector,
}

impl SelectorCascade {
    pub fn new(
        selectors: &[String],
        min_chars: usize,
        fallback_class_markers: &[String],
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: compile_selectors(selectors)?,
            min_chars,
            fallback_class_markers: fallback_class_markers.to_vec(),
            any_class: compile_selector("[class]")?,
        })
    }

    /// Runs the cascade over a document
    ///
    /// Items shorter than the minimum length (in characters) are dropped and
    /// duplicates keep their first position. If the winning selector's
    /// matches are all filtered out the result is empty; the fallback is
    /// not consulted in that case.
    pub fn collect(&self, document: &Html) -> CascadeMatch {
        for (source, selector) in &self.selectors {
            let mut matches = document.select(selector).peekable();
            if matches.peek().is_none() {
                continue;
            }

            let elements: Vec<ElementRef<'_>> = matches.collect();
            tracing::debug!("Selector '{}' matched {} elements", source, elements.len());
            return CascadeMatch {
                items: self.filter_items(elements),
                source: CascadeSource::Selector(source.clone()),
            };
        }

        tracing::debug!(
            "No selector matched, scanning classes containing {:?}",
            self.fallback_class_markers
        );
        let elements = document.select(&self.any_class).filter(|element| {
            element.value().attr("class").is_some_and(|class| {
                self.fallback_class_markers
                    .iter()
                    .any(|marker| class.contains(marker.as_str()))
            })
        });

        CascadeMatch {
            items: self.filter_items(elements),
            source: CascadeSource::Fallback,
        }
    }

    fn filter_items<'a, I>(&self, elements: I) -> Vec<String>
    where
        I: IntoIterator<Item = ElementRef<'a>>,
    {
        let mut items: Vec<String> = Vec::new();
        for element in elements {
            let text = element_text(element);
            if text.chars().count() >= self.min_chars && !items.contains(&text) {
                items.push(text);
            }
        }
        items
    }
}

/// Title rules: an ordered selector list, then the document `<title>` with
/// the site name removed
#[derive(Debug, Clone)]
pub struct TitleCascade {
    selectors: Vec<(String, Selector)>,
    strip: String,
    title_tag: Selector,
}

impl TitleCascade {
    pub fn new(selectors: &[String], strip: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: compile_selectors(selectors)?,
            strip: strip.to_string(),
            title_tag: compile_selector("title")?,
        })
    }

    /// Returns the first matching selector's text, else the cleaned
    /// `<title>`, else `None`
    ///
    /// A selector whose first match has no text ends the selector pass and
    /// goes straight to the `<title>` fallback.
    pub fn find(&self, document: &Html) -> Option<String> {
        for (source, selector) in &self.selectors {
            if let Some(element) = document.select(selector).next() {
                tracing::debug!("Title selector '{}' matched", source);
                let text = element_text(element);
                if !text.is_empty() {
                    return Some(text);
                }
                break;
            }
        }

        document.select(&self.title_tag).next().and_then(|element| {
            let text = element_text(element);
            let cleaned = if self.strip.is_empty() {
                text
            } else {
                text.replace(self.strip.as_str(), "")
            };
            let cleaned = cleaned.trim().to_string();
            (!cleaned.is_empty()).then_some(cleaned)
        })
    }
}
