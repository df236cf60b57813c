//! Recipe detail extraction
//!
//! Title, ingredients and steps are each recovered by their own cascade
//! (see [`crate::crawler::cascade`]). The result is all-or-nothing: a page
//! missing any of the three fields yields no record.

use crate::config::SelectorConfig;
use crate::crawler::cascade::{SelectorCascade, TitleCascade};
use crate::state::RecipeRecord;
use crate::ConfigError;
use scraper::Html;
use std::fmt;

/// Compiled cascades for detail pages
#[derive(Debug, Clone)]
pub struct DetailRules {
    pub title: TitleCascade,
    pub ingredients: SelectorCascade,
    pub steps: SelectorCascade,
}

impl DetailRules {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            title: TitleCascade::new(&config.title, &config.title_strip)?,
            ingredients: SelectorCascade::new(
                &config.ingredients,
                config.ingredient_min_chars,
                &config.ingredient_fallback,
            )?,
            steps: SelectorCascade::new(
                &config.steps,
                config.step_min_chars,
                &config.step_fallback,
            )?,
        })
    }
}

/// The parts of a recipe a detail page did not yield
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingFields {
    pub title: bool,
    pub ingredients: bool,
    pub steps: bool,
}

impl MissingFields {
    pub fn is_empty(&self) -> bool {
        !(self.title || self.ingredients || self.steps)
    }

    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.title, "title"),
            (self.ingredients, "ingredients"),
            (self.steps, "steps"),
        ]
        .into_iter()
        .filter_map(|(missing, name)| missing.then_some(name))
        .collect()
    }
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing {}", self.names().join(", "))
    }
}

/// Extracts a complete recipe from one detail page
///
/// Returns `None` when the title, the ingredient list or the step list
/// could not be recovered. Callers count that as a skip, distinct from a
/// transport failure. [`try_extract_detail`] reports which ones.
///
/// # Example
///
/// ```
/// use pantry_harvest::config::SelectorConfig;
/// use pantry_harvest::crawler::{extract_detail, DetailRules};
///
/// let rules = DetailRules::from_config(&SelectorConfig::default()).unwrap();
/// let html = r#"
///     <div class="view2_summary"><h3>Egg fried rice</h3></div>
///     <div class="ready_ingre3"><ul><li>rice 1 bowl</li><li>egg 2</li></ul></div>
///     <div class="view_step_cont">Scramble the eggs in oil</div>
///     <div class="view_step_cont">Add rice and stir fry</div>
/// "#;
/// let record = extract_detail(html, "https://example.com/recipe/1", &rules).unwrap();
/// assert_eq!(record.title(), "Egg fried rice");
/// assert_eq!(record.steps_joined(), "1. Scramble the eggs in oil | 2. Add rice and stir fry");
/// ```
pub fn extract_detail(html: &str, source_url: &str, rules: &DetailRules) -> Option<RecipeRecord> {
    try_extract_detail(html, source_url, rules).ok()
}

/// Like [`extract_detail`], but an incomplete page reports what it lacked
pub fn try_extract_detail(
    html: &str,
    source_url: &str,
    rules: &DetailRules,
) -> Result<RecipeRecord, MissingFields> {
    let document = Html::parse_document(html);

    let title = rules.title.find(&document);
    let ingredients = rules.ingredients.collect(&document).items;
    let steps = rules.steps.collect(&document).items;

    tracing::debug!(
        "Extracted from {}: title={:?}, {} ingredients, {} steps",
        source_url,
        title.as_deref().map(|t| t.chars().take(50).collect::<String>()),
        ingredients.len(),
        steps.len()
    );

    let missing = MissingFields {
        title: title.as_deref().map_or(true, |t| t.trim().is_empty()),
        ingredients: ingredients.is_empty(),
        steps: steps.is_empty(),
    };
    if !missing.is_empty() {
        tracing::debug!("Incomplete page {}: {}", source_url, missing);
        return Err(missing);
    }

    let title = title.unwrap_or_default();
    RecipeRecord::new(title, source_url, ingredients, steps).ok_or(MissingFields {
        title: true,
        ..MissingFields::default()
    })
}
