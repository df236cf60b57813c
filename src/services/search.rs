//! Recipe recommendation by ingredient
//!
//! Any recipe mentioning at least one of the queried ingredients is a
//! candidate; candidates are ranked by how many of them they mention.

use crate::services::table_store::Table;
use crate::state::{RecipeRecord, INGREDIENT_SEPARATOR, RECORD_COLUMNS, STEP_SEPARATOR};
use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

/// Errors from a recipe search backend
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search service error: {0}")]
    Service(String),

    #[error("Recipe table is missing column '{0}'")]
    MissingColumn(String),
}

/// One ranked recipe
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub score: f64,
}

/// Full-text recipe search over the harvested dataset
#[async_trait]
pub trait RecipeSearch: Send + Sync {
    /// Returns at most `top_k` hits matching any of `ingredient_names`,
    /// best first
    async fn search(&self, ingredient_names: &[String], top_k: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// Query text for full-text backends: the names joined with `OR`
pub fn build_query(ingredient_names: &[String]) -> String {
    ingredient_names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(" OR ")
}

#[derive(Debug, Clone)]
struct IndexedRecipe {
    title: String,
    url: String,
    ingredients: Vec<String>,
    steps: Vec<String>,
    haystack: String,
}

impl IndexedRecipe {
    fn new(title: String, url: String, ingredients: Vec<String>, steps: Vec<String>) -> Self {
        let haystack = ingredients.join(INGREDIENT_SEPARATOR).to_lowercase();
        Self {
            title,
            url,
            ingredients,
            steps,
            haystack,
        }
    }
}

/// Searches recipes held in memory
///
/// The score is the number of distinct queried names found in the
/// recipe's ingredient text. Equal scores keep dataset order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecipeSearch {
    recipes: Vec<IndexedRecipe>,
}

impl InMemoryRecipeSearch {
    pub fn from_records(records: &[RecipeRecord]) -> Self {
        let recipes = records
            .iter()
            .map(|r| {
                IndexedRecipe::new(
                    r.title().to_string(),
                    r.url().to_string(),
                    r.ingredients().to_vec(),
                    r.steps().to_vec(),
                )
            })
            .collect();
        Self { recipes }
    }

    /// Loads a dataset table with `title,url,ingredients,steps` columns
    pub fn from_table(table: &Table) -> Result<Self, SearchError> {
        let mut indices = [0usize; 4];
        for (slot, column) in indices.iter_mut().zip(RECORD_COLUMNS) {
            *slot = table
                .column_index(column)
                .ok_or_else(|| SearchError::MissingColumn(column.to_string()))?;
        }
        let [title, url, ingredients, steps] = indices;

        let recipes = table
            .rows()
            .iter()
            .map(|row| {
                IndexedRecipe::new(
                    row[title].clone(),
                    row[url].clone(),
                    split_cell(&row[ingredients], INGREDIENT_SEPARATOR),
                    split_cell(&row[steps], STEP_SEPARATOR),
                )
            })
            .collect();
        Ok(Self { recipes })
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

fn split_cell(cell: &str, separator: &str) -> Vec<String> {
    cell.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[async_trait]
impl RecipeSearch for InMemoryRecipeSearch {
    async fn search(&self, ingredient_names: &[String], top_k: usize) -> Result<Vec<SearchHit>, SearchError> {
        let mut needles: Vec<String> = ingredient_names
            .iter()
            .map(|n| n.trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        let mut seen = HashSet::new();
        needles.retain(|n| seen.insert(n.clone()));

        tracing::debug!("Searching {} recipes for: {}", self.recipes.len(), build_query(ingredient_names));

        let mut hits: Vec<SearchHit> = self
            .recipes
            .iter()
            .filter_map(|recipe| {
                let matched = needles
                    .iter()
                    .filter(|n| recipe.haystack.contains(n.as_str()))
                    .count();
                (matched > 0).then(|| SearchHit {
                    title: recipe.title.clone(),
                    url: recipe.url.clone(),
                    ingredients: recipe.ingredients.clone(),
                    steps: recipe.steps.clone(),
                    score: matched as f64,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }
}
