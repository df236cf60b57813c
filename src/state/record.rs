//! The validated recipe record
//!
//! A [`RecipeRecord`] can only be built through [`RecipeRecord::new`], which
//! refuses to produce a record with a missing title, no ingredients, or no
//! steps. There is no partially filled record.

/// Column order of the harvested dataset
pub const RECORD_COLUMNS: [&str; 4] = ["title", "url", "ingredients", "steps"];

/// Separator between ingredients in the flat row form
pub const INGREDIENT_SEPARATOR: &str = "; ";

/// Separator between numbered steps in the flat row form
pub const STEP_SEPARATOR: &str = " | ";

/// One fully validated recipe extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    title: String,
    url: String,
    ingredients: Vec<String>,
    steps: Vec<String>,
}

impl RecipeRecord {
    /// Builds a record, numbering the raw steps `"1. ..."`, `"2. ..."` in order
    ///
    /// Returns `None` when the title is blank or either list is empty.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        ingredients: Vec<String>,
        raw_steps: Vec<String>,
    ) -> Option<Self> {
        let title = title.into().trim().to_string();
        if title.is_empty() || ingredients.is_empty() || raw_steps.is_empty() {
            return None;
        }

        Some(Self {
            title,
            url: url.into(),
            ingredients,
            steps: number_steps(raw_steps),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    /// Steps, already numbered
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn ingredients_joined(&self) -> String {
        self.ingredients.join(INGREDIENT_SEPARATOR)
    }

    pub fn steps_joined(&self) -> String {
        self.steps.join(STEP_SEPARATOR)
    }

    /// Flattens the record into a row matching [`RECORD_COLUMNS`]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.url.clone(),
            self.ingredients_joined(),
            self.steps_joined(),
        ]
    }
}

fn number_steps(raw_steps: Vec<String>) -> Vec<String> {
    raw_steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect()
}
