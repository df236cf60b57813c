//! Collaborators downstream of the harvester
//!
//! The harvested dataset feeds an ingredient inventory and a recipe
//! recommender. Each remote service sits behind a trait:
//! - [`ImageAnalyzer`]: detects ingredients in a photo
//! - [`TableStore`]: stores the inventory and dataset tables
//! - [`RecipeSearch`]: ranks recipes by the ingredients on hand
//!
//! Local implementations are provided for the store and the search. The
//! inventory rules (expiry status, usage deduction) are plain functions over
//! a [`Table`].

mod analyzer;
mod inventory;
mod search;
mod table_store;

pub use analyzer::{
    detect_ingredients, mime_type_for, parse_ingredient_response, AnalyzerError,
    DetectedIngredient, ImageAnalyzer, ImagePayload, ParseError, Quantity, MAX_IMAGE_BYTES,
    SYSTEM_PROMPT, USER_PROMPT,
};
pub use inventory::{
    consume, ExpiryStatus, InventoryError, InventoryItem, Usage, AT_RISK_DAYS, INVENTORY_COLUMNS,
};
pub use search::{build_query, InMemoryRecipeSearch, RecipeSearch, SearchError, SearchHit};
pub use table_store::{append_rows, LocalTableStore, Table, TableStore};
