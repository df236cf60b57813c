//! State management for harvest runs
//!
//! This module contains the per-run state (collected links, counters,
//! accumulated records) and the validated record type.

mod harvest_state;
mod record;

pub use harvest_state::{HarvestState, LinkSet, SkipReason};
pub use record::{RecipeRecord, INGREDIENT_SEPARATOR, RECORD_COLUMNS, STEP_SEPARATOR};
