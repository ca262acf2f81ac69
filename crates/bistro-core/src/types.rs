//! # Domain Types
//!
//! The two persisted resource kinds (Food, Sale) and their partial-update
//! patches.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Insert   store assigns id, created_at, version = 1                 │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  Update   caller merges a Patch onto a fetched value, re-validates, │
//! │           store bumps version by exactly 1 (or EditConflict)        │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  Delete   hard delete, id is never reused                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Patch Semantics
//! Every patch field is optional. `None` means "leave unchanged"; `Some`
//! means "overwrite", *including* `Some(empty)`. Whether an absent wire
//! field and an explicit null are distinguishable is the transport layer's
//! problem - by the time a patch reaches this crate the tri-state has
//! collapsed to presence/absence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Food
// =============================================================================

/// A food item on the menu.
///
/// `id`, `created_at` and `version` are assigned by the store on insert and
/// must not be set by callers; `version` is the optimistic-concurrency token
/// checked on every update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Positive integer, assigned by the store, immutable.
    pub id: i64,

    /// Assigned by the store at creation, immutable.
    pub created_at: DateTime<Utc>,

    /// Display title. Non-empty, at most 500 bytes.
    pub title: String,

    /// Price in the smallest currency unit. Non-zero.
    pub price: i64,

    /// Preparation wait time in minutes. Positive.
    pub waittime: i64,

    /// Ingredient list. Non-empty, no duplicate entries.
    pub recipe: Vec<String>,

    /// Optimistic-concurrency token. Starts at 1, +1 per successful update.
    pub version: i64,
}

/// Partial update for a [`Food`].
///
/// `None` = leave the field unchanged, `Some` = overwrite it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodPatch {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub waittime: Option<i64>,
    pub recipe: Option<Vec<String>>,
}

impl FoodPatch {
    /// Merges the present fields onto `food`, leaving absent fields alone.
    ///
    /// The merged value still has to pass
    /// [`validate_food`](crate::validation::validate_food) before it may be
    /// handed to the store.
    pub fn apply(self, food: &mut Food) {
        if let Some(title) = self.title {
            food.title = title;
        }
        if let Some(price) = self.price {
            food.price = price;
        }
        if let Some(waittime) = self.waittime {
            food.waittime = waittime;
        }
        if let Some(recipe) = self.recipe {
            food.recipe = recipe;
        }
    }

    /// True when no field is present (the patch would be a no-op).
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.waittime.is_none()
            && self.recipe.is_none()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A promotional sale bundling one or more food items.
///
/// The `foodsale` identifiers are best-effort references into the foods
/// collection: nothing here (or in the store) verifies or cascades them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Positive integer, assigned by the store, immutable.
    pub id: i64,

    /// Assigned by the store at creation, immutable.
    pub created_at: DateTime<Utc>,

    /// Display title. Non-empty, at most 500 bytes.
    pub title: String,

    /// Free-form description. At most 500 bytes, may be empty.
    pub description: String,

    /// Sale duration in minutes. Positive.
    pub duration: i64,

    /// Food identifiers covered by the sale. Non-empty, no duplicates.
    pub foodsale: Vec<String>,

    /// Optimistic-concurrency token. Starts at 1, +1 per successful update.
    pub version: i64,
}

/// Partial update for a [`Sale`]. Same presence semantics as [`FoodPatch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i64>,
    pub foodsale: Option<Vec<String>>,
}

impl SalePatch {
    /// Merges the present fields onto `sale`, leaving absent fields alone.
    pub fn apply(self, sale: &mut Sale) {
        if let Some(title) = self.title {
            sale.title = title;
        }
        if let Some(description) = self.description {
            sale.description = description;
        }
        if let Some(duration) = self.duration {
            sale.duration = duration;
        }
        if let Some(foodsale) = self.foodsale {
            sale.foodsale = foodsale;
        }
    }

    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.duration.is_none()
            && self.foodsale.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
