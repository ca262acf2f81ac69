//! # Validation Module
//!
//! Accumulating validation for candidate resources and filter specs.
//!
//! ## Validation Strategy
//! Checks never stop at the first violation: every rule runs and every
//! failure is recorded, so a caller can report all problems in one round
//! trip. Validation is pure - it never touches the store and is safe to run
//! speculatively, e.g. after a partial-update merge but before committing.
//!
//! ## Usage
//! ```rust
//! use bistro_core::{Food, validation};
//!
//! let food = Food {
//!     title: "Pasta".to_string(),
//!     price: 12,
//!     waittime: 20,
//!     recipe: vec!["flour".to_string(), "egg".to_string()],
//!     ..Food::default()
//! };
//! assert!(validation::validate_food(&food).is_ok());
//! ```

use std::collections::{BTreeMap, HashSet};

use crate::error::ValidationError;
use crate::filter::{Filters, MAX_PAGE, MAX_PAGE_SIZE};
use crate::types::{Food, Sale};

// =============================================================================
// Validator
// =============================================================================

/// Accumulates field-level violations instead of failing fast.
///
/// Only the first violation per field is kept; later checks on the same
/// field don't overwrite an earlier, more specific message.
#[derive(Debug, Default)]
pub struct Validator {
    violations: BTreeMap<String, String>,
}

impl Validator {
    /// Creates an empty validator.
    pub fn new() -> Self {
        Validator::default()
    }

    /// True when no violation has been recorded.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Records a violation for `field` unless one is already present.
    pub fn add(&mut self, field: &str, message: &str) {
        self.violations
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Records a violation for `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Consumes the validator; `Err` carries the full violation set.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }
}

/// True when `values` contains no duplicate entries.
pub fn unique(values: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|value| seen.insert(value.as_str()))
}

// =============================================================================
// Per-Kind Rules
// =============================================================================

/// Validates a candidate [`Food`].
///
/// ## Rules
/// - `title`: non-empty, at most 500 bytes
/// - `price`: non-zero
/// - `waittime`: positive
/// - `recipe`: at least one entry, no duplicates
pub fn validate_food(food: &Food) -> Result<(), ValidationError> {
    let mut v = Validator::new();

    v.check(!food.title.is_empty(), "title", "must be provided");
    v.check(
        food.title.len() <= 500,
        "title",
        "must not be more than 500 bytes long",
    );
    v.check(food.price != 0, "price", "must be provided");
    v.check(food.waittime != 0, "waittime", "must be provided");
    v.check(food.waittime > 0, "waittime", "must be a positive integer");
    v.check(!food.recipe.is_empty(), "recipe", "must be provided");
    v.check(
        unique(&food.recipe),
        "recipe",
        "must not contain duplicate values",
    );

    v.finish()
}

/// Validates a candidate [`Sale`].
///
/// ## Rules
/// - `title`: non-empty, at most 500 bytes
/// - `description`: at most 500 bytes (may be empty)
/// - `duration`: positive
/// - `foodsale`: at least one entry, no duplicates
pub fn validate_sale(sale: &Sale) -> Result<(), ValidationError> {
    let mut v = Validator::new();

    v.check(!sale.title.is_empty(), "title", "must be provided");
    v.check(
        sale.title.len() <= 500,
        "title",
        "must not be more than 500 bytes long",
    );
    v.check(
        sale.description.len() <= 500,
        "description",
        "must not be more than 500 bytes long",
    );
    v.check(sale.duration != 0, "duration", "must be provided");
    v.check(sale.duration > 0, "duration", "must be a positive integer");
    v.check(!sale.foodsale.is_empty(), "foodsale", "must be provided");
    v.check(
        unique(&sale.foodsale),
        "foodsale",
        "must not contain duplicate values",
    );

    v.finish()
}

/// Validates a filter spec before any query is constructed.
///
/// Rejecting an unknown sort key here is the sole SQL-injection defense for
/// the dynamic ORDER BY clause - the column name cannot be bound as a query
/// parameter, so it must never come from unchecked caller input.
pub fn validate_filters(filters: &Filters) -> Result<(), ValidationError> {
    let mut v = Validator::new();

    v.check(filters.page > 0, "page", "must be greater than zero");
    v.check(
        filters.page <= MAX_PAGE,
        "page",
        "must be a maximum of 10 million",
    );
    v.check(filters.page_size > 0, "page_size", "must be greater than zero");
    v.check(
        filters.page_size <= MAX_PAGE_SIZE,
        "page_size",
        "must be a maximum of 100",
    );
    v.check(
        filters.sort_column().is_some(),
        "sort",
        "invalid sort value",
    );

    v.finish()
}

// =============================================================================
// Unit Tests
// =============================================================================
