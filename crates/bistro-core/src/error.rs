//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Hierarchy
//! ```text
//! bistro-core errors (this file)
//! └── ValidationError  - Accumulated field rule violations
//!
//! bistro-db errors (separate crate)
//! └── DbError          - NotFound / EditConflict / storage failures
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. A validation failure carries the FULL violation set, so a caller
//!    sees every problem at once instead of fixing them one by one

use std::collections::BTreeMap;
use thiserror::Error;

/// Validation failure carrying every field violation found.
///
/// The map is keyed by field name; only the first violation recorded for a
/// field is kept, matching the accumulating [`Validator`](crate::Validator).
///
/// ## Example
/// ```rust
/// use bistro_core::{Food, validation};
///
/// let bad = Food { title: String::new(), ..Food::default() };
/// let err = validation::validate_food(&bad).unwrap_err();
/// assert_eq!(err.violations()["title"], "must be provided");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", format_violations(.violations))]
pub struct ValidationError {
    violations: BTreeMap<String, String>,
}

impl ValidationError {
    /// Creates a validation error from an accumulated violation map.
    ///
    /// Callers normally go through [`Validator::finish`](crate::Validator),
    /// which returns `Ok(())` when the map is empty.
    pub fn new(violations: BTreeMap<String, String>) -> Self {
        ValidationError { violations }
    }

    /// The full set of violations, keyed by field name.
    pub fn violations(&self) -> &BTreeMap<String, String> {
        &self.violations
    }

    /// Consumes the error, returning the violation map.
    pub fn into_violations(self) -> BTreeMap<String, String> {
        self.violations
    }
}

fn format_violations(violations: &BTreeMap<String, String>) -> String {
    violations
        .iter()
        .map(|(field, message)| format!("{field} {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}
