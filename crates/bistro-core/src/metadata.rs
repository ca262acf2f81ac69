//! # Result Metadata Calculator
//!
//! Derives navigable pagination metadata from a filtered total row count.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside a page of listing results.
///
/// Never persisted - recomputed per request from the post-filter,
/// pre-pagination row count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

impl Metadata {
    /// Calculates metadata for a result set.
    ///
    /// An empty result set yields the all-zero metadata rather than a
    /// division by zero; otherwise `last_page = ceil(total / page_size)`.
    pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
        if total_records == 0 {
            return Metadata::default();
        }

        Metadata {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }
}
