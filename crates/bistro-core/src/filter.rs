//! # Sort/Pagination Policy
//!
//! Turns a caller-supplied filter spec into safe query parameters.
//!
//! ## Safelisted Sorting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  caller sort key          safelist check        resolved            │
//! │                                                                     │
//! │  "title"          ──►  in FOOD safelist  ──►  (title, ASC)          │
//! │  "-price"         ──►  in FOOD safelist  ──►  (price, DESC)         │
//! │  "; DROP TABLE"   ──►  NOT in safelist   ──►  validation error      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The safelist is the only defense for the dynamic ORDER BY column: a
//! column name can't be bound as a statement parameter, so anything outside
//! the enumerated set must be rejected before query construction.

use serde::{Deserialize, Serialize};

/// Sort keys accepted for the foods collection.
pub const FOOD_SORT_SAFELIST: &[&str] = &[
    "id", "title", "price", "waittime", "-id", "-title", "-price", "-waittime",
];

/// Sort keys accepted for the sales collection.
pub const SALE_SORT_SAFELIST: &[&str] = &[
    "id", "title", "description", "duration",
    "-id", "-title", "-description", "-duration",
];

/// Upper bound on the requested page number.
pub const MAX_PAGE: i64 = 10_000_000;

/// Upper bound on the requested page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Resolved sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// The SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Caller-supplied filter spec for a listing query.
///
/// Must pass [`validate_filters`](crate::validation::validate_filters)
/// before the store may execute it.
///
/// ## Example
/// ```rust
/// use bistro_core::{Filters, SortDirection, FOOD_SORT_SAFELIST};
///
/// let filters = Filters::new(FOOD_SORT_SAFELIST).sort("-price");
/// assert_eq!(filters.sort_column(), Some("price"));
/// assert_eq!(filters.sort_direction(), SortDirection::Descending);
/// assert_eq!(filters.limit(), 20);
/// assert_eq!(filters.offset(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Filters {
    /// Requested page, 1-based.
    pub page: i64,

    /// Rows per page, 1..=100.
    pub page_size: i64,

    /// Requested sort key; a leading `-` selects descending order.
    pub sort: String,

    /// Per-collection set of accepted sort keys.
    pub sort_safelist: &'static [&'static str],
}

impl Filters {
    /// Creates a filter spec with the default page (1), page size (20) and
    /// sort key (`"id"`).
    pub fn new(sort_safelist: &'static [&'static str]) -> Self {
        Filters {
            page: 1,
            page_size: 20,
            sort: "id".to_string(),
            sort_safelist,
        }
    }

    /// Sets the requested page.
    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    /// Sets the requested page size.
    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the requested sort key.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Resolves the sort key to a column name, or `None` when the key is
    /// not in the safelist. The leading `-` is stripped.
    pub fn sort_column(&self) -> Option<&str> {
        if self.sort_safelist.contains(&self.sort.as_str()) {
            Some(self.sort.trim_start_matches('-'))
        } else {
            None
        }
    }

    /// The sort direction implied by the key's `-` prefix.
    pub fn sort_direction(&self) -> SortDirection {
        if self.sort.starts_with('-') {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    /// Row limit for the listing query.
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Row offset for the listing query. Saturates instead of overflowing
    /// when the spec has not been validated.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
