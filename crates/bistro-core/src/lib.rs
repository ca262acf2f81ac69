//! # bistro-core: Pure Domain Logic for the Bistro Catalog
//!
//! This crate is the **heart** of the Bistro catalog service. It contains the
//! domain types and rules shared by both resource collections (foods and
//! sales) as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Architecture                          │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │              Transport (HTTP handlers, CLI)                 │   │
//! │  │        decode request ──► call core/db ──► encode reply     │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ bistro-core (THIS CRATE) ★                  │   │
//! │  │                                                             │   │
//! │  │   ┌─────────┐  ┌────────────┐  ┌─────────┐  ┌──────────┐   │   │
//! │  │   │  types  │  │ validation │  │ filter  │  │ metadata │   │   │
//! │  │   │  Food   │  │   rules    │  │ Filters │  │ Metadata │   │   │
//! │  │   │  Sale   │  │   checks   │  │  sort   │  │  pages   │   │   │
//! │  │   └─────────┘  └────────────┘  └─────────┘  └──────────┘   │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                    bistro-db (Storage Layer)                │   │
//! │  │             SQLite queries, migrations, stores              │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Food, Sale) and their partial-update patches
//! - [`validation`] - Accumulating validator and per-kind field rules
//! - [`filter`] - Sort/pagination policy (safelisted sort keys, page bounds)
//! - [`metadata`] - Pagination metadata derived from a total row count
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Accumulating Validation**: All field violations reported at once,
//!    never fail-fast on the first problem
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod metadata;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bistro_core::Food` instead of
// `use bistro_core::types::Food`

pub use error::ValidationError;
pub use filter::{Filters, SortDirection, FOOD_SORT_SAFELIST, SALE_SORT_SAFELIST};
pub use metadata::Metadata;
pub use types::{Food, FoodPatch, Sale, SalePatch};
pub use validation::Validator;
