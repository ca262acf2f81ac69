//! # bistro-db: Database Layer for the Bistro Catalog
//!
//! This crate provides storage for the two resource collections (foods and
//! sales) over SQLite with sqlx.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`store`] - Generic resource store (CRUD, optimistic concurrency,
//!   filtered/sorted/paginated listing)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bistro_core::{Filters, FOOD_SORT_SAFELIST};
//! use bistro_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/bistro.db")).await?;
//!
//! let filters = Filters::new(FOOD_SORT_SAFELIST).sort("-price");
//! let (foods, metadata) = db.foods().get_all("pasta", &[], &filters).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, FoodStore, SaleStore};
pub use store::{Record, Store};
