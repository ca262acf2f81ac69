//! # Record Trait
//!
//! Per-kind table mapping for the generic [`Store`](crate::store::Store).
//!
//! Foods and sales share every store behavior (CRUD, version check, listing
//! with filters); the only things that differ are the table, the data
//! columns, the tag-array column and the sort safelist. This trait carries
//! exactly that difference, so the store logic exists once.
//!
//! The column constants are compile-time literals, never caller input -
//! interpolating them into SQL is safe.

use bistro_core::{Food, Sale, FOOD_SORT_SAFELIST, SALE_SORT_SAFELIST};
use chrono::{DateTime, Utc};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite};

use crate::error::{DbError, DbResult};

/// A sqlite query with its bound arguments.
pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Maps a resource kind onto its backing table.
pub trait Record: Sized + Send + Sync + Unpin + 'static {
    /// Entity name used in errors and logs ("food", "sale").
    const ENTITY: &'static str;

    /// Backing table name.
    const TABLE: &'static str;

    /// FTS5 shadow table indexing the title column.
    const FTS_TABLE: &'static str;

    /// Caller-settable data columns, in bind order. Excludes id,
    /// created_at and version, which the store owns.
    const DATA_COLUMNS: &'static [&'static str];

    /// The JSON-array column used for tag-containment filtering.
    const TAG_COLUMN: &'static str;

    /// Sort keys accepted for this kind's listing queries.
    const SORT_SAFELIST: &'static [&'static str];

    /// The resource id (0 before insert).
    fn id(&self) -> i64;

    /// The optimistic-concurrency token the caller fetched.
    fn version(&self) -> i64;

    /// Writes back the store-assigned row metadata after an insert.
    fn set_row_meta(&mut self, id: i64, created_at: DateTime<Utc>, version: i64);

    /// Writes back the advanced version after a successful update.
    fn set_version(&mut self, version: i64);

    /// Binds the data columns, in [`Self::DATA_COLUMNS`] order.
    fn bind_data<'q>(&self, query: SqliteQuery<'q>) -> DbResult<SqliteQuery<'q>>;

    /// Decodes a full row (id, created_at, data columns, version).
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// Encodes a tag array as its JSON column representation.
pub(crate) fn encode_tags(tags: &[String]) -> DbResult<String> {
    serde_json::to_string(tags).map_err(|err| DbError::Internal(err.to_string()))
}

/// Decodes a JSON-array column back into a tag vector.
pub(crate) fn decode_tags(row: &SqliteRow, column: &'static str) -> Result<Vec<String>, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    })
}

// =============================================================================
// Food
// =============================================================================

impl Record for Food {
    const ENTITY: &'static str = "food";
    const TABLE: &'static str = "foods";
    const FTS_TABLE: &'static str = "foods_fts";
    const DATA_COLUMNS: &'static [&'static str] = &["title", "price", "waittime", "recipe"];
    const TAG_COLUMN: &'static str = "recipe";
    const SORT_SAFELIST: &'static [&'static str] = FOOD_SORT_SAFELIST;

    fn id(&self) -> i64 {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_row_meta(&mut self, id: i64, created_at: DateTime<Utc>, version: i64) {
        self.id = id;
        self.created_at = created_at;
        self.version = version;
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn bind_data<'q>(&self, query: SqliteQuery<'q>) -> DbResult<SqliteQuery<'q>> {
        Ok(query
            .bind(self.title.clone())
            .bind(self.price)
            .bind(self.waittime)
            .bind(encode_tags(&self.recipe)?))
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Food {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            title: row.try_get("title")?,
            price: row.try_get("price")?,
            waittime: row.try_get("waittime")?,
            recipe: decode_tags(row, "recipe")?,
            version: row.try_get("version")?,
        })
    }
}

// =============================================================================
// Sale
// =============================================================================

impl Record for Sale {
    const ENTITY: &'static str = "sale";
    const TABLE: &'static str = "sales";
    const FTS_TABLE: &'static str = "sales_fts";
    const DATA_COLUMNS: &'static [&'static str] = &["title", "description", "duration", "foodsale"];
    const TAG_COLUMN: &'static str = "foodsale";
    const SORT_SAFELIST: &'static [&'static str] = SALE_SORT_SAFELIST;

    fn id(&self) -> i64 {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_row_meta(&mut self, id: i64, created_at: DateTime<Utc>, version: i64) {
        self.id = id;
        self.created_at = created_at;
        self.version = version;
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn bind_data<'q>(&self, query: SqliteQuery<'q>) -> DbResult<SqliteQuery<'q>> {
        Ok(query
            .bind(self.title.clone())
            .bind(self.description.clone())
            .bind(self.duration)
            .bind(encode_tags(&self.foodsale)?))
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Sale {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            duration: row.try_get("duration")?,
            foodsale: decode_tags(row, "foodsale")?,
            version: row.try_get("version")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_encoding_round_trip() {
        let tags = vec!["flour".to_string(), "egg".to_string()];
        let encoded = encode_tags(&tags).unwrap();
        assert_eq!(encoded, r#"["flour","egg"]"#);

        let decoded: Vec<String> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, tags);
    }

    #[test]
    fn test_column_constants_stay_in_sync() {
        // The tag column must be one of the data columns for both kinds.
        assert!(Food::DATA_COLUMNS.contains(&Food::TAG_COLUMN));
        assert!(Sale::DATA_COLUMNS.contains(&Sale::TAG_COLUMN));
    }
}
