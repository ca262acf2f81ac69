//! # Generic Resource Store
//!
//! One CRUD/listing implementation shared by both resource kinds; the
//! per-kind differences live entirely in the [`Record`] trait.
//!
//! ## Optimistic Concurrency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │             Two writers race on the same food (version 3)           │
//! │                                                                     │
//! │  Writer A: UPDATE ... SET version = version + 1                     │
//! │            WHERE id = 7 AND version = 3        ── 1 row ── OK (v4)  │
//! │                                                                     │
//! │  Writer B: UPDATE ... SET version = version + 1                     │
//! │            WHERE id = 7 AND version = 3        ── 0 rows ─ Conflict │
//! │                                                                     │
//! │  B re-fetches (sees v4), reapplies its change, retries: OK (v5)     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The check-and-bump is a single conditional statement, never a separate
//! read/check/write sequence, so no lock is held and no lost update can
//! slip through the gap.
//!
//! ## Listing
//! `get_all` runs one query that combines the page fetch with a
//! `COUNT(*) OVER ()` window total, so the count and the rows come from the
//! same snapshot. On very large tables this makes every listing request
//! O(n) in the filtered row count - a known scalability tradeoff inherited
//! from the one-query design.

pub mod record;

use std::marker::PhantomData;
use std::time::Duration;

use sqlx::{Row, SqlitePool};
use tokio::time::timeout;
use tracing::debug;

use bistro_core::{Filters, Metadata};

use crate::error::{DbError, DbResult};

pub use record::Record;

/// Per-call deadline for every store operation. An elapsed deadline
/// surfaces as [`DbError::Timeout`], never as partial results.
const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Generic store for one resource kind.
///
/// ## Usage
/// ```rust,ignore
/// let foods = db.foods();
/// let food = foods.insert(candidate).await?;
/// let (items, metadata) = foods.get_all("", &[], &filters).await?;
/// ```
pub struct Store<R: Record> {
    pool: SqlitePool,
    _kind: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for Store<R> {
    fn clone(&self) -> Self {
        Store {
            pool: self.pool.clone(),
            _kind: PhantomData,
        }
    }
}

impl<R: Record> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("entity", &R::ENTITY).finish()
    }
}

impl<R: Record> Store<R> {
    /// Creates a store over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Store {
            pool,
            _kind: PhantomData,
        }
    }

    /// Default filter spec for this kind: page 1, page size 20, sorted by
    /// id, with the kind's sort safelist attached.
    pub fn filters() -> Filters {
        Filters::new(R::SORT_SAFELIST)
    }

    /// Persists a new row; the store assigns id, created_at and version 1.
    ///
    /// Returns the populated resource. The candidate is expected to have
    /// passed validation already - the store applies no field rules of its
    /// own.
    pub async fn insert(&self, mut record: R) -> DbResult<R> {
        debug!(entity = R::ENTITY, "inserting row");

        let sql = insert_sql(R::TABLE, R::DATA_COLUMNS);
        let query = record.bind_data(sqlx::query(&sql))?;

        let row = timeout(QUERY_TIMEOUT, query.fetch_one(&self.pool))
            .await
            .map_err(|_| DbError::Timeout)??;

        record.set_row_meta(
            row.try_get("id")?,
            row.try_get("created_at")?,
            row.try_get("version")?,
        );

        debug!(entity = R::ENTITY, id = record.id(), "row inserted");
        Ok(record)
    }

    /// Point lookup by primary key. No locking.
    pub async fn get(&self, id: i64) -> DbResult<R> {
        if id < 1 {
            return Err(DbError::not_found(R::ENTITY, id));
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            select_columns(R::DATA_COLUMNS),
            R::TABLE,
        );

        let row = timeout(QUERY_TIMEOUT, sqlx::query(&sql).bind(id).fetch_optional(&self.pool))
            .await
            .map_err(|_| DbError::Timeout)??;

        match row {
            Some(row) => Ok(R::from_row(&row)?),
            None => Err(DbError::not_found(R::ENTITY, id)),
        }
    }

    /// Version-checked conditional update.
    ///
    /// Executes `SET ..., version = version + 1 WHERE id = ? AND version = ?`
    /// as one atomic statement and re-reads the new version. Zero matched
    /// rows means another writer got there first: the caller sees
    /// [`DbError::EditConflict`] and must re-fetch before retrying.
    pub async fn update(&self, mut record: R) -> DbResult<R> {
        debug!(
            entity = R::ENTITY,
            id = record.id(),
            version = record.version(),
            "updating row"
        );

        let sql = update_sql(R::TABLE, R::DATA_COLUMNS);
        let query = record
            .bind_data(sqlx::query(&sql))?
            .bind(record.id())
            .bind(record.version());

        let row = timeout(QUERY_TIMEOUT, query.fetch_optional(&self.pool))
            .await
            .map_err(|_| DbError::Timeout)??;

        match row {
            Some(row) => {
                record.set_version(row.try_get("version")?);
                Ok(record)
            }
            None => Err(DbError::edit_conflict(R::ENTITY, record.id())),
        }
    }

    /// Hard delete. A second delete of the same id reports `NotFound`.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        if id < 1 {
            return Err(DbError::not_found(R::ENTITY, id));
        }

        debug!(entity = R::ENTITY, id, "deleting row");

        let sql = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
        let result = timeout(QUERY_TIMEOUT, sqlx::query(&sql).bind(id).execute(&self.pool))
            .await
            .map_err(|_| DbError::Timeout)??;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(R::ENTITY, id));
        }

        Ok(())
    }

    /// Filtered, sorted, paginated listing with result-count metadata.
    ///
    /// - `title`: full-text "contains all tokens" match; empty (or
    ///   tokenless) means no filter
    /// - `tags`: the tag column must contain every given value; empty set
    ///   means no filter
    /// - `filters`: must already have passed
    ///   [`validate_filters`](bistro_core::validation::validate_filters)
    ///
    /// Rows are ordered by the resolved sort column, then `id ASC` as a
    /// tie-break, so pagination is deterministic even when the sort column
    /// has duplicate values.
    pub async fn get_all(
        &self,
        title: &str,
        tags: &[String],
        filters: &Filters,
    ) -> DbResult<(Vec<R>, Metadata)> {
        let column = filters
            .sort_column()
            .ok_or_else(|| DbError::InvalidSort(filters.sort.clone()))?;
        let direction = filters.sort_direction();
        let match_query = fts_match_query(title);

        debug!(
            entity = R::ENTITY,
            title,
            tag_count = tags.len(),
            page = filters.page,
            sort = %filters.sort,
            "listing rows"
        );

        let sql = list_sql(
            R::TABLE,
            R::FTS_TABLE,
            R::DATA_COLUMNS,
            R::TAG_COLUMN,
            match_query.is_some(),
            tags.len(),
            column,
            direction.as_sql(),
        );

        let mut query = sqlx::query(&sql);
        if let Some(match_query) = match_query {
            query = query.bind(match_query);
        }
        for tag in tags {
            query = query.bind(tag.clone());
        }
        query = query.bind(filters.limit()).bind(filters.offset());

        let rows = timeout(QUERY_TIMEOUT, query.fetch_all(&self.pool))
            .await
            .map_err(|_| DbError::Timeout)??;

        let total_records: i64 = match rows.first() {
            Some(row) => row.try_get("total_records")?,
            None => 0,
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(R::from_row(row)?);
        }

        let metadata = Metadata::calculate(total_records, filters.page, filters.page_size);
        Ok((items, metadata))
    }
}

// =============================================================================
// SQL Assembly
// =============================================================================
// Table and column names here are compile-time constants from the Record
// trait plus the safelist-resolved sort column - never raw caller input.
// Every caller-supplied value is bound as a parameter.

fn select_columns(data_columns: &[&str]) -> String {
    format!("id, created_at, {}, version", data_columns.join(", "))
}

fn insert_sql(table: &str, data_columns: &[&str]) -> String {
    let placeholders = vec!["?"; data_columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING id, created_at, version",
        table,
        data_columns.join(", "),
        placeholders,
    )
}

fn update_sql(table: &str, data_columns: &[&str]) -> String {
    let assignments = data_columns
        .iter()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {table} SET {assignments}, version = version + 1 \
         WHERE id = ? AND version = ? RETURNING version",
    )
}

#[allow(clippy::too_many_arguments)]
fn list_sql(
    table: &str,
    fts_table: &str,
    data_columns: &[&str],
    tag_column: &str,
    with_title: bool,
    tag_count: usize,
    sort_column: &str,
    sort_direction: &str,
) -> String {
    let mut sql = format!(
        "SELECT COUNT(*) OVER () AS total_records, {} FROM {}",
        select_columns(data_columns),
        table,
    );

    let mut clauses = Vec::new();
    if with_title {
        clauses.push(format!(
            "id IN (SELECT rowid FROM {fts_table} WHERE {fts_table} MATCH ?)",
        ));
    }
    for _ in 0..tag_count {
        clauses.push(format!(
            "EXISTS (SELECT 1 FROM json_each({tag_column}) WHERE json_each.value = ?)",
        ));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    sql.push_str(&format!(
        " ORDER BY {sort_column} {sort_direction}, id ASC LIMIT ? OFFSET ?",
    ));
    sql
}

/// Builds an FTS5 MATCH expression that requires every query token.
///
/// The input is split on non-alphanumeric boundaries and each token is
/// double-quoted, which both neutralizes FTS5 operator syntax in hostile
/// input and gives "contains all tokens" semantics (adjacent quoted terms
/// are AND-ed). A query with no tokens means "no filter".
fn fts_match_query(input: &str) -> Option<String> {
    let tokens: Vec<&str> = input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.is_empty() {
        return None;
    }

    Some(
        tokens
            .iter()
            .map(|token| format!("\"{token}\""))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
