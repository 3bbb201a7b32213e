//! The storage record capability.
//!
//! A [`Record`] describes how one entity maps onto a table: its column lists,
//! which columns may be inserted or patched, which column groups must be
//! unique among live rows, and how to bind its DTOs onto a `sqlx` query.
//! Common bookkeeping columns live in [`Timestamps`], which every record
//! embeds instead of inheriting from a base entity.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use myorder_core::types::{DbId, Timestamp};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, Postgres};
use uuid::Uuid;

/// A `query_as` builder over PostgreSQL producing `R`.
pub type PgQueryAs<'q, R> = sqlx::query::QueryAs<'q, Postgres, R, PgArguments>;

/// An equality filter: `(column, value)` pairs joined with `AND`.
///
/// Column names always come from `'static` constants, never from user input.
pub type Filter<'a> = &'a [(&'static str, FieldValue)];

/// A column value used in filters and uniqueness checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Uuid(Uuid),
    Text(String),
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Creation, modification and soft-deletion times shared by every record.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Timestamps {
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Timestamps {
    pub fn new(now: Timestamp) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Primary key types a record may use.
pub trait RecordId:
    Copy
    + Eq
    + Ord
    + Hash
    + Debug
    + Display
    + Send
    + Sync
    + Unpin
    + Into<FieldValue>
    + sqlx::Type<Postgres>
    + for<'q> sqlx::Encode<'q, Postgres>
    + 'static
{
    /// Id for the `seq`-th row created by an in-memory store.
    fn generate(seq: i64) -> Self;
}

impl RecordId for DbId {
    fn generate(seq: i64) -> Self {
        seq
    }
}

impl RecordId for Uuid {
    fn generate(_seq: i64) -> Self {
        Uuid::now_v7()
    }
}

/// A persisted entity.
pub trait Record:
    Clone + Debug + Send + Sync + Unpin + for<'r> FromRow<'r, PgRow> + 'static
{
    type Id: RecordId;
    /// Insert DTO.
    type Create: Send + Sync + 'static;
    /// Patch DTO. `None` fields leave the stored value untouched.
    type Update: Send + Sync + 'static;

    const TABLE: &'static str;
    /// Human-readable entity name for error messages.
    const ENTITY: &'static str;
    /// Full select list, in [`FromRow`] order.
    const COLUMNS: &'static str;
    /// Columns bound by [`Record::bind_create`], in bind order.
    const INSERT_COLUMNS: &'static [&'static str];
    /// Columns bound by [`Record::bind_update`], in bind order.
    const UPDATE_COLUMNS: &'static [&'static str];
    /// Column groups that must be unique among non-deleted rows.
    const UNIQUE: &'static [&'static [&'static str]] = &[];

    fn id(&self) -> Self::Id;
    fn timestamps(&self) -> &Timestamps;
    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// Value of `column`, or `None` when it is NULL or not filterable.
    fn field(&self, column: &str) -> Option<FieldValue>;

    fn bind_create<'q>(query: PgQueryAs<'q, Self>, input: &Self::Create) -> PgQueryAs<'q, Self>;
    fn bind_update<'q>(query: PgQueryAs<'q, Self>, input: &Self::Update) -> PgQueryAs<'q, Self>;

    /// Build a fresh row the way the database defaults would.
    fn from_create(id: Self::Id, input: Self::Create, now: Timestamp) -> Self;
    /// Apply the non-`None` fields of a patch.
    fn apply_update(&mut self, input: Self::Update);

    fn is_deleted(&self) -> bool {
        self.timestamps().deleted_at.is_some()
    }

    fn matches(&self, filter: Filter<'_>) -> bool {
        filter
            .iter()
            .all(|(column, value)| self.field(column).as_ref() == Some(value))
    }
}

/// Name of the partial unique index guarding `group` on `table`.
///
/// Migrations name their indexes with the same scheme so both backends report
/// identical constraint names.
pub fn unique_constraint_name(table: &str, group: &[&str]) -> String {
    format!("uq_{table}_{}", group.join("_"))
}
