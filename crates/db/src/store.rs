//! The storage-access abstraction, parameterized over record type.

use async_trait::async_trait;

use crate::record::{Filter, Record};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write would duplicate a unique value among live rows.
    #[error("Duplicate value violates unique constraint: {0}")]
    Conflict(String),
}

/// Create/find/update/soft-delete over one record type.
///
/// Soft-deleted rows are invisible: reads skip them, updates and deletes
/// leave them untouched. Each call is atomic for the rows it touches.
#[async_trait]
pub trait Store<R: Record>: Send + Sync {
    async fn create(&self, input: R::Create) -> Result<R, StoreError>;

    async fn find_by_id(&self, id: R::Id) -> Result<Option<R>, StoreError>;

    async fn find_one(&self, filter: Filter<'_>) -> Result<Option<R>, StoreError>;

    /// Live rows matching `filter`, newest first.
    async fn list(&self, filter: Filter<'_>) -> Result<Vec<R>, StoreError>;

    /// Patch a live row. Returns `None` if it does not exist or was deleted.
    async fn update(&self, id: R::Id, input: R::Update) -> Result<Option<R>, StoreError>;

    /// Returns `true` if a live row was deleted by this call.
    async fn soft_delete(&self, id: R::Id) -> Result<bool, StoreError>;

    /// Soft-delete every live row matching `filter` except `except`.
    /// Returns the number of rows deleted.
    async fn soft_delete_where(
        &self,
        filter: Filter<'_>,
        except: Option<R::Id>,
    ) -> Result<u64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
