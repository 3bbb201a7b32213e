//! Repository for the `sessions` table.

use std::sync::Arc;

use myorder_core::types::{DbId, SessionId};

use crate::models::session::{CreateSession, Session, TouchSession};
use crate::record::FieldValue;
use crate::store::{Store, StoreError};

/// Session store: one row per login, revoked by soft deletion.
///
/// A user may hold any number of concurrent sessions (one per device).
#[derive(Clone)]
pub struct SessionRepo {
    store: Arc<dyn Store<Session>>,
}

impl SessionRepo {
    pub fn new(store: Arc<dyn Store<Session>>) -> Self {
        Self { store }
    }

    /// Start a new session for `user_id`.
    pub async fn create(&self, user_id: DbId) -> Result<Session, StoreError> {
        self.store.create(CreateSession { user_id }).await
    }

    /// Find a live session.
    pub async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, StoreError> {
        self.store.find_by_id(id).await
    }

    /// Atomically bump `updated_at` on a live session.
    ///
    /// Returns `None` if the session was deleted, including by a delete that
    /// committed while this call waited on the row.
    pub async fn touch(&self, id: SessionId) -> Result<Option<Session>, StoreError> {
        self.store.update(id, TouchSession).await
    }

    /// End one session. Returns `true` if it was still live.
    pub async fn delete_by_id(&self, id: SessionId) -> Result<bool, StoreError> {
        self.store.soft_delete(id).await
    }

    /// End every live session of `user_id` except `keep`.
    ///
    /// With `keep = None` the user is signed out everywhere. Returns the
    /// number of sessions ended.
    pub async fn delete_all_for_user_except(
        &self,
        user_id: DbId,
        keep: Option<SessionId>,
    ) -> Result<u64, StoreError> {
        let count = self
            .store
            .soft_delete_where(&[("user_id", FieldValue::Int(user_id))], keep)
            .await?;
        tracing::debug!(user_id, ?keep, count, "Deleted sessions");
        Ok(count)
    }

    /// Live sessions of `user_id`, newest first.
    pub async fn list_for_user(&self, user_id: DbId) -> Result<Vec<Session>, StoreError> {
        self.store
            .list(&[("user_id", FieldValue::Int(user_id))])
            .await
    }
}
