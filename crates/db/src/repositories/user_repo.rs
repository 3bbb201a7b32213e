//! Repository for the `users` table.

use std::sync::Arc;

use myorder_core::email::normalize_email;
use myorder_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User};
use crate::record::FieldValue;
use crate::store::{Store, StoreError};

/// Provides CRUD operations for users.
///
/// Emails are normalized on every write and lookup, so callers may pass them
/// as typed by the user.
#[derive(Clone)]
pub struct UserRepo {
    store: Arc<dyn Store<User>>,
}

impl UserRepo {
    pub fn new(store: Arc<dyn Store<User>>) -> Self {
        Self { store }
    }

    /// Insert a new user, returning the created row.
    pub async fn create(&self, mut input: CreateUser) -> Result<User, StoreError> {
        input.email = input.email.as_deref().map(normalize_email);
        self.store.create(input).await
    }

    /// Find a live (not soft-deleted) user by internal ID.
    pub async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        self.store.find_by_id(id).await
    }

    /// Find a live user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.store
            .find_one(&[("email", FieldValue::Text(normalize_email(email)))])
            .await
    }

    /// Find a live user bound to a social provider identity.
    pub async fn find_by_social(
        &self,
        provider: &str,
        social_id: &str,
    ) -> Result<Option<User>, StoreError> {
        self.store
            .find_one(&[
                ("provider", FieldValue::from(provider)),
                ("social_id", FieldValue::from(social_id)),
            ])
            .await
    }

    /// List all live users, most recently created first.
    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.store.list(&[]).await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(&self, id: DbId, mut input: UpdateUser) -> Result<Option<User>, StoreError> {
        input.email = input.email.as_deref().map(normalize_email);
        self.store.update(id, input).await
    }

    /// Soft-delete a user. Returns `true` if a live row was deleted.
    pub async fn soft_delete(&self, id: DbId) -> Result<bool, StoreError> {
        self.store.soft_delete(id).await
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }
}
