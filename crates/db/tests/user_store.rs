//! Integration tests for the user repository.
//!
//! Exercises [`UserRepo`] over the in-memory store to verify email
//! normalization, social identity lookup, uniqueness among live rows, and
//! soft-delete visibility.

use std::sync::Arc;

use assert_matches::assert_matches;
use myorder_core::roles::{Role, Status};
use myorder_db::models::user::{CreateUser, UpdateUser, User, PROVIDER_EMAIL};
use myorder_db::repositories::UserRepo;
use myorder_db::{MemoryStore, StoreError};

fn repo() -> UserRepo {
    UserRepo::new(Arc::new(MemoryStore::<User>::new()))
}

fn email_user(email: &str) -> CreateUser {
    CreateUser {
        email: Some(email.to_string()),
        password_hash: Some("$argon2id$stub".to_string()),
        provider: PROVIDER_EMAIL.to_string(),
        social_id: None,
        first_name: Some("Test".to_string()),
        last_name: Some("User".to_string()),
        role_id: Role::User.id(),
        status_id: Status::Active.id(),
    }
}

fn social_user(provider: &str, social_id: &str) -> CreateUser {
    CreateUser {
        email: None,
        password_hash: None,
        provider: provider.to_string(),
        social_id: Some(social_id.to_string()),
        first_name: None,
        last_name: None,
        role_id: Role::User.id(),
        status_id: Status::Active.id(),
    }
}

#[tokio::test]
async fn email_is_stored_lowercase() {
    let users = repo();
    let user = users.create(email_user("  Mixed@Case.IO ")).await.unwrap();
    assert_eq!(user.email.as_deref(), Some("mixed@case.io"));
}

#[tokio::test]
async fn lookup_by_email_ignores_case() {
    let users = repo();
    let created = users.create(email_user("owner@shop.io")).await.unwrap();

    let found = users.find_by_email("OWNER@Shop.io").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
}

#[tokio::test]
async fn duplicate_email_conflicts_regardless_of_case() {
    let users = repo();
    users.create(email_user("owner@shop.io")).await.unwrap();

    let result = users.create(email_user("Owner@Shop.io")).await;
    assert_matches!(result, Err(StoreError::Conflict(c)) if c == "uq_users_email");
}

#[tokio::test]
async fn social_identity_lookup_is_per_provider() {
    let users = repo();
    let apple = users.create(social_user("apple", "001.abc")).await.unwrap();
    users.create(social_user("google", "001.abc")).await.unwrap();

    let found = users.find_by_social("apple", "001.abc").await.unwrap().unwrap();
    assert_eq!(found.id, apple.id);
    assert!(users.find_by_social("apple", "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn users_without_email_do_not_clash() {
    let users = repo();
    users.create(social_user("apple", "a")).await.unwrap();
    let second = users.create(social_user("apple", "b")).await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn update_normalizes_email() {
    let users = repo();
    let user = users.create(email_user("old@shop.io")).await.unwrap();

    let patch = UpdateUser {
        email: Some("New@Shop.IO".to_string()),
        ..Default::default()
    };
    let updated = users.update(user.id, patch).await.unwrap().unwrap();
    assert_eq!(updated.email.as_deref(), Some("new@shop.io"));
}

#[tokio::test]
async fn soft_deleted_user_is_not_found() {
    let users = repo();
    let user = users.create(email_user("bye@shop.io")).await.unwrap();

    assert!(users.soft_delete(user.id).await.unwrap());
    assert!(users.find_by_id(user.id).await.unwrap().is_none());
    assert!(users.find_by_email("bye@shop.io").await.unwrap().is_none());
    assert!(users.list().await.unwrap().is_empty());
}
