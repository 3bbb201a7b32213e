//! User entity model and DTOs.

use myorder_core::roles::{Role, Status};
use myorder_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::record::{FieldValue, PgQueryAs, Record, Timestamps};

/// `provider` value for accounts created with email and password.
pub const PROVIDER_EMAIL: &str = "email";

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    /// Lower-cased; `None` for social accounts whose provider withheld it.
    pub email: Option<String>,
    /// `None` for social-only accounts.
    pub password_hash: Option<String>,
    /// `"email"`, `"apple"` or `"google"`.
    pub provider: String,
    /// The provider's stable subject id for social accounts.
    pub social_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: DbId,
    pub status_id: DbId,
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status_id == Status::Active.id()
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: Option<String>,
    pub provider: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Resolved role name (e.g. `"admin"`, `"user"`).
    pub role: String,
    pub role_id: DbId,
    /// Resolved status name (`"active"` or `"inactive"`).
    pub status: String,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            provider: user.provider.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: Role::from_id(user.role_id)
                .map_or("unknown", Role::name)
                .to_string(),
            role_id: user.role_id,
            status: Status::from_id(user.status_id)
                .map_or("unknown", Status::name)
                .to_string(),
            created_at: user.timestamps.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub provider: String,
    pub social_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: DbId,
    pub status_id: DbId,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub provider: Option<String>,
    pub social_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: Option<DbId>,
    pub status_id: Option<DbId>,
}

impl Record for User {
    type Id = DbId;
    type Create = CreateUser;
    type Update = UpdateUser;

    const TABLE: &'static str = "users";
    const ENTITY: &'static str = "User";
    const COLUMNS: &'static str = "id, email, password_hash, provider, social_id, first_name, \
                                   last_name, role_id, status_id, created_at, updated_at, deleted_at";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "email",
        "password_hash",
        "provider",
        "social_id",
        "first_name",
        "last_name",
        "role_id",
        "status_id",
    ];
    const UPDATE_COLUMNS: &'static [&'static str] = Self::INSERT_COLUMNS;
    const UNIQUE: &'static [&'static [&'static str]] = &[&["email"], &["provider", "social_id"]];

    fn id(&self) -> DbId {
        self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "id" => Some(self.id.into()),
            "email" => self.email.clone().map(FieldValue::from),
            "provider" => Some(self.provider.clone().into()),
            "social_id" => self.social_id.clone().map(FieldValue::from),
            "role_id" => Some(self.role_id.into()),
            "status_id" => Some(self.status_id.into()),
            _ => None,
        }
    }

    fn bind_create<'q>(query: PgQueryAs<'q, Self>, input: &CreateUser) -> PgQueryAs<'q, Self> {
        query
            .bind(input.email.clone())
            .bind(input.password_hash.clone())
            .bind(input.provider.clone())
            .bind(input.social_id.clone())
            .bind(input.first_name.clone())
            .bind(input.last_name.clone())
            .bind(input.role_id)
            .bind(input.status_id)
    }

    fn bind_update<'q>(query: PgQueryAs<'q, Self>, input: &UpdateUser) -> PgQueryAs<'q, Self> {
        query
            .bind(input.email.clone())
            .bind(input.password_hash.clone())
            .bind(input.provider.clone())
            .bind(input.social_id.clone())
            .bind(input.first_name.clone())
            .bind(input.last_name.clone())
            .bind(input.role_id)
            .bind(input.status_id)
    }

    fn from_create(id: DbId, input: CreateUser, now: Timestamp) -> Self {
        Self {
            id,
            email: input.email,
            password_hash: input.password_hash,
            provider: input.provider,
            social_id: input.social_id,
            first_name: input.first_name,
            last_name: input.last_name,
            role_id: input.role_id,
            status_id: input.status_id,
            timestamps: Timestamps::new(now),
        }
    }

    fn apply_update(&mut self, input: UpdateUser) {
        if let Some(email) = input.email {
            self.email = Some(email);
        }
        if let Some(hash) = input.password_hash {
            self.password_hash = Some(hash);
        }
        if let Some(provider) = input.provider {
            self.provider = provider;
        }
        if let Some(social_id) = input.social_id {
            self.social_id = Some(social_id);
        }
        if let Some(first_name) = input.first_name {
            self.first_name = Some(first_name);
        }
        if let Some(last_name) = input.last_name {
            self.last_name = Some(last_name);
        }
        if let Some(role_id) = input.role_id {
            self.role_id = role_id;
        }
        if let Some(status_id) = input.status_id {
            self.status_id = status_id;
        }
    }
}
