//! Role and status reference values.
//!
//! These must match the seed data in `crates/db/migrations/20260301000001_create_reference_tables.sql`.
//! Both sets are closed: rows are seeded once and never created at runtime.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Coarse-grained endpoint access level.
///
/// There is no hierarchy: `Admin` does not satisfy a `User`-only route unless
/// the route lists both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub const fn id(self) -> DbId {
        match self {
            Role::Admin => 1,
            Role::User => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn from_id(id: DbId) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::User),
            _ => None,
        }
    }
}

/// Account status. Inactive accounts cannot log in or use existing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub const fn id(self) -> DbId {
        match self {
            Status::Active => 1,
            Status::Inactive => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }

    pub fn from_id(id: DbId) -> Option<Self> {
        match id {
            1 => Some(Status::Active),
            2 => Some(Status::Inactive),
            _ => None,
        }
    }
}

/// Decide whether a caller with `role_id` may use a route declaring `allowed`.
///
/// An empty declaration means the route only needs an authenticated caller.
pub fn role_permitted(allowed: &[Role], role_id: DbId) -> bool {
    allowed.is_empty() || allowed.iter().any(|role| role.id() == role_id)
}
