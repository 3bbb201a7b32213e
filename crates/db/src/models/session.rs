//! Login session model and DTOs.

use myorder_core::types::{DbId, SessionId, Timestamp};
use sqlx::FromRow;

use crate::record::{FieldValue, PgQueryAs, Record, Timestamps};

/// A session row from the `sessions` table: one authenticated login.
///
/// Refresh tokens embed the session id; a refresh is honoured only while this
/// row is live, which makes deleting it the revocation mechanism.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: SessionId,
    pub user_id: DbId,
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

/// DTO for creating a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: DbId,
}

/// Patch that only bumps `updated_at`; used to mark a refresh.
#[derive(Debug, Clone, Default)]
pub struct TouchSession;

impl Record for Session {
    type Id = SessionId;
    type Create = CreateSession;
    type Update = TouchSession;

    const TABLE: &'static str = "sessions";
    const ENTITY: &'static str = "Session";
    const COLUMNS: &'static str = "id, user_id, created_at, updated_at, deleted_at";
    const INSERT_COLUMNS: &'static [&'static str] = &["user_id"];
    const UPDATE_COLUMNS: &'static [&'static str] = &[];

    fn id(&self) -> SessionId {
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
            "user_id" => Some(self.user_id.into()),
            _ => None,
        }
    }

    fn bind_create<'q>(query: PgQueryAs<'q, Self>, input: &CreateSession) -> PgQueryAs<'q, Self> {
        query.bind(input.user_id)
    }

    fn bind_update<'q>(query: PgQueryAs<'q, Self>, _input: &TouchSession) -> PgQueryAs<'q, Self> {
        query
    }

    fn from_create(id: SessionId, input: CreateSession, now: Timestamp) -> Self {
        Self {
            id,
            user_id: input.user_id,
            timestamps: Timestamps::new(now),
        }
    }

    fn apply_update(&mut self, _input: TouchSession) {}
}
