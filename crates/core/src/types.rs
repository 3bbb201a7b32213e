/// User, role and status primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Sessions are keyed by an opaque UUID so ids cannot be enumerated.
pub type SessionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
