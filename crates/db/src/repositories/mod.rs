//! Repository layer.
//!
//! Each repository is a cheap-to-clone handle over a shared
//! [`Store`](crate::store::Store) instance for one record type, adding the
//! typed lookups the authentication flow needs.

pub mod session_repo;
pub mod user_repo;

pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
