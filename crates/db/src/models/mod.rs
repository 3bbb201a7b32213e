//! Entity models and DTOs.

pub mod session;
pub mod user;
