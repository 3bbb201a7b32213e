//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access/refresh token issuance and validation.
//! - [`api_key`] -- static key check for machine-to-machine routes.
//! - [`social`] -- Apple and Google identity token verification.
//! - [`service`] -- the login, refresh and logout lifecycle.

pub mod api_key;
pub mod error;
pub mod jwt;
pub mod password;
pub mod service;
pub mod social;

pub use error::{AuthError, AuthResult};
pub use service::AuthService;
