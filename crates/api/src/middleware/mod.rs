//! Request guards implemented as Axum extractors.
//!
//! - [`auth`] -- bearer token validation and current-user resolution.
//! - [`rbac`] -- role checks layered on the current user.
//! - [`service_key`] -- static API key for machine-to-machine routes.

pub mod auth;
pub mod rbac;
pub mod service_key;
