//! Domain primitives shared by the storage and HTTP crates.
//!
//! Nothing here touches the database or the network.

pub mod email;
pub mod error;
pub mod roles;
pub mod types;
