//! Roster Backend Library
//!
//! This library provides the user account service: email-identified users,
//! token authentication, the `/api/user` REST endpoints and database
//! availability probing.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use api::ApiServer;
pub use crate::core::{Config, RosterError, UserService};
pub use db::{wait_for_db, DatabaseManager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
