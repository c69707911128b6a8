//! Database module
//!
//! This module provides database management functionality including:
//! - Database connection pool management
//! - Availability probing at startup
//! - Repository pattern implementations
//! - Database migrations
//! - Data models and schemas

pub mod manager;
pub mod migrations;
pub mod models;
pub mod probe;
pub mod repository;

pub use manager::DatabaseManager;
pub use models::{AuthToken, User};
pub use probe::wait_for_db;
pub use repository::{Repository, TokenRepository, UserRepository};
