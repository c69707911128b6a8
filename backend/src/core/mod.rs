//! Core application layer
//!
//! This module provides:
//! - The user service (creation, credential checks, profile updates)
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system
//! - Field validation

pub mod config;
pub mod error;
pub mod logging;
pub mod services;
pub mod validation;

pub use config::Config;
pub use error::{ErrorResponse, Result, RosterError};
pub use logging::Logger;
pub use services::{ProfileChanges, UserExtra, UserService};
