//! Authentication module
//!
//! This module provides authentication functionality including:
//! - Token issuance for email/password credentials
//! - Opaque API token generation and header parsing
//! - Password hashing and verification
//! - Authentication middleware

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod token;

pub use handlers::create_token;
pub use middleware::{authenticate, AuthUser};
pub use password::{hash_password, verify_password};
pub use token::{generate_key, parse_authorization};
