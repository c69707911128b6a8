//! Password hashing and verification using bcrypt

use crate::core::error::{Result, RosterError};

/// bcrypt only reads this many bytes of input; anything past it is ignored
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password using bcrypt at the given cost.
///
/// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused rather than
/// truncated.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(RosterError::ValidationError(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| RosterError::InitializationError(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a hash. Over-long input never matches.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }

    bcrypt::verify(password, hash)
        .map_err(|e| RosterError::AuthenticationError(format!("Failed to verify password: {}", e)))
}
