//! Field validation and normalization for user records

use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::core::error::{Result, RosterError};
use lazy_static::lazy_static;
use regex::Regex;

/// Longest accepted display name, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Longest accepted email address (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"
    )
    .expect("email regex is valid");
}

/// Canonical form used for storage and lookup: trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check that `email` has the shape of an address. Expects normalized input.
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(RosterError::ValidationError("email is required".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(email) {
        return Err(RosterError::ValidationError(
            "Enter a valid email address".to_string(),
        ));
    }

    Ok(())
}

/// Enforce the minimum password length, counted in characters, and the
/// bcrypt input limit, counted in bytes
pub fn validate_password(password: &str, min_length: usize) -> Result<()> {
    if password.chars().count() < min_length {
        return Err(RosterError::ValidationError(format!(
            "password must be at least {} characters",
            min_length
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(RosterError::ValidationError(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(RosterError::ValidationError(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}
