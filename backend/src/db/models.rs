//! Database models

use serde::{Deserialize, Serialize};

/// User record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Verify a plaintext password against the stored bcrypt hash.
    ///
    /// A malformed or empty hash never verifies.
    pub fn check_password(&self, password: &str) -> bool {
        crate::auth::password::verify_password(password, &self.password_hash).unwrap_or(false)
    }
}

/// Opaque API token bound to exactly one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub key: String,
    pub user_id: String,
    pub created_at: String,
}
