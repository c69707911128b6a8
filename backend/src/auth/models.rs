//! Authentication request/response models

use serde::{Deserialize, Serialize};

/// Token request. Fields are optional so a missing one becomes a
/// validation error rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
