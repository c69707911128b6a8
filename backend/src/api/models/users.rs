use serde::{Deserialize, Serialize};

// User API models

/// Request body for POST /api/user/create/
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Request body for PATCH /api/user/me/. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<crate::db::models::User> for UserResponse {
    fn from(user: crate::db::models::User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

impl From<UpdateProfileRequest> for crate::core::services::ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}
