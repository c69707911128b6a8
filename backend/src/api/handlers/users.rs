use crate::api::models::{CreateUserRequest, UpdateProfileRequest, UserResponse};
use crate::auth::middleware::AuthUser;
use crate::core::error::{Result, RosterError};
use crate::core::services::UserExtra;
use crate::core::validation::{normalize_email, validate_email, validate_name, validate_password};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use super::AppState;

/// Handler for POST /api/user/create/ - Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;

    let email = normalize_email(req.email.as_deref().unwrap_or_default());
    validate_email(&email)?;

    let password = req
        .password
        .ok_or_else(|| RosterError::ValidationError("password is required".to_string()))?;
    validate_password(&password, state.user_service.password_min_length())?;

    let name = req.name.unwrap_or_default();
    validate_name(&name)?;

    let user = state
        .user_service
        .create_user(
            &email,
            &password,
            UserExtra {
                name: Some(name),
                ..UserExtra::default()
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Handler for GET /api/user/me/ - Current user's profile
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserResponse>> {
    let user = state.user_service.get_by_id(&user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Handler for PATCH /api/user/me/ - Partial profile update
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(req) = payload?;

    tracing::info!(user_id = %user.id, "Updating current user profile");

    let updated = state
        .user_service
        .update_profile(&user.id, req.into())
        .await?;

    Ok(Json(UserResponse::from(updated)))
}
