//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::auth::models::{TokenRequest, TokenResponse};
use crate::core::error::{Result, RosterError};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

/// Handler for POST /api/user/token/ - Exchange credentials for an API token
pub async fn create_token(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(req) = payload?;

    let email = req
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| RosterError::ValidationError("email is required".to_string()))?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| RosterError::ValidationError("password is required".to_string()))?;

    let token = state.user_service.issue_token(&email, &password).await?;

    Ok(Json(TokenResponse { token: token.key }))
}
