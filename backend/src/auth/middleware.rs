//! Authentication middleware

use crate::api::handlers::AppState;
use crate::auth::token::parse_authorization;
use crate::core::error::{Result, RosterError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Extension to store authenticated user info in request
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Authentication middleware
///
/// Resolves the `Authorization` token to an active user and stores it in the
/// request extensions. Anything else is answered with 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let key = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_authorization)
        .map(str::to_string);

    let key = match key {
        Some(k) => k,
        None => {
            return RosterError::AuthenticationError(
                "Authentication credentials were not provided".to_string(),
            )
            .into_response();
        }
    };

    let user = match state.user_service.user_for_token(&key).await {
        Ok(u) => u,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
    });

    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = RosterError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| RosterError::AuthenticationError("User not authenticated".to_string()))
    }
}
