//! Business logic services
//!
//! This module implements the Application Layer services that coordinate between
//! the REST API Layer and the Infrastructure Layer (database).

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::generate_key;
use crate::core::error::{Result, RosterError};
use crate::core::validation::{normalize_email, validate_email, validate_name, validate_password};
use crate::db::models::{AuthToken, User};
use crate::db::repository::{Repository, TokenRepository, UserRepository};
use chrono::Utc;
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

/// Message shared by every credential failure so callers cannot tell an
/// unknown email from a wrong password or a disabled account.
pub const INVALID_CREDENTIALS: &str = "Unable to authenticate with provided credentials";

/// Optional attributes for a new user
#[derive(Debug, Clone, Default)]
pub struct UserExtra {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Partial update applied by the profile endpoint
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User service: creation, credential checks and profile updates
pub struct UserService {
    user_repo: Arc<UserRepository>,
    token_repo: Arc<TokenRepository>,
    bcrypt_cost: u32,
    password_min_length: usize,
    // verified against when the email is unknown
    dummy_hash: String,
}

impl UserService {
    /// Create a new UserService
    pub fn new(
        user_repo: Arc<UserRepository>,
        token_repo: Arc<TokenRepository>,
        bcrypt_cost: u32,
        password_min_length: usize,
    ) -> Result<Self> {
        let dummy_hash = hash_password(&generate_key(), bcrypt_cost)?;
        Ok(Self {
            user_repo,
            token_repo,
            bcrypt_cost,
            password_min_length,
            dummy_hash,
        })
    }

    pub fn password_min_length(&self) -> usize {
        self.password_min_length
    }

    /// Create and persist a user.
    ///
    /// The email is normalized before storage and the password stored only as
    /// a bcrypt hash. Password policy is left to callers (the registration
    /// endpoint enforces it); the store only requires a non-empty email.
    pub async fn create_user(&self, email: &str, password: &str, extra: UserExtra) -> Result<User> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(RosterError::ValidationError(
                "Users must have an email address".to_string(),
            ));
        }

        let name = extra.name.unwrap_or_default();
        validate_name(&name)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(duplicate_email());
        }

        let now = Utc::now().to_rfc3339();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            password_hash: self.hash(password).await?,
            is_active: extra.is_active.unwrap_or(true),
            is_staff: extra.is_staff.unwrap_or(false),
            is_superuser: extra.is_superuser.unwrap_or(false),
            last_login: None,
            created_at: now.clone(),
            updated_at: now,
        };

        // The UNIQUE constraint still decides races between concurrent signups
        match self.user_repo.create(&user).await {
            Ok(()) => {}
            Err(e) if e.is_unique_violation() => return Err(duplicate_email()),
            Err(e) => return Err(e),
        }

        tracing::info!(
            user_id = %user.id,
            is_staff = user.is_staff,
            is_superuser = user.is_superuser,
            "User created"
        );
        Ok(user)
    }

    /// Create a user with staff and superuser flags forced on
    pub async fn create_superuser(&self, email: &str, password: &str) -> Result<User> {
        self.create_user(
            email,
            password,
            UserExtra {
                is_staff: Some(true),
                is_superuser: Some(true),
                ..UserExtra::default()
            },
        )
        .await
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<User> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::NotFound(format!("User {} not found", id)))
    }

    /// Get a user by email (normalized before lookup)
    pub async fn get_by_email(&self, email: &str) -> Result<User> {
        let email = normalize_email(email);
        self.user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| RosterError::NotFound("No user with that email".to_string()))
    }

    /// Verify credentials and return the matching active user.
    ///
    /// Every failure is reported as the same validation error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = match self.get_by_email(email).await {
            Ok(user) => user,
            Err(RosterError::NotFound(_)) => {
                verify(password, &self.dummy_hash).await?;
                return Err(invalid_credentials());
            }
            Err(e) => return Err(e),
        };

        if !verify(password, &user.password_hash).await? || !user.is_active {
            return Err(invalid_credentials());
        }

        Ok(user)
    }

    /// Authenticate and return the user's API token, creating it on first login
    pub async fn issue_token(&self, email: &str, password: &str) -> Result<AuthToken> {
        let user = self.authenticate(email, password).await?;
        let token = self.token_repo.get_or_create(&user.id, generate_key()).await?;
        self.user_repo
            .touch_last_login(&user.id, &Utc::now().to_rfc3339())
            .await?;

        tracing::info!(user_id = %user.id, "Token issued");
        Ok(token)
    }

    /// Resolve a token key to its active user
    pub async fn user_for_token(&self, key: &str) -> Result<User> {
        let token = self
            .token_repo
            .find_by_key(key)
            .await?
            .ok_or_else(|| RosterError::AuthenticationError("Invalid token".to_string()))?;

        let user = self
            .user_repo
            .find_by_id(&token.user_id)
            .await?
            .ok_or_else(|| RosterError::AuthenticationError("Invalid token".to_string()))?;

        if !user.is_active {
            return Err(RosterError::AuthenticationError(
                "User inactive or deleted".to_string(),
            ));
        }

        Ok(user)
    }

    /// Apply a partial profile update; only supplied fields change
    pub async fn update_profile(&self, user_id: &str, changes: ProfileChanges) -> Result<User> {
        let mut user = self.get_by_id(user_id).await?;

        if let Some(name) = changes.name {
            validate_name(&name)?;
            user.name = name;
        }

        if let Some(email) = changes.email {
            let email = normalize_email(&email);
            validate_email(&email)?;
            if email != user.email {
                if self.user_repo.find_by_email(&email).await?.is_some() {
                    return Err(duplicate_email());
                }
                user.email = email;
            }
        }

        if let Some(password) = changes.password {
            validate_password(&password, self.password_min_length)?;
            user.password_hash = self.hash(&password).await?;
        }

        user.updated_at = Utc::now().to_rfc3339();

        match self.user_repo.update(&user).await {
            Ok(()) => {}
            Err(e) if e.is_unique_violation() => return Err(duplicate_email()),
            Err(e) => return Err(e),
        }

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    // bcrypt is CPU-bound; keep it off the async workers
    async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| RosterError::TaskError(format!("Password hashing panicked: {}", e)))?
    }
}

/// Verify on the blocking pool. A malformed stored hash counts as a mismatch.
async fn verify(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    task::spawn_blocking(move || verify_password(&password, &hash).unwrap_or(false))
        .await
        .map_err(|e| RosterError::TaskError(format!("Password verification panicked: {}", e)))
}

fn duplicate_email() -> RosterError {
    RosterError::ValidationError("user with this email already exists".to_string())
}

fn invalid_credentials() -> RosterError {
    RosterError::ValidationError(INVALID_CREDENTIALS.to_string())
}
