//! Repository pattern implementation for data access layer
//!
//! This module provides the Repository pattern for abstracting database operations.

use crate::core::error::{Result, RosterError};
use crate::db::manager::DatabaseManager;
use crate::db::models::{AuthToken, User};
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

/// Generic repository trait for entity persistence
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Find an entity by its ID
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<()>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<()>;
}

const USER_COLUMNS: &str = "id, email, name, password_hash, is_active, is_staff, is_superuser, \
                            last_login, created_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        is_active: row.get(4)?,
        is_staff: row.get(5)?,
        is_superuser: row.get(6)?,
        last_login: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Repository for User entities
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find a user by email. Callers pass an already normalized address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                    [&email],
                    user_from_row,
                )
                .optional()
                .map_err(RosterError::DatabaseError)
            })
            .await
    }

    /// Record a successful login
    pub async fn touch_last_login(&self, user_id: &str, at: &str) -> Result<()> {
        let user_id = user_id.to_string();
        let at = at.to_string();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "UPDATE users SET last_login = ? WHERE id = ?",
                    params![at, user_id],
                )?;
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl Repository<User> for UserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                    [&id],
                    user_from_row,
                )
                .optional()
                .map_err(RosterError::DatabaseError)
            })
            .await
    }

    async fn create(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    &format!(
                        "INSERT INTO users ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                        USER_COLUMNS
                    ),
                    params![
                        user.id,
                        user.email,
                        user.name,
                        user.password_hash,
                        user.is_active,
                        user.is_staff,
                        user.is_superuser,
                        user.last_login,
                        user.created_at,
                        user.updated_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    async fn update(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                let changed = conn.execute(
                    "UPDATE users SET email = ?, name = ?, password_hash = ?, is_active = ?, \
                     is_staff = ?, is_superuser = ?, last_login = ?, updated_at = ? WHERE id = ?",
                    params![
                        user.email,
                        user.name,
                        user.password_hash,
                        user.is_active,
                        user.is_staff,
                        user.is_superuser,
                        user.last_login,
                        user.updated_at,
                        user.id,
                    ],
                )?;
                if changed == 0 {
                    return Err(RosterError::NotFound(format!("User {} not found", user.id)));
                }
                Ok(())
            })
            .await
    }
}

/// Repository for API tokens
pub struct TokenRepository {
    db: Arc<DatabaseManager>,
}

impl TokenRepository {
    /// Create a new TokenRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Look up a token by its key
    pub async fn find_by_key(&self, key: &str) -> Result<Option<AuthToken>> {
        let key = key.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT key, user_id, created_at FROM auth_tokens WHERE key = ?",
                    [&key],
                    |row| {
                        Ok(AuthToken {
                            key: row.get(0)?,
                            user_id: row.get(1)?,
                            created_at: row.get(2)?,
                        })
                    },
                )
                .optional()
                .map_err(RosterError::DatabaseError)
            })
            .await
    }

    /// Return the user's token, creating one with `new_key` if none exists.
    ///
    /// Runs in a single transaction so concurrent logins for the same user
    /// end up sharing one token.
    pub async fn get_or_create(&self, user_id: &str, new_key: String) -> Result<AuthToken> {
        let user_id = user_id.to_string();
        self.db
            .transaction(move |tx| {
                let existing = tx
                    .query_row(
                        "SELECT key, user_id, created_at FROM auth_tokens WHERE user_id = ?",
                        [&user_id],
                        |row| {
                            Ok(AuthToken {
                                key: row.get(0)?,
                                user_id: row.get(1)?,
                                created_at: row.get(2)?,
                            })
                        },
                    )
                    .optional()?;

                if let Some(token) = existing {
                    return Ok(token);
                }

                let token = AuthToken {
                    key: new_key,
                    user_id,
                    created_at: chrono::Utc::now().to_rfc3339(),
                };
                tx.execute(
                    "INSERT INTO auth_tokens (key, user_id, created_at) VALUES (?, ?, ?)",
                    params![token.key, token.user_id, token.created_at],
                )?;
                Ok(token)
            })
            .await
    }
}
