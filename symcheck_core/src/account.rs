//! User registration, credential checks and login sessions.

use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::AccountError;
use crate::repository::{SessionRepo, UserRepo};
use crate::types::{LoginSession, User};

pub const MIN_PASSWORD_LEN: usize = 6;

#[allow(clippy::expect_used)]
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,32}$").expect("valid username pattern"));

#[allow(clippy::expect_used)]
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email pattern"));

pub fn validate_username(username: &str) -> Result<(), AccountError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(AccountError::InvalidUsername)
    }
}

pub fn validate_email(email: &str) -> Result<(), AccountError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AccountError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(AccountError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        })
    }
}

/// Hex SHA-256 of `salt:password`.
#[must_use]
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[must_use]
pub fn verify_password(user: &User, password: &str) -> bool {
    hash_password(&user.salt, password) == user.password_hash
}

/// Registration and login over user and session repositories.
pub struct AccountService {
    users: Arc<dyn UserRepo>,
    sessions: Arc<dyn SessionRepo>,
    session_ttl: Duration,
}

impl AccountService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepo>,
        sessions: Arc<dyn SessionRepo>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            session_ttl,
        }
    }

    /// Create a new account.
    ///
    /// # Errors
    /// [`AccountError`] (wrapped in `anyhow`) for invalid input or a taken
    /// username; storage errors otherwise.
    pub async fn register(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
    ) -> anyhow::Result<User> {
        let username = username.trim();
        validate_username(username)?;
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        if let Some(email) = email {
            validate_email(email)?;
        }
        validate_password(password)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AccountError::UsernameTaken(username.to_string()).into());
        }

        let salt = Uuid::new_v4().simple().to_string();
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: email.map(ToString::to_string),
            password_hash: hash_password(&salt, password),
            salt,
            created_at: Utc::now(),
        };
        self.users.insert(&user).await?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Check credentials and open a session.
    pub async fn login(&self, username: &str, password: &str) -> anyhow::Result<LoginSession> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .filter(|u| verify_password(u, password))
            .ok_or(AccountError::InvalidCredentials)?;

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.session_ttl)
            .ok_or_else(|| {
                anyhow::anyhow!("session lifetime {} is out of range", self.session_ttl)
            })?;
        let purged = self.sessions.delete_expired(now).await?;

        let session = LoginSession {
            id: Uuid::now_v7(),
            user_id: user.id,
            created_at: now,
            expires_at,
        };
        self.sessions.insert(&session).await?;

        info!(
            "User {} logged in (purged {purged} expired sessions)",
            user.username
        );
        Ok(session)
    }

    pub async fn logout(&self, token: &Uuid) -> anyhow::Result<()> {
        self.sessions.delete(token).await
    }

    /// Resolve the user behind a session token.
    ///
    /// Expired sessions are deleted and reported as [`AccountError::NotLoggedIn`].
    pub async fn current_user(&self, token: &Uuid) -> anyhow::Result<User> {
        let session = self
            .sessions
            .find(token)
            .await?
            .ok_or(AccountError::NotLoggedIn)?;

        if session.is_expired(Utc::now()) {
            self.sessions.delete(&session.id).await?;
            return Err(AccountError::NotLoggedIn.into());
        }

        let user = self
            .users
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AccountError::NotLoggedIn)?;
        Ok(user)
    }
}
