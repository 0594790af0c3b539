pub mod jwt;
pub mod password;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::database::{DatabaseError, UserStore};
use crate::types::{Identity, Role};

pub use jwt::{Claims, JwtError, JwtKeys};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Wrong username or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User not found")]
    UnknownUser,

    #[error("{0} role required")]
    Forbidden(Role),

    #[error("User exists")]
    DuplicateUser,

    #[error("{0}")]
    InvalidRegistration(&'static str),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub role: Role,
}

/// Verifies credentials, issues tokens and resolves bearer tokens back to identities
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys, bcrypt_cost: u32) -> Self {
        Self {
            users,
            keys,
            bcrypt_cost,
        }
    }

    /// Self-service registration always creates plain users.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.create_user(username, password, Role::User).await.map(|_| ())
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<i64, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::InvalidRegistration("Username must not be empty"));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidRegistration("Password must not be empty"));
        }

        let hash = password::hash_password(password, self.bcrypt_cost).await?;
        match self.users.insert(username, &hash, role).await? {
            Some(id) => {
                tracing::info!("Created user {} ({})", username, role);
                Ok(id)
            }
            None => {
                tracing::debug!("Registration rejected, username {} already taken", username);
                Err(AuthError::DuplicateUser)
            }
        }
    }

    pub async fn set_role(&self, username: &str, role: Role) -> Result<(), AuthError> {
        if self.users.set_role(username, role).await? {
            tracing::info!("Changed role of {} to {}", username, role);
            Ok(())
        } else {
            Err(AuthError::UnknownUser)
        }
    }

    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedToken, AuthError> {
        self.authenticate_at(username, password, Utc::now()).await
    }

    pub async fn authenticate_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            tracing::warn!("Login failed for unknown user {}", username);
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify_password(password, &user.password_hash).await? {
            tracing::warn!("Login failed for {}: wrong password", username);
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, claims) = self.keys.issue(&user.username, user.role, now)?;

        tracing::info!(
            "Issued token for {} ({}), expires at {}",
            user.username,
            user.role,
            claims.exp
        );
        Ok(IssuedToken {
            access_token,
            role: user.role,
        })
    }

    pub async fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        self.validate_at(token, Utc::now()).await
    }

    /// The returned role is the one currently stored for the user, so role changes
    /// take effect without waiting for outstanding tokens to expire.
    pub async fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        let claims = self.keys.decode(token, now).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AuthError::InvalidToken
        })?;

        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        if user.role != claims.role {
            tracing::debug!(
                "Token role {} for {} is stale, using stored role {}",
                claims.role,
                user.username,
                user.role
            );
        }

        Ok(Identity {
            username: user.username,
            role: user.role,
        })
    }

    pub fn require_role(identity: &Identity, role: Role) -> Result<(), AuthError> {
        if identity.role == role {
            Ok(())
        } else {
            tracing::warn!(
                "{} ({}) attempted a {}-only operation",
                identity.username,
                identity.role,
                role
            );
            Err(AuthError::Forbidden(role))
        }
    }
}
