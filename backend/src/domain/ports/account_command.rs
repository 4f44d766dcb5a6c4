//! Driving port for account use-cases: signup, login and promotion.
//!
//! Inbound adapters call it without knowing how passwords are hashed or how
//! tokens are signed, so handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Actor, Error, LoginCredentials, SignupCredentials, User, UserId};

use super::IssuedToken;

/// Result of a successful signup or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: User,
    pub token: IssuedToken,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new account and sign a token for it.
    ///
    /// Duplicate usernames are reported before duplicate emails.
    async fn signup(&self, credentials: SignupCredentials) -> Result<AuthSession, Error>;

    /// Check credentials and sign a token.
    async fn authenticate(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Set the "diamond" flag on `user`. Only admins may do this.
    async fn promote_to_diamond(&self, actor: &Actor, user: &UserId) -> Result<User, Error>;
}
