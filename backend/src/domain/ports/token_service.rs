//! Port for issuing and verifying bearer tokens.

use chrono::{DateTime, Utc};

use crate::domain::{Actor, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token is malformed, has a bad signature or carries bad claims.
        Invalid { message: String } => "invalid token: {message}",
        /// The token lifetime has elapsed.
        Expired => "token expired",
        /// Signing a new token failed.
        Issue { message: String } => "failed to issue token: {message}",
    }
}

/// Signed token plus its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues tokens after successful authentication and resolves them back to
/// an [`Actor`] on later requests.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for `user`, valid from `now`.
    fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<IssuedToken, TokenError>;

    /// Verify a presented token and recover the actor it was issued to.
    fn verify(&self, token: &str) -> Result<Actor, TokenError>;
}
