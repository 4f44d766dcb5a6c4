//! Authentication primitives such as signup and login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use super::fields::{FieldViolation, TextRules};
use super::user::{Email, Role, UserId, Username};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length.
pub const PASSWORD_MAX: usize = 50;

fn checked_password(raw: &str) -> Result<Zeroizing<String>, FieldViolation> {
    // Signup and login trim identically, so hashes stay comparable.
    TextRules {
        field: "password",
        reject_blank: true,
        min: Some(PASSWORD_MIN),
        max: PASSWORD_MAX,
    }
    .check(raw)
    .map(Zeroizing::new)
}

/// Validated signup submission.
///
/// # Examples
/// ```
/// use backend::domain::SignupCredentials;
///
/// let creds = SignupCredentials::try_from_parts("ada@example.com", "ada", "hunter22").unwrap();
/// assert_eq!(creds.username().as_ref(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupCredentials {
    email: Email,
    username: Username,
    password: Zeroizing<String>,
}

impl SignupCredentials {
    /// Validate raw fields in request order: email, username, password.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, FieldViolation> {
        let email = Email::new(email)?;
        let username = Username::new(username)?;
        let password = checked_password(password)?;
        Ok(Self {
            email,
            username,
            password,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised to lower case.
/// - `password` respects the same length rules as signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, FieldViolation> {
        Ok(Self {
            email: Email::new(email)?,
            password: checked_password(password)?,
        })
    }

    /// Email suitable for user lookups.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Identity recovered from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
    pub promoted: bool,
}

impl Actor {
    /// Admins and promoted members may moderate content they do not own.
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Admin || self.promoted
    }
}
