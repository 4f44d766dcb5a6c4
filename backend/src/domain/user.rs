//! User data model.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fields::{FieldRule, FieldViolation, TextRules};

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its canonical string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Uuid::parse_str(id.as_ref()).map(Self)
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 16;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new("^[a-zA-Z0-9_-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique public handle chosen at signup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`], trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, FieldViolation> {
        let value = TextRules {
            field: "username",
            reject_blank: true,
            min: None,
            max: USERNAME_MAX,
        }
        .check(raw.as_ref())?;

        if !username_regex().is_match(&value) {
            return Err(FieldViolation::new("username", FieldRule::InvalidCharacters));
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email address, stored lower-cased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Email;
    ///
    /// let email = Email::new("  Ada@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, FieldViolation> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FieldViolation::new("email", FieldRule::Blank));
        }
        if !email_regex().is_match(trimmed) {
            return Err(FieldViolation::new("email", FieldRule::WrongFormat));
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access level of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular member.
    #[default]
    User,
    /// Administrator allowed to promote users and moderate content.
    Admin,
}

impl Role {
    /// Persisted string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Error returned when a stored role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Opaque output of the password hasher. Never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a `PasswordHasher` adapter.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Stored components of a [`User`], used by repositories to rebuild it.
#[derive(Debug, Clone)]
pub struct UserParts {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub promoted: bool,
    pub created_at: DateTime<Utc>,
}

/// Registered account.
///
/// ## Invariants
/// - `email` and `username` are unique across accounts (enforced by the
///   repository).
/// - Only `role` and `promoted` change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    username: Username,
    password_hash: PasswordHash,
    role: Role,
    promoted: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered member with the default role.
    pub fn register(
        email: Email,
        username: Username,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::random(),
            email,
            username,
            password_hash,
            role: Role::User,
            promoted: false,
            created_at,
        }
    }

    /// Rebuild a user from stored components.
    pub fn restore(parts: UserParts) -> Self {
        let UserParts {
            id,
            email,
            username,
            password_hash,
            role,
            promoted,
            created_at,
        } = parts;
        Self {
            id,
            email,
            username,
            password_hash,
            role,
            promoted,
            created_at,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalised email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Public username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Encoded password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Account role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the account carries the "diamond" trust flag.
    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    /// Account creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Gravatar identicon derived from the user id.
    pub fn profile_photo(&self) -> String {
        format!(
            "https://secure.gravatar.com/avatar/{}?s=90&d=identicon",
            self.id
        )
    }

    /// Grant the "diamond" flag. Promoting twice is harmless.
    pub fn promote_to_diamond(&mut self) {
        self.promoted = true;
    }
}
