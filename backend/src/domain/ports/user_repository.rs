//! Port abstraction for user persistence adapters and their errors.
use std::str::FromStr;

use async_trait::async_trait;

use crate::domain::{Email, User, UserId, Username};

use super::{UnknownSort, define_port_error};

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail => "email already registered",
        /// Another account already uses this username.
        DuplicateUsername => "username already registered",
        /// Stored data could not be mapped back onto the domain type.
        Corrupt { message: String } => "stored user is invalid: {message}",
    }
}

/// Ordering for user listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserSort {
    #[default]
    CreatedDesc,
    CreatedAsc,
    UsernameAsc,
    UsernameDesc,
}

impl UserSort {
    /// Order two users according to this sort.
    pub fn compare(self, a: &User, b: &User) -> std::cmp::Ordering {
        match self {
            Self::CreatedDesc => b.created_at().cmp(&a.created_at()),
            Self::CreatedAsc => a.created_at().cmp(&b.created_at()),
            Self::UsernameAsc => a.username().as_ref().cmp(b.username().as_ref()),
            Self::UsernameDesc => b.username().as_ref().cmp(a.username().as_ref()),
        }
    }
}

impl FromStr for UserSort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-created" => Ok(Self::CreatedDesc),
            "created" => Ok(Self::CreatedAsc),
            "username" => Ok(Self::UsernameAsc),
            "-username" => Ok(Self::UsernameDesc),
            other => Err(UnknownSort(other.to_owned())),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, rejecting duplicate emails or usernames.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite the mutable fields (role, promotion) of an existing account.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// List every user in the requested order.
    async fn list(&self, sort: UserSort) -> Result<Vec<User>, UserPersistenceError>;

    /// Users whose username contains `fragment`, ignoring case.
    async fn search(&self, fragment: &str) -> Result<Vec<User>, UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("-created", UserSort::CreatedDesc)]
    #[case("created", UserSort::CreatedAsc)]
    #[case("username", UserSort::UsernameAsc)]
    #[case("-username", UserSort::UsernameDesc)]
    fn parses_sort_types(#[case] raw: &str, #[case] expected: UserSort) {
        assert_eq!(raw.parse::<UserSort>(), Ok(expected));
    }

    #[rstest]
    fn unit_variants_have_constructors() {
        assert_eq!(
            UserPersistenceError::duplicate_email(),
            UserPersistenceError::DuplicateEmail
        );
        assert_eq!(
            UserPersistenceError::query("boom").to_string(),
            "user repository query failed: boom"
        );
    }
}
