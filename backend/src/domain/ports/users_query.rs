//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user-visible data
//! without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, Profile, User, UserId};

use super::UserSort;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All users in the requested order.
    async fn list_users(&self, sort: UserSort) -> Result<Vec<User>, Error>;

    /// Users whose username contains `fragment`, ignoring case.
    async fn search_users(&self, fragment: &str) -> Result<Vec<User>, Error>;

    /// A single user, or `not_found`.
    async fn find_user(&self, id: &UserId) -> Result<User, Error>;

    /// Identity plus question and answer statistics, or `not_found`.
    async fn profile(&self, id: &UserId) -> Result<Profile, Error>;
}
