//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`TokenService`], [`PasswordHasher`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod password_hasher;
mod question_command;
mod question_query;
mod question_repository;
mod token_service;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, AuthSession};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use question_command::MockQuestionCommand;
pub use question_command::QuestionCommand;
#[cfg(test)]
pub use question_query::MockQuestionQuery;
pub use question_query::QuestionQuery;
#[cfg(test)]
pub use question_repository::MockQuestionRepository;
pub use question_repository::{
    QuestionFilter, QuestionRepository, QuestionRepositoryError, QuestionSort, UnknownSort,
};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{IssuedToken, TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository, UserSort};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
