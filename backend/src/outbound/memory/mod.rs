//! In-memory repository adapters.
//!
//! Used when no database URL is configured and by the HTTP end-to-end tests.
//! State lives for the lifetime of the process.

mod question_repository;
mod user_repository;

pub use question_repository::InMemoryQuestionRepository;
pub use user_repository::InMemoryUserRepository;
