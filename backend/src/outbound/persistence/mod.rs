//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! aggregates. Row structs (`models.rs`) and the schema (`schema.rs`) stay
//! private to this module; every database failure is mapped onto the port's
//! error type.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselQuestionRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/qna")).await?;
//! let questions = DieselQuestionRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_question_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_question_repository::DieselQuestionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
