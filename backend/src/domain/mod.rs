//! Domain primitives, aggregates, policy and services.
//!
//! Purpose: define strongly typed entities for the Q&A backend and the
//! services that drive them. Inbound adapters depend on the driving ports in
//! [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Question, Answer: aggregates and their identifiers.
//! - VoteLedger: per-votable votes and derived score.
//! - authorize: the single permission check for mutations.
//! - AccountService, UserDirectoryService, QuestionService: port
//!   implementations.

pub mod account_service;
pub mod auth;
pub mod content;
pub mod error;
pub mod fields;
pub mod policy;
pub mod ports;
pub mod profile;
pub mod question;
pub mod question_service;
pub mod trace_id;
pub mod user;
pub mod user_directory_service;
pub mod vote;

pub use self::account_service::AccountService;
pub use self::auth::{Actor, LoginCredentials, PASSWORD_MAX, PASSWORD_MIN, SignupCredentials};
pub use self::content::{AnswerText, QuestionDraft, QuestionText, Submitted, Tags, Title};
pub use self::error::{Error, ErrorCode};
pub use self::fields::{FieldRule, FieldViolation};
pub use self::policy::{Action, PolicyDenial, authorize};
pub use self::profile::{Profile, ProfileStats};
pub use self::question::{
    Answer, AnswerId, AnswerParts, Question, QuestionError, QuestionId, QuestionParts, VoteTarget,
};
pub use self::question_service::QuestionService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, PasswordHash, Role, USERNAME_MAX, UnknownRole, User, UserId, UserParts, Username,
};
pub use self::user_directory_service::UserDirectoryService;
pub use self::vote::{Vote, VoteChoice, VoteCommand, VoteLedger, VoteOutcome};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("Wrong email or password."))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
