//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` and depend only on
//! domain ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, QuestionCommand, QuestionQuery, TokenService, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub questions: Arc<dyn QuestionCommand>,
    pub questions_query: Arc<dyn QuestionQuery>,
    /// Resolves bearer tokens for the [`AuthenticatedUser`] extractor.
    ///
    /// [`AuthenticatedUser`]: super::auth::AuthenticatedUser
    pub tokens: Arc<dyn TokenService>,
}
