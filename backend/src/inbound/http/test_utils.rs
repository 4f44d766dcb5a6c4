//! Test helpers for inbound HTTP components.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    IssuedToken, MockAccountCommand, MockQuestionCommand, MockQuestionQuery, MockUsersQuery,
    TokenError, TokenService,
};
use crate::domain::{Actor, Role, User, UserId};

use super::state::HttpState;

/// Token service that accepts a fixed set of opaque tokens.
#[derive(Default)]
struct StubTokens {
    known: HashMap<String, Actor>,
}

impl TokenService for StubTokens {
    fn issue(&self, _user: &User, _now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        Err(TokenError::issue("stub tokens cannot be issued"))
    }

    fn verify(&self, token: &str) -> Result<Actor, TokenError> {
        self.known
            .get(token)
            .copied()
            .ok_or_else(|| TokenError::invalid("unknown stub token"))
    }
}

/// Mocked driving ports plus accepted tokens, turned into [`HttpState`].
///
/// Mocks without expectations panic when called, so each test only sets up
/// the port it exercises.
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockAccountCommand,
    pub users: MockUsersQuery,
    pub questions: MockQuestionCommand,
    pub questions_query: MockQuestionQuery,
    tokens: StubTokens,
}

impl TestPorts {
    /// Accept `token` as a credential for `actor`.
    pub fn with_token(mut self, token: &str, actor: Actor) -> Self {
        self.tokens.known.insert(token.to_owned(), actor);
        self
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            accounts: Arc::new(self.accounts),
            users: Arc::new(self.users),
            questions: Arc::new(self.questions),
            questions_query: Arc::new(self.questions_query),
            tokens: Arc::new(self.tokens),
        })
    }
}

/// `Authorization` header value for `token`.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// A regular member with a random id.
pub fn member() -> Actor {
    Actor {
        id: UserId::random(),
        role: Role::User,
        promoted: false,
    }
}
