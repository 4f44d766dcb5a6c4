//! Bearer token extraction for HTTP handlers.
//!
//! Handlers that need an identity take an [`AuthenticatedUser`] argument.
//! Extraction fails with `401 Unauthorized` when the `Authorization` header
//! is missing, is not a bearer token, or does not verify.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::ports::TokenError;
use crate::domain::{Actor, Error};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// The verified caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Actor);

impl AuthenticatedUser {
    pub fn actor(&self) -> &Actor {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Authentication required."))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Malformed authorization header."))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("Bearer token required."))
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req)?;
    state
        .tokens
        .verify(token)
        .map(AuthenticatedUser)
        .map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            match err {
                TokenError::Expired => Error::unauthorized("Token expired."),
                TokenError::Invalid { .. } | TokenError::Issue { .. } => {
                    Error::unauthorized("Invalid token.")
                }
            }
        })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
