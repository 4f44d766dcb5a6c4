//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field rules live in the domain; this module only covers what the HTTP
//! layer sees first: absent body fields and malformed path identifiers.

use crate::domain::{AnswerId, Error, FieldViolation, QuestionId, UserId};

/// Unwrap a body field, reporting `"<field> is required"` when absent.
pub(crate) fn required<T>(field: &'static str, value: Option<T>) -> Result<T, FieldViolation> {
    value.ok_or(FieldViolation::required(field))
}

fn parse_uuid_segment<T>(
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, uuid::Error>,
    label: &str,
) -> Result<T, Error> {
    parse(raw).map_err(|_| Error::invalid_request(format!("Invalid {label} id.")))
}

pub(crate) fn question_id(raw: &str) -> Result<QuestionId, Error> {
    parse_uuid_segment(raw, |s| QuestionId::new(s), "question")
}

pub(crate) fn answer_id(raw: &str) -> Result<AnswerId, Error> {
    parse_uuid_segment(raw, |s| AnswerId::new(s), "answer")
}

pub(crate) fn user_id(raw: &str) -> Result<UserId, Error> {
    parse_uuid_segment(raw, |s| UserId::new(s), "user")
}
