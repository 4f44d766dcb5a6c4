//! Field-level validation shared by user-supplied values.
//!
//! Every validated newtype reports the first rule it breaks as a
//! [`FieldViolation`]. The display form reads `"<field> <rule>"`, for example
//! `"title must be at least 10 characters long"`.

use std::fmt;

use serde_json::json;

use super::Error;

/// Rule broken by a submitted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// The field was absent from the request.
    Required,
    /// The field was present but empty once trimmed.
    Blank,
    /// The trimmed value is shorter than allowed.
    TooShort { min: usize },
    /// The trimmed value is longer than allowed.
    TooLong { max: usize },
    /// The value contains characters outside the allowed set.
    InvalidCharacters,
    /// The value does not match the expected syntax.
    WrongFormat,
    /// A collection field has no usable entries.
    Empty,
}

impl FieldRule {
    /// Stable machine-readable code for error details.
    pub fn code(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Blank => "blank",
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::InvalidCharacters => "invalid_characters",
            Self::WrongFormat => "wrong_format",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "is required"),
            Self::Blank => write!(f, "cannot be blank"),
            Self::TooShort { min } => write!(f, "must be at least {min} characters long"),
            Self::TooLong { max } => write!(f, "must be at most {max} characters long"),
            Self::InvalidCharacters => write!(f, "contains invalid characters"),
            Self::WrongFormat => write!(f, "is in wrong format"),
            Self::Empty => write!(f, "must contain at least one entry"),
        }
    }
}

/// First validation rule violated by a named field.
///
/// # Examples
/// ```
/// use backend::domain::{FieldRule, FieldViolation};
///
/// let violation = FieldViolation::new("title", FieldRule::TooShort { min: 10 });
/// assert_eq!(violation.to_string(), "title must be at least 10 characters long");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    field: &'static str,
    rule: FieldRule,
}

impl FieldViolation {
    /// Pair a field name with the rule it broke.
    pub const fn new(field: &'static str, rule: FieldRule) -> Self {
        Self { field, rule }
    }

    /// Shorthand for a missing field.
    pub const fn required(field: &'static str) -> Self {
        Self::new(field, FieldRule::Required)
    }

    /// Name of the offending field as it appears in requests.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The rule that was broken.
    pub fn rule(&self) -> FieldRule {
        self.rule
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.rule)
    }
}

impl std::error::Error for FieldViolation {}

impl From<FieldViolation> for Error {
    fn from(violation: FieldViolation) -> Self {
        Error::validation_failed(violation.to_string()).with_details(json!({
            "field": violation.field,
            "code": violation.rule.code(),
        }))
    }
}

/// Length and blankness constraints applied to a trimmed text field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextRules {
    pub field: &'static str,
    pub reject_blank: bool,
    pub min: Option<usize>,
    pub max: usize,
}

impl TextRules {
    /// Trim `raw` and check it against the rules in declaration order.
    pub(crate) fn check(self, raw: &str) -> Result<String, FieldViolation> {
        let trimmed = raw.trim();
        if self.reject_blank && trimmed.is_empty() {
            return Err(FieldViolation::new(self.field, FieldRule::Blank));
        }

        let length = trimmed.chars().count();
        if let Some(min) = self.min.filter(|min| length < *min) {
            return Err(FieldViolation::new(self.field, FieldRule::TooShort { min }));
        }
        if length > self.max {
            return Err(FieldViolation::new(
                self.field,
                FieldRule::TooLong { max: self.max },
            ));
        }

        Ok(trimmed.to_owned())
    }
}
