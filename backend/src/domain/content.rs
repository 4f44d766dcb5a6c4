//! Validated text submitted for questions and answers.

use std::collections::BTreeSet;

use serde::Serialize;

use super::Error;
use super::fields::{FieldRule, FieldViolation, TextRules};

/// Submitted content after field validation.
///
/// Commands carry the violation instead of failing early: missing content,
/// access and uniqueness errors take precedence over field rules.
pub type Submitted<T> = Result<T, Error>;

const TITLE_RULES: TextRules = TextRules {
    field: "title",
    reject_blank: true,
    min: Some(10),
    max: 60,
};

const QUESTION_TEXT_RULES: TextRules = TextRules {
    field: "text",
    reject_blank: false,
    min: Some(10),
    max: 280,
};

const ANSWER_TEXT_RULES: TextRules = TextRules {
    field: "text",
    reject_blank: true,
    min: Some(10),
    max: 500,
};

macro_rules! text_newtype {
    ($(#[$meta:meta])* $name:ident, $rules:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Trim and validate the raw value.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, FieldViolation> {
                $rules.check(raw.as_ref()).map(Self)
            }

            /// Rebuild from storage without re-running validation.
            pub(crate) fn from_stored(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }
    };
}

text_newtype!(
    /// Question headline, 10 to 60 characters.
    Title,
    TITLE_RULES
);

text_newtype!(
    /// Question body, 10 to 280 characters.
    QuestionText,
    QUESTION_TEXT_RULES
);

text_newtype!(
    /// Answer body, 10 to 500 characters.
    AnswerText,
    ANSWER_TEXT_RULES
);

/// Non-empty set of tags attached to a question.
///
/// Entries are trimmed and blank entries are dropped; duplicates collapse.
///
/// # Examples
/// ```
/// use backend::domain::Tags;
///
/// let tags = Tags::new([" rust ", "async", "rust", ""]).expect("valid tags");
/// assert_eq!(tags.iter().collect::<Vec<_>>(), ["async", "rust"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(BTreeSet<String>);

impl Tags {
    pub fn new<I, S>(raw: I) -> Result<Self, FieldViolation>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = raw
            .into_iter()
            .map(|tag| tag.as_ref().trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect();
        if set.is_empty() {
            return Err(FieldViolation::new("tags", FieldRule::Empty));
        }
        Ok(Self(set))
    }

    pub(crate) fn from_stored(tags: impl IntoIterator<Item = String>) -> Self {
        Self(tags.into_iter().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// True when every tag in `required` is present.
    pub fn contains_all<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> bool {
        required.into_iter().all(|tag| self.0.contains(tag))
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// Validated fields for creating or editing a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub title: Title,
    pub text: QuestionText,
    pub tags: Tags,
}

impl QuestionDraft {
    /// Validate raw fields in request order: title, text, tags.
    ///
    /// Missing fields report `required` before any other rule is checked.
    pub fn try_from_parts(
        title: Option<&str>,
        text: Option<&str>,
        tags: Option<&[String]>,
    ) -> Result<Self, FieldViolation> {
        let title = Title::new(title.ok_or(FieldViolation::required("title"))?)?;
        let text = QuestionText::new(text.ok_or(FieldViolation::required("text"))?)?;
        let tags = Tags::new(tags.ok_or(FieldViolation::required("tags"))?)?;
        Ok(Self { title, text, tags })
    }
}
