//! Port for question aggregate persistence.
//!
//! A question is stored together with its answers, votes and favorites, so
//! `save` always writes the whole aggregate in one operation.

use std::str::FromStr;

use async_trait::async_trait;

use crate::domain::{Question, QuestionId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by question repository adapters.
    pub enum QuestionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "question repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "question repository query failed: {message}",
        /// Stored data could not be mapped back onto the aggregate.
        Corrupt { message: String } => "stored question is invalid: {message}",
    }
}

/// Criteria for listing questions. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    /// Case-insensitive substring of the title.
    pub title_contains: Option<String>,
    /// Tags that must all be present.
    pub tags: Vec<String>,
    /// Only questions favorited by this user.
    pub favorited_by: Option<UserId>,
}

impl QuestionFilter {
    /// Evaluate the filter against a loaded aggregate.
    pub fn matches(&self, question: &Question) -> bool {
        let title_ok = self.title_contains.as_ref().is_none_or(|needle| {
            question
                .title()
                .as_ref()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let tags_ok = question
            .tags()
            .contains_all(self.tags.iter().map(String::as_str));
        let favorite_ok = self
            .favorited_by
            .as_ref()
            .is_none_or(|user| question.is_favorite_of(user));
        title_ok && tags_ok && favorite_ok
    }
}

/// Ordering for question listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionSort {
    #[default]
    ScoreDesc,
    ScoreAsc,
    CreatedDesc,
    CreatedAsc,
    ViewsDesc,
    ViewsAsc,
}

impl QuestionSort {
    /// Order two aggregates according to this sort.
    pub fn compare(self, a: &Question, b: &Question) -> std::cmp::Ordering {
        match self {
            Self::ScoreDesc => b.score().cmp(&a.score()),
            Self::ScoreAsc => a.score().cmp(&b.score()),
            Self::CreatedDesc => b.created_at().cmp(&a.created_at()),
            Self::CreatedAsc => a.created_at().cmp(&b.created_at()),
            Self::ViewsDesc => b.views().cmp(&a.views()),
            Self::ViewsAsc => a.views().cmp(&b.views()),
        }
    }
}

/// Error returned for an unrecognised `sortType` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort type: {0}")]
pub struct UnknownSort(pub String);

impl FromStr for QuestionSort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-score" => Ok(Self::ScoreDesc),
            "score" => Ok(Self::ScoreAsc),
            "-created" => Ok(Self::CreatedDesc),
            "created" => Ok(Self::CreatedAsc),
            "-views" => Ok(Self::ViewsDesc),
            "views" => Ok(Self::ViewsAsc),
            other => Err(UnknownSort(other.to_owned())),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch a question with its answers.
    async fn find_by_id(&self, id: &QuestionId)
    -> Result<Option<Question>, QuestionRepositoryError>;

    /// Insert or replace the whole aggregate.
    async fn save(&self, question: &Question) -> Result<(), QuestionRepositoryError>;

    /// Remove a question and everything nested in it. Returns whether a row
    /// was deleted.
    async fn delete(&self, id: &QuestionId) -> Result<bool, QuestionRepositoryError>;

    /// List questions matching `filter`, ordered by `sort`.
    async fn find(
        &self,
        filter: &QuestionFilter,
        sort: QuestionSort,
    ) -> Result<Vec<Question>, QuestionRepositoryError>;
}
