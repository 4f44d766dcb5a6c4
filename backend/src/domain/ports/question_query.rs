//! Driving port for reading questions.

use async_trait::async_trait;

use crate::domain::{Error, Question, QuestionId};

use super::{QuestionFilter, QuestionSort};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionQuery: Send + Sync {
    /// Questions matching `filter` in the requested order.
    async fn list_questions(
        &self,
        filter: QuestionFilter,
        sort: QuestionSort,
    ) -> Result<Vec<Question>, Error>;

    /// Load a question for display and count the view.
    async fn view_question(&self, id: &QuestionId) -> Result<Question, Error>;
}
