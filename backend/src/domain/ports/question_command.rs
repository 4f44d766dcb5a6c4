//! Driving port for question and answer mutations.
//!
//! Every operation loads the aggregate, checks the authorization policy,
//! applies the change and persists the whole aggregate.

use async_trait::async_trait;

use crate::domain::{
    Actor, Answer, AnswerId, AnswerText, Error, Question, QuestionDraft, QuestionId, Submitted,
    VoteCommand, VoteTarget,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionCommand: Send + Sync {
    async fn create_question(&self, actor: &Actor, draft: QuestionDraft)
    -> Result<Question, Error>;

    /// Replace title, text and tags. Refused once the question has answers.
    ///
    /// A field violation in `draft` is reported after the access check.
    async fn update_question(
        &self,
        actor: &Actor,
        id: &QuestionId,
        draft: Submitted<QuestionDraft>,
    ) -> Result<Question, Error>;

    async fn delete_question(&self, actor: &Actor, id: &QuestionId) -> Result<(), Error>;

    /// Add or remove the actor from the question's favorites.
    async fn toggle_favorite(&self, actor: &Actor, id: &QuestionId) -> Result<Question, Error>;

    /// Post the actor's single answer. Returns the new answer.
    ///
    /// A second answer is refused before `text` is looked at.
    async fn add_answer(
        &self,
        actor: &Actor,
        question: &QuestionId,
        text: Submitted<AnswerText>,
    ) -> Result<Answer, Error>;

    async fn update_answer(
        &self,
        actor: &Actor,
        question: &QuestionId,
        answer: &AnswerId,
        text: Submitted<AnswerText>,
    ) -> Result<Answer, Error>;

    async fn delete_answer(
        &self,
        actor: &Actor,
        question: &QuestionId,
        answer: &AnswerId,
    ) -> Result<Question, Error>;

    /// Flip the helpful flag of an answer. Gated on the question author.
    async fn toggle_helpful(
        &self,
        actor: &Actor,
        question: &QuestionId,
        answer: &AnswerId,
    ) -> Result<Question, Error>;

    /// Cast, change or retract the actor's vote on the question or an answer.
    async fn vote(
        &self,
        actor: &Actor,
        question: &QuestionId,
        target: VoteTarget,
        command: VoteCommand,
    ) -> Result<Question, Error>;
}
