//! Question and answer domain service.
//!
//! Implements the [`QuestionCommand`] and [`QuestionQuery`] driving ports.
//! Each mutation loads the aggregate, runs [`authorize`], applies the change
//! and saves the whole aggregate. Concurrent writers race: the last save wins.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    QuestionCommand, QuestionFilter, QuestionQuery, QuestionRepository, QuestionRepositoryError,
    QuestionSort,
};
use crate::domain::{
    Action, Actor, Answer, AnswerId, AnswerText, Error, Question, QuestionDraft, QuestionError,
    QuestionId, Submitted, VoteCommand, VoteTarget, authorize,
};

/// Map repository failures onto domain errors.
pub(crate) fn map_question_repo_error(error: QuestionRepositoryError) -> Error {
    match error {
        QuestionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("question repository unavailable: {message}"))
        }
        QuestionRepositoryError::Query { message } => {
            Error::internal(format!("question repository error: {message}"))
        }
        QuestionRepositoryError::Corrupt { message } => {
            Error::internal(format!("stored question is invalid: {message}"))
        }
    }
}

fn question_not_found() -> Error {
    Error::not_found("Question not found.")
}

/// Question service implementing the question driving ports.
#[derive(Clone)]
pub struct QuestionService<Q> {
    questions: Arc<Q>,
    clock: Arc<dyn Clock>,
}

impl<Q> QuestionService<Q> {
    /// Create a new service over `questions`, stamping times from `clock`.
    pub fn new(questions: Arc<Q>, clock: Arc<dyn Clock>) -> Self {
        Self { questions, clock }
    }
}

impl<Q> QuestionService<Q>
where
    Q: QuestionRepository,
{
    async fn load(&self, id: &QuestionId) -> Result<Question, Error> {
        self.questions
            .find_by_id(id)
            .await
            .map_err(map_question_repo_error)?
            .ok_or_else(question_not_found)
    }

    async fn persist(&self, question: &Question) -> Result<(), Error> {
        self.questions
            .save(question)
            .await
            .map_err(map_question_repo_error)
    }

    fn require_answer<'q>(question: &'q Question, id: &AnswerId) -> Result<&'q Answer, Error> {
        question
            .answer(id)
            .ok_or_else(|| Error::from(QuestionError::AnswerNotFound))
    }
}

#[async_trait]
impl<Q> QuestionCommand for QuestionService<Q>
where
    Q: QuestionRepository,
{
    async fn create_question(
        &self,
        actor: &Actor,
        draft: QuestionDraft,
    ) -> Result<Question, Error> {
        let question = Question::new(actor.id, draft, self.clock.utc());
        self.persist(&question).await?;
        info!(question_id = %question.id(), author = %actor.id, "question created");
        Ok(question)
    }

    async fn update_question(
        &self,
        actor: &Actor,
        id: &QuestionId,
        draft: Submitted<QuestionDraft>,
    ) -> Result<Question, Error> {
        let mut question = self.load(id).await?;
        authorize(actor, Action::UpdateQuestion(&question))?;
        question.update_content(draft?, self.clock.utc())?;
        self.persist(&question).await?;
        debug!(question_id = %id, "question updated");
        Ok(question)
    }

    async fn delete_question(&self, actor: &Actor, id: &QuestionId) -> Result<(), Error> {
        let question = self.load(id).await?;
        authorize(actor, Action::DeleteQuestion(&question))?;
        let removed = self
            .questions
            .delete(id)
            .await
            .map_err(map_question_repo_error)?;
        if !removed {
            return Err(question_not_found());
        }
        info!(question_id = %id, actor = %actor.id, "question deleted");
        Ok(())
    }

    async fn toggle_favorite(&self, actor: &Actor, id: &QuestionId) -> Result<Question, Error> {
        let mut question = self.load(id).await?;
        let favorite = question.toggle_favorite(actor.id);
        self.persist(&question).await?;
        debug!(question_id = %id, user = %actor.id, favorite, "favorite toggled");
        Ok(question)
    }

    async fn add_answer(
        &self,
        actor: &Actor,
        question_id: &QuestionId,
        text: Submitted<AnswerText>,
    ) -> Result<Answer, Error> {
        let mut question = self.load(question_id).await?;
        authorize(actor, Action::CreateAnswer(&question))?;
        let answer = question
            .add_answer(actor.id, text?, self.clock.utc())?
            .clone();
        self.persist(&question).await?;
        info!(question_id = %question_id, answer_id = %answer.id(), "answer created");
        Ok(answer)
    }

    async fn update_answer(
        &self,
        actor: &Actor,
        question_id: &QuestionId,
        answer_id: &AnswerId,
        text: Submitted<AnswerText>,
    ) -> Result<Answer, Error> {
        let mut question = self.load(question_id).await?;
        authorize(
            actor,
            Action::ModifyAnswer(Self::require_answer(&question, answer_id)?),
        )?;
        let answer = question
            .update_answer(answer_id, text?, self.clock.utc())?
            .clone();
        self.persist(&question).await?;
        debug!(question_id = %question_id, answer_id = %answer_id, "answer updated");
        Ok(answer)
    }

    async fn delete_answer(
        &self,
        actor: &Actor,
        question_id: &QuestionId,
        answer_id: &AnswerId,
    ) -> Result<Question, Error> {
        let mut question = self.load(question_id).await?;
        authorize(
            actor,
            Action::ModifyAnswer(Self::require_answer(&question, answer_id)?),
        )?;
        question.remove_answer(answer_id)?;
        self.persist(&question).await?;
        info!(question_id = %question_id, answer_id = %answer_id, "answer deleted");
        Ok(question)
    }

    async fn toggle_helpful(
        &self,
        actor: &Actor,
        question_id: &QuestionId,
        answer_id: &AnswerId,
    ) -> Result<Question, Error> {
        let mut question = self.load(question_id).await?;
        Self::require_answer(&question, answer_id)?;
        authorize(actor, Action::MarkHelpful(&question))?;
        let helpful = question.toggle_helpful(answer_id)?;
        self.persist(&question).await?;
        debug!(question_id = %question_id, answer_id = %answer_id, helpful, "helpful toggled");
        Ok(question)
    }

    async fn vote(
        &self,
        actor: &Actor,
        question_id: &QuestionId,
        target: VoteTarget,
        command: VoteCommand,
    ) -> Result<Question, Error> {
        let mut question = self.load(question_id).await?;
        let author = question.content_author(target)?;
        authorize(actor, Action::Vote { target, author })?;
        let outcome = question.apply_vote(target, actor.id, command)?;
        self.persist(&question).await?;
        debug!(
            question_id = %question_id,
            voter = %actor.id,
            ?target,
            ?command,
            ?outcome,
            "vote applied"
        );
        Ok(question)
    }
}

#[async_trait]
impl<Q> QuestionQuery for QuestionService<Q>
where
    Q: QuestionRepository,
{
    async fn list_questions(
        &self,
        filter: QuestionFilter,
        sort: QuestionSort,
    ) -> Result<Vec<Question>, Error> {
        self.questions
            .find(&filter, sort)
            .await
            .map_err(map_question_repo_error)
    }

    async fn view_question(&self, id: &QuestionId) -> Result<Question, Error> {
        let mut question = self.load(id).await?;
        question.record_view();
        self.persist(&question).await?;
        Ok(question)
    }
}

#[cfg(test)]
#[path = "question_service_tests.rs"]
mod tests;
