//! PostgreSQL-backed `QuestionRepository` implementation using Diesel ORM.
//!
//! The aggregate lives in a single row: tags and favorites are native
//! arrays, while votes and answers are `jsonb` documents. `save` is an upsert
//! of the whole row, so the last writer wins.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    QuestionFilter, QuestionRepository, QuestionRepositoryError, QuestionSort,
};
use crate::domain::{
    Answer, AnswerId, AnswerParts, AnswerText, Question, QuestionId, QuestionParts, QuestionText,
    Tags, Title, UserId, Vote, VoteChoice, VoteLedger,
};

use super::diesel_helpers::{like_pattern, map_diesel_error, map_pool_error};
use super::models::{AnswerDocument, QuestionRow, VoteDocument};
use super::pool::DbPool;
use super::schema::questions;

type QuestionsQuery = questions::BoxedQuery<'static, Pg>;

/// Diesel-backed implementation of the `QuestionRepository` port.
#[derive(Clone)]
pub struct DieselQuestionRepository {
    pool: DbPool,
}

impl DieselQuestionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: super::pool::PoolError) -> QuestionRepositoryError {
    map_pool_error(error, QuestionRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> QuestionRepositoryError {
    map_diesel_error(
        error,
        QuestionRepositoryError::query,
        QuestionRepositoryError::connection,
    )
}

fn corrupt(err: impl std::fmt::Display) -> QuestionRepositoryError {
    QuestionRepositoryError::corrupt(err.to_string())
}

fn votes_to_documents(ledger: &VoteLedger) -> Vec<VoteDocument> {
    ledger
        .votes()
        .iter()
        .map(|vote| VoteDocument {
            user: *vote.voter.as_uuid(),
            vote: vote.choice.weight(),
        })
        .collect()
}

fn documents_to_ledger(documents: Vec<VoteDocument>) -> Result<VoteLedger, QuestionRepositoryError> {
    let votes = documents
        .into_iter()
        .map(|doc| {
            VoteChoice::from_weight(doc.vote)
                .map(|choice| Vote {
                    voter: UserId::from_uuid(doc.user),
                    choice,
                })
                .ok_or_else(|| corrupt(format!("unsupported vote weight {}", doc.vote)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(VoteLedger::from_votes(votes))
}

fn answer_to_document(answer: &Answer) -> AnswerDocument {
    AnswerDocument {
        id: *answer.id().as_uuid(),
        author: *answer.author().as_uuid(),
        text: answer.text().as_ref().to_owned(),
        score: answer.score(),
        helpful: answer.is_helpful(),
        votes: votes_to_documents(answer.ledger()),
        created: answer.created_at(),
    }
}

fn document_to_answer(doc: AnswerDocument) -> Result<Answer, QuestionRepositoryError> {
    Ok(Answer::restore(AnswerParts {
        id: AnswerId::from_uuid(doc.id),
        author: UserId::from_uuid(doc.author),
        text: AnswerText::from_stored(doc.text),
        ledger: documents_to_ledger(doc.votes)?,
        helpful: doc.helpful,
        created_at: doc.created,
    }))
}

fn question_to_row(question: &Question) -> Result<QuestionRow, QuestionRepositoryError> {
    let votes = serde_json::to_value(votes_to_documents(question.ledger()))
        .map_err(|err| QuestionRepositoryError::query(err.to_string()))?;
    let answers: Vec<AnswerDocument> = question.answers().iter().map(answer_to_document).collect();
    let answers = serde_json::to_value(answers)
        .map_err(|err| QuestionRepositoryError::query(err.to_string()))?;

    Ok(QuestionRow {
        id: *question.id().as_uuid(),
        author_id: *question.author().as_uuid(),
        title: question.title().as_ref().to_owned(),
        body: question.text().as_ref().to_owned(),
        tags: question.tags().to_vec(),
        score: question.score(),
        votes,
        favorites: question.favorites().iter().map(|user| *user.as_uuid()).collect(),
        answers,
        views: i64::try_from(question.views()).unwrap_or(i64::MAX),
        created_at: question.created_at(),
    })
}

/// Rebuild the aggregate. Scores are recomputed from the stored votes.
fn row_to_question(row: QuestionRow) -> Result<Question, QuestionRepositoryError> {
    let votes: Vec<VoteDocument> = serde_json::from_value(row.votes).map_err(corrupt)?;
    let answers: Vec<AnswerDocument> = serde_json::from_value(row.answers).map_err(corrupt)?;
    let answers = answers
        .into_iter()
        .map(document_to_answer)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Question::restore(QuestionParts {
        id: QuestionId::from_uuid(row.id),
        author: UserId::from_uuid(row.author_id),
        title: Title::from_stored(row.title),
        text: QuestionText::from_stored(row.body),
        tags: Tags::from_stored(row.tags),
        ledger: documents_to_ledger(votes)?,
        favorites: row.favorites.into_iter().map(UserId::from_uuid).collect(),
        answers,
        views: u64::try_from(row.views).map_err(corrupt)?,
        created_at: row.created_at,
    }))
}

fn filtered(filter: &QuestionFilter) -> QuestionsQuery {
    let mut query = questions::table.into_boxed();
    if let Some(title) = &filter.title_contains {
        query = query.filter(questions::title.ilike(like_pattern(title)));
    }
    if !filter.tags.is_empty() {
        query = query.filter(questions::tags.contains(filter.tags.clone()));
    }
    if let Some(user) = &filter.favorited_by {
        query = query.filter(questions::favorites.contains(vec![*user.as_uuid()]));
    }
    query
}

fn ordered(query: QuestionsQuery, sort: QuestionSort) -> QuestionsQuery {
    match sort {
        QuestionSort::ScoreDesc => query.order(questions::score.desc()),
        QuestionSort::ScoreAsc => query.order(questions::score.asc()),
        QuestionSort::CreatedDesc => query.order(questions::created_at.desc()),
        QuestionSort::CreatedAsc => query.order(questions::created_at.asc()),
        QuestionSort::ViewsDesc => query.order(questions::views.desc()),
        QuestionSort::ViewsAsc => query.order(questions::views.asc()),
    }
}

#[async_trait]
impl QuestionRepository for DieselQuestionRepository {
    async fn find_by_id(
        &self,
        id: &QuestionId,
    ) -> Result<Option<Question>, QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = questions::table
            .filter(questions::id.eq(id.as_uuid()))
            .select(QuestionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_question).transpose()
    }

    async fn save(&self, question: &Question) -> Result<(), QuestionRepositoryError> {
        let row = question_to_row(question)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::insert_into(questions::table)
            .values(&row)
            .on_conflict(questions::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: &QuestionId) -> Result<bool, QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let deleted = diesel::delete(questions::table.filter(questions::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find(
        &self,
        filter: &QuestionFilter,
        sort: QuestionSort,
    ) -> Result<Vec<Question>, QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<QuestionRow> = ordered(filtered(filter), sort)
            .select(QuestionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows.into_iter().map(row_to_question).collect()
    }
}
