//! Question aggregate: the question, its answers and their vote ledgers.
//!
//! Every mutation goes through a method on [`Question`]; services then persist
//! the whole aggregate in one write. Failures are reported as
//! [`QuestionError`] and leave the aggregate untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;
use super::content::{AnswerText, QuestionDraft, QuestionText, Tags, Title};
use super::user::UserId;
use super::vote::{VoteCommand, VoteLedger, VoteOutcome};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse from the canonical string form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, uuid::Error> {
                Uuid::parse_str(id.as_ref()).map(Self)
            }

            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id!(
    /// Stable question identifier.
    QuestionId
);

uuid_id!(
    /// Answer identifier, unique within the owning question.
    AnswerId
);

/// Failures raised by aggregate mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuestionError {
    #[error("You can write one answer.")]
    DuplicateAnswer,
    #[error("Answer not found.")]
    AnswerNotFound,
    #[error("Cannot update question when answer has already been provided.")]
    AnsweredQuestionLocked,
}

impl From<QuestionError> for Error {
    fn from(err: QuestionError) -> Self {
        match err {
            QuestionError::DuplicateAnswer => Error::invalid_request(err.to_string()),
            QuestionError::AnswerNotFound => Error::not_found(err.to_string()),
            QuestionError::AnsweredQuestionLocked => Error::validation_failed(err.to_string()),
        }
    }
}

/// Which votable inside the aggregate a vote targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTarget {
    Question,
    Answer(AnswerId),
}

/// Stored components of an [`Answer`].
#[derive(Debug, Clone)]
pub struct AnswerParts {
    pub id: AnswerId,
    pub author: UserId,
    pub text: AnswerText,
    pub ledger: VoteLedger,
    pub helpful: bool,
    pub created_at: DateTime<Utc>,
}

/// An answer nested inside a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    id: AnswerId,
    author: UserId,
    text: AnswerText,
    ledger: VoteLedger,
    helpful: bool,
    created_at: DateTime<Utc>,
}

impl Answer {
    pub fn restore(parts: AnswerParts) -> Self {
        Self {
            id: parts.id,
            author: parts.author,
            text: parts.text,
            ledger: parts.ledger,
            helpful: parts.helpful,
            created_at: parts.created_at,
        }
    }

    pub fn id(&self) -> &AnswerId {
        &self.id
    }

    pub fn author(&self) -> &UserId {
        &self.author
    }

    pub fn text(&self) -> &AnswerText {
        &self.text
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    pub fn score(&self) -> i64 {
        self.ledger.score()
    }

    pub fn is_helpful(&self) -> bool {
        self.helpful
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Stored components of a [`Question`].
#[derive(Debug, Clone)]
pub struct QuestionParts {
    pub id: QuestionId,
    pub author: UserId,
    pub title: Title,
    pub text: QuestionText,
    pub tags: Tags,
    pub ledger: VoteLedger,
    pub favorites: Vec<UserId>,
    pub answers: Vec<Answer>,
    pub views: u64,
    pub created_at: DateTime<Utc>,
}

/// Question aggregate root.
///
/// ## Invariants
/// - The score of the question and of each answer equals the sum of its
///   ledger's votes.
/// - Each user authors at most one answer.
/// - `favorites` holds each user at most once.
/// - Title, text and tags change only while there are no answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    author: UserId,
    title: Title,
    text: QuestionText,
    tags: Tags,
    ledger: VoteLedger,
    favorites: Vec<UserId>,
    answers: Vec<Answer>,
    views: u64,
    created_at: DateTime<Utc>,
}

impl Question {
    /// Create a new question with no votes, favorites or answers.
    pub fn new(author: UserId, draft: QuestionDraft, now: DateTime<Utc>) -> Self {
        let QuestionDraft { title, text, tags } = draft;
        Self {
            id: QuestionId::random(),
            author,
            title,
            text,
            tags,
            ledger: VoteLedger::default(),
            favorites: Vec::new(),
            answers: Vec::new(),
            views: 0,
            created_at: now,
        }
    }

    /// Rebuild a question from stored components.
    pub fn restore(parts: QuestionParts) -> Self {
        let mut favorites = Vec::with_capacity(parts.favorites.len());
        for user in parts.favorites {
            if !favorites.contains(&user) {
                favorites.push(user);
            }
        }
        Self {
            id: parts.id,
            author: parts.author,
            title: parts.title,
            text: parts.text,
            tags: parts.tags,
            ledger: parts.ledger,
            favorites,
            answers: parts.answers,
            views: parts.views,
            created_at: parts.created_at,
        }
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn author(&self) -> &UserId {
        &self.author
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn text(&self) -> &QuestionText {
        &self.text
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    pub fn score(&self) -> i64 {
        self.ledger.score()
    }

    pub fn favorites(&self) -> &[UserId] {
        &self.favorites
    }

    pub fn is_favorite_of(&self, user: &UserId) -> bool {
        self.favorites.contains(user)
    }

    /// Answers in insertion order.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn answer(&self, id: &AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|answer| &answer.id == id)
    }

    /// The answer written by `author`, if any.
    pub fn answer_by(&self, author: &UserId) -> Option<&Answer> {
        self.answers.iter().find(|answer| &answer.author == author)
    }

    pub fn views(&self) -> u64 {
        self.views
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn answer_index(&self, id: &AnswerId) -> Result<usize, QuestionError> {
        self.answers
            .iter()
            .position(|answer| &answer.id == id)
            .ok_or(QuestionError::AnswerNotFound)
    }

    fn answer_mut(&mut self, id: &AnswerId) -> Result<&mut Answer, QuestionError> {
        self.answers
            .iter_mut()
            .find(|answer| &answer.id == id)
            .ok_or(QuestionError::AnswerNotFound)
    }

    /// Append an answer by `author`. Returns the new answer.
    pub fn add_answer(
        &mut self,
        author: UserId,
        text: AnswerText,
        now: DateTime<Utc>,
    ) -> Result<&Answer, QuestionError> {
        if self.answer_by(&author).is_some() {
            return Err(QuestionError::DuplicateAnswer);
        }
        let id = AnswerId::random();
        self.answers.push(Answer {
            id,
            author,
            text,
            ledger: VoteLedger::default(),
            helpful: false,
            created_at: now,
        });
        self.answer(&id).ok_or(QuestionError::AnswerNotFound)
    }

    /// Replace an answer's text and reset its creation timestamp.
    pub fn update_answer(
        &mut self,
        id: &AnswerId,
        text: AnswerText,
        now: DateTime<Utc>,
    ) -> Result<&Answer, QuestionError> {
        let answer = self.answer_mut(id)?;
        answer.text = text;
        answer.created_at = now;
        Ok(answer)
    }

    /// Remove an answer together with its votes.
    pub fn remove_answer(&mut self, id: &AnswerId) -> Result<Answer, QuestionError> {
        let index = self.answer_index(id)?;
        Ok(self.answers.remove(index))
    }

    /// Flip an answer's helpful flag, returning the new value.
    pub fn toggle_helpful(&mut self, id: &AnswerId) -> Result<bool, QuestionError> {
        let answer = self.answer_mut(id)?;
        answer.helpful = !answer.helpful;
        Ok(answer.helpful)
    }

    /// Add or remove `user` from the favorites, returning whether it is now
    /// a favorite.
    pub fn toggle_favorite(&mut self, user: UserId) -> bool {
        match self.favorites.iter().position(|id| id == &user) {
            Some(index) => {
                self.favorites.remove(index);
                false
            }
            None => {
                self.favorites.push(user);
                true
            }
        }
    }

    /// Replace title, text and tags while no answers exist.
    pub fn update_content(
        &mut self,
        draft: QuestionDraft,
        now: DateTime<Utc>,
    ) -> Result<(), QuestionError> {
        if !self.answers.is_empty() {
            return Err(QuestionError::AnsweredQuestionLocked);
        }
        let QuestionDraft { title, text, tags } = draft;
        self.title = title;
        self.text = text;
        self.tags = tags;
        self.created_at = now;
        Ok(())
    }

    pub fn record_view(&mut self) {
        self.views = self.views.saturating_add(1);
    }

    /// Author of the question or of the targeted answer.
    pub fn content_author(&self, target: VoteTarget) -> Result<UserId, QuestionError> {
        match target {
            VoteTarget::Question => Ok(self.author),
            VoteTarget::Answer(id) => self
                .answer(&id)
                .map(|answer| answer.author)
                .ok_or(QuestionError::AnswerNotFound),
        }
    }

    /// Apply a vote to the question or one of its answers.
    pub fn apply_vote(
        &mut self,
        target: VoteTarget,
        voter: UserId,
        command: VoteCommand,
    ) -> Result<VoteOutcome, QuestionError> {
        let ledger = match target {
            VoteTarget::Question => &mut self.ledger,
            VoteTarget::Answer(id) => &mut self.answer_mut(&id)?.ledger,
        };
        Ok(ledger.apply(voter, command))
    }
}
