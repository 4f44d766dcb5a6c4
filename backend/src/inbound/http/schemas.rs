//! JSON payloads exchanged by the HTTP adapter.
//!
//! Domain aggregates keep their fields private and carry no framework
//! derives. These wrappers flatten them into the wire shape and provide the
//! OpenAPI schemas. Field names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::AuthSession;
use crate::domain::{Answer, Profile, Question, User, VoteLedger};

/// Account as returned to clients. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "user")]
    pub role: String,
    pub is_promoted_to_diamond: bool,
    pub profile_photo: String,
    pub created: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            email: user.email().as_ref().to_owned(),
            username: user.username().as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
            is_promoted_to_diamond: user.is_promoted(),
            profile_photo: user.profile_photo(),
            created: user.created_at(),
        }
    }
}

/// Body returned by signup and authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[schema(example = "Authentication successful!")]
    pub message: String,
    pub token: String,
    pub user_info: UserResponse,
    /// Token expiry as seconds since the Unix epoch.
    pub expires_at: i64,
}

impl AuthResponse {
    pub fn new(message: &str, session: &AuthSession) -> Self {
        Self {
            message: message.to_owned(),
            token: session.token.token.clone(),
            user_info: UserResponse::from(&session.user),
            expires_at: session.token.expires_at.timestamp(),
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Your question is successfully deleted.")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single vote. `vote` is the signed weight: 10 or -5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VoteResponse {
    pub user: Uuid,
    #[schema(example = 10)]
    pub vote: i64,
}

fn votes_of(ledger: &VoteLedger) -> Vec<VoteResponse> {
    ledger
        .votes()
        .iter()
        .map(|vote| VoteResponse {
            user: *vote.voter.as_uuid(),
            vote: vote.choice.weight(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub id: Uuid,
    pub author: Uuid,
    pub text: String,
    pub score: i64,
    pub helpful: bool,
    pub votes: Vec<VoteResponse>,
    pub created: DateTime<Utc>,
}

impl From<&Answer> for AnswerResponse {
    fn from(answer: &Answer) -> Self {
        Self {
            id: *answer.id().as_uuid(),
            author: *answer.author().as_uuid(),
            text: answer.text().as_ref().to_owned(),
            score: answer.score(),
            helpful: answer.is_helpful(),
            votes: votes_of(answer.ledger()),
            created: answer.created_at(),
        }
    }
}

/// A question with its nested answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: Uuid,
    pub author: Uuid,
    pub title: String,
    pub text: String,
    pub tags: Vec<String>,
    pub score: i64,
    pub votes: Vec<VoteResponse>,
    pub favorites: Vec<Uuid>,
    pub answers: Vec<AnswerResponse>,
    pub views: u64,
    pub created: DateTime<Utc>,
}

impl From<&Question> for QuestionResponse {
    fn from(question: &Question) -> Self {
        Self {
            id: *question.id().as_uuid(),
            author: *question.author().as_uuid(),
            title: question.title().as_ref().to_owned(),
            text: question.text().as_ref().to_owned(),
            tags: question.tags().to_vec(),
            score: question.score(),
            votes: votes_of(question.ledger()),
            favorites: question
                .favorites()
                .iter()
                .map(|user| *user.as_uuid())
                .collect(),
            answers: question.answers().iter().map(AnswerResponse::from).collect(),
            views: question.views(),
            created: question.created_at(),
        }
    }
}

/// Public profile with activity statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub is_promoted_to_diamond: bool,
    pub questions_asked: u64,
    pub answers_given: u64,
    pub helpful_answers: u64,
    pub answer_score: i64,
    pub question_score: i64,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: *profile.user.id().as_uuid(),
            username: profile.user.username().as_ref().to_owned(),
            is_promoted_to_diamond: profile.user.is_promoted(),
            questions_asked: profile.stats.questions_asked,
            answers_given: profile.stats.answers_given,
            helpful_answers: profile.stats.helpful_answers,
            answer_score: profile.stats.answer_score,
            question_score: profile.stats.question_score,
        }
    }
}
