//! Internal Diesel row structs and JSON documents for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Answers and votes are stored as `jsonb`
//! documents inside the question row.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schema::{questions, users};

/// Row struct for reading from and writing to the users table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub promoted: bool,
    pub created_at: DateTime<Utc>,
}

/// Changeset for the mutable account fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub role: &'a str,
    pub promoted: bool,
}

// ---------------------------------------------------------------------------
// Question aggregate
// ---------------------------------------------------------------------------

/// Row struct for the questions table. Also used as the upsert changeset.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuestionRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub score: i64,
    pub votes: serde_json::Value,
    pub favorites: Vec<Uuid>,
    pub answers: serde_json::Value,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

/// A vote inside the `votes` column or an answer document. `vote` holds the
/// signed weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct VoteDocument {
    pub user: Uuid,
    pub vote: i64,
}

/// An answer inside the `answers` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AnswerDocument {
    pub id: Uuid,
    pub author: Uuid,
    pub text: String,
    pub score: i64,
    pub helpful: bool,
    pub votes: Vec<VoteDocument>,
    pub created: DateTime<Utc>,
}
