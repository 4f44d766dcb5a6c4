//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository, UserSort};
use crate::domain::{Email, PasswordHash, Role, User, UserId, UserParts, Username};

use super::diesel_helpers::{like_pattern, map_diesel_error, map_pool_error, unique_violation};
use super::models::{UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";
const USERNAME_CONSTRAINT: &str = "users_username_key";

type UsersQuery = users::BoxedQuery<'static, diesel::pg::Pg>;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_one<F>(&self, filter: F) -> Result<Option<User>, UserPersistenceError>
    where
        F: FnOnce(UsersQuery) -> UsersQuery,
    {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row = filter(users::table.into_boxed())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_user_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn load_many(&self, query: UsersQuery) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let rows: Vec<UserRow> = query
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_user_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }
}

fn map_user_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match unique_violation(&error) {
        Some(EMAIL_CONSTRAINT) => return UserPersistenceError::duplicate_email(),
        Some(USERNAME_CONSTRAINT) => return UserPersistenceError::duplicate_username(),
        Some(other) => debug!(constraint = other, "unexpected unique violation on users"),
        None => {}
    }
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let email = Email::new(&row.email).map_err(corrupt)?;
    let username = Username::new(&row.username).map_err(corrupt)?;
    let role: Role = row.role.parse().map_err(corrupt)?;

    Ok(User::restore(UserParts {
        id: UserId::from_uuid(row.id),
        email,
        username,
        password_hash: PasswordHash::new(row.password_hash),
        role,
        promoted: row.promoted,
        created_at: row.created_at,
    }))
}

fn corrupt(err: impl std::fmt::Display) -> UserPersistenceError {
    UserPersistenceError::corrupt(err.to_string())
}

fn user_to_row(user: &User) -> UserRow {
    UserRow {
        id: *user.id().as_uuid(),
        email: user.email().as_ref().to_owned(),
        username: user.username().as_ref().to_owned(),
        password_hash: user.password_hash().as_ref().to_owned(),
        role: user.role().as_str().to_owned(),
        promoted: user.is_promoted(),
        created_at: user.created_at(),
    }
}

fn ordered(query: UsersQuery, sort: UserSort) -> UsersQuery {
    match sort {
        UserSort::CreatedDesc => query.order(users::created_at.desc()),
        UserSort::CreatedAsc => query.order(users::created_at.asc()),
        UserSort::UsernameAsc => query.order(users::username.asc()),
        UserSort::UsernameDesc => query.order(users::username.desc()),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        diesel::insert_into(users::table)
            .values(&user_to_row(user))
            .execute(&mut conn)
            .await
            .map_err(map_user_diesel_error)?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let changes = UserUpdate {
            role: user.role().as_str(),
            promoted: user.is_promoted(),
        };
        let updated = diesel::update(users::table.filter(users::id.eq(user.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_user_diesel_error)?;

        if updated == 0 {
            return Err(UserPersistenceError::query("user not found for update"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let id = *id.as_uuid();
        self.find_one(move |query| query.filter(users::id.eq(id)))
            .await
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let email = email.as_ref().to_owned();
        self.find_one(move |query| query.filter(users::email.eq(email)))
            .await
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let username = username.as_ref().to_owned();
        self.find_one(move |query| query.filter(users::username.eq(username)))
            .await
    }

    async fn list(&self, sort: UserSort) -> Result<Vec<User>, UserPersistenceError> {
        self.load_many(ordered(users::table.into_boxed(), sort))
            .await
    }

    async fn search(&self, fragment: &str) -> Result<Vec<User>, UserPersistenceError> {
        let query = users::table
            .into_boxed()
            .filter(users::username.ilike(like_pattern(fragment)));
        self.load_many(ordered(query, UserSort::UsernameAsc)).await
    }
}
