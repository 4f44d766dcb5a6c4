//! Read-side user service: listings, search, lookup and profiles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account_service::map_user_repo_error;
use crate::domain::ports::{
    QuestionFilter, QuestionRepository, QuestionSort, UserRepository, UserSort, UsersQuery,
};
use crate::domain::question_service::map_question_repo_error;
use crate::domain::{Error, Profile, ProfileStats, User, UserId};

/// Service implementing [`UsersQuery`].
#[derive(Clone)]
pub struct UserDirectoryService<U, Q> {
    users: Arc<U>,
    questions: Arc<Q>,
}

impl<U, Q> UserDirectoryService<U, Q> {
    pub fn new(users: Arc<U>, questions: Arc<Q>) -> Self {
        Self { users, questions }
    }
}

#[async_trait]
impl<U, Q> UsersQuery for UserDirectoryService<U, Q>
where
    U: UserRepository,
    Q: QuestionRepository,
{
    async fn list_users(&self, sort: UserSort) -> Result<Vec<User>, Error> {
        self.users.list(sort).await.map_err(map_user_repo_error)
    }

    async fn search_users(&self, fragment: &str) -> Result<Vec<User>, Error> {
        self.users
            .search(fragment.trim())
            .await
            .map_err(map_user_repo_error)
    }

    async fn find_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_repo_error)?
            .ok_or_else(|| Error::not_found("User not found."))
    }

    async fn profile(&self, id: &UserId) -> Result<Profile, Error> {
        let user = self.find_user(id).await?;
        // Full scan: answers live inside question rows.
        let questions = self
            .questions
            .find(&QuestionFilter::default(), QuestionSort::default())
            .await
            .map_err(map_question_repo_error)?;
        let stats = ProfileStats::collect(id, &questions);
        Ok(Profile { user, stats })
    }
}
