//! Account domain service: signup, authentication and promotion.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, AuthSession, PasswordHasher, PasswordHasherError, TokenError, TokenService,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Action, Actor, Error, LoginCredentials, SignupCredentials, User, UserId, authorize,
};

const USERNAME_TAKEN: &str = "Username already exists.";
const EMAIL_TAKEN: &str = "Email already exists.";
const WRONG_CREDENTIALS: &str = "Wrong email or password.";

/// Map user repository failures onto domain errors.
pub(crate) fn map_user_repo_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => Error::conflict(EMAIL_TAKEN),
        UserPersistenceError::DuplicateUsername => Error::conflict(USERNAME_TAKEN),
        UserPersistenceError::Corrupt { message } => {
            Error::internal(format!("stored user is invalid: {message}"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    Error::internal(error.to_string())
}

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
}

impl<U> AccountService<U> {
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U> AccountService<U>
where
    U: UserRepository,
{
    fn open_session(&self, user: User) -> Result<AuthSession, Error> {
        let token = self
            .tokens
            .issue(&user, self.clock.utc())
            .map_err(map_token_error)?;
        Ok(AuthSession { user, token })
    }
}

#[async_trait]
impl<U> AccountCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn signup(&self, credentials: SignupCredentials) -> Result<AuthSession, Error> {
        if self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_repo_error)?
            .is_some()
        {
            return Err(Error::conflict(USERNAME_TAKEN));
        }
        if self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_repo_error)?
            .is_some()
        {
            return Err(Error::conflict(EMAIL_TAKEN));
        }

        let hash = self
            .hasher
            .hash(credentials.password())
            .map_err(map_hasher_error)?;
        let user = User::register(
            credentials.email().clone(),
            credentials.username().clone(),
            hash,
            self.clock.utc(),
        );
        // A concurrent signup can still win the race; the store's unique
        // constraints surface it as a conflict.
        self.users.insert(&user).await.map_err(map_user_repo_error)?;
        info!(user_id = %user.id(), username = %user.username(), "account created");
        self.open_session(user)
    }

    async fn authenticate(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_repo_error)?
        else {
            return Err(Error::forbidden(WRONG_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .map_err(map_hasher_error)?;
        if !verified {
            warn!(user_id = %user.id(), "password verification failed");
            return Err(Error::forbidden(WRONG_CREDENTIALS));
        }

        info!(user_id = %user.id(), "user authenticated");
        self.open_session(user)
    }

    async fn promote_to_diamond(&self, actor: &Actor, id: &UserId) -> Result<User, Error> {
        authorize(actor, Action::PromoteUser)?;
        let mut user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_repo_error)?
            .ok_or_else(|| Error::not_found("User not found."))?;
        user.promote_to_diamond();
        self.users.update(&user).await.map_err(map_user_repo_error)?;
        info!(user_id = %id, admin = %actor.id, "user promoted");
        Ok(user)
    }
}
