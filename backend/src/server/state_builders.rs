//! Builders for the HTTP state: storage adapters, credentials and services.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use backend::domain::ports::{PasswordHasher, QuestionRepository, TokenService, UserRepository};
use backend::domain::{AccountService, QuestionService, UserDirectoryService};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::{InMemoryQuestionRepository, InMemoryUserRepository};
use backend::outbound::persistence::{
    DbPool, DieselQuestionRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::config::AppSettings;

/// Credential adapters shared by every service.
struct Credentials {
    tokens: Arc<dyn TokenService>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl Credentials {
    fn from_settings(settings: &AppSettings) -> Self {
        if settings.uses_default_secret() {
            warn!("signing tokens with the development secret; set QNA_TOKEN_SECRET");
        }
        Self {
            tokens: Arc::new(JwtTokenService::new(
                settings.token_secret().as_bytes(),
                settings.token_ttl(),
            )),
            hasher: Arc::new(Argon2PasswordHasher::new()),
            clock: Arc::new(DefaultClock),
        }
    }
}

/// Wire domain services over one pair of repositories.
fn wire<U, Q>(users: Arc<U>, questions: Arc<Q>, credentials: Credentials) -> HttpState
where
    U: UserRepository + 'static,
    Q: QuestionRepository + 'static,
{
    let Credentials {
        tokens,
        hasher,
        clock,
    } = credentials;
    let accounts = AccountService::new(users.clone(), hasher, tokens.clone(), clock.clone());
    let directory = UserDirectoryService::new(users, questions.clone());
    let question_service = Arc::new(QuestionService::new(questions, clock));
    HttpState {
        accounts: Arc::new(accounts),
        users: Arc::new(directory),
        questions: question_service.clone(),
        questions_query: question_service,
        tokens,
    }
}

/// Build the HTTP state from settings.
///
/// With a database URL, pending migrations are applied and Diesel
/// repositories share one pool. Without one, state lives in memory and is
/// lost on restart.
///
/// # Errors
/// Returns [`std::io::Error`] when migrations fail or the pool cannot be
/// built.
pub(crate) async fn build_http_state(
    settings: &AppSettings,
) -> std::io::Result<web::Data<HttpState>> {
    let credentials = Credentials::from_settings(settings);
    let state = match settings.database_url() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await
            .map_err(|err| std::io::Error::other(err.to_string()))?;
            info!(
                max_connections = settings.db_max_connections(),
                "using PostgreSQL store"
            );
            wire(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselQuestionRepository::new(pool)),
                credentials,
            )
        }
        None => {
            warn!("no database configured; using the in-memory store");
            wire(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryQuestionRepository::new()),
                credentials,
            )
        }
    };
    Ok(web::Data::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::domain::SignupCredentials;
    use rstest::rstest;

    fn memory_settings() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            token_secret: Some("unit-test-secret".to_owned()),
            token_ttl_days: 1,
            db_max_connections: 10,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn memory_state_issues_verifiable_tokens() {
        let state = build_http_state(&memory_settings()).await.expect("state");
        let credentials =
            SignupCredentials::try_from_parts("ada@example.com", "ada", "hunter22").expect("creds");

        let session = state.accounts.signup(credentials).await.expect("signup");
        let actor = state.tokens.verify(&session.token.token).expect("verify");

        assert_eq!(actor.id, *session.user.id());
    }
}
