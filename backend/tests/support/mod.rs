//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`. This
//! module wires the real domain services over the in-memory adapters and
//! drives them through the actix test harness, so each test exercises the
//! full HTTP stack without a database.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use argon2::Params;
use mockable::DefaultClock;
use serde_json::{Value, json};

use backend::Trace;
use backend::domain::{AccountService, QuestionService, UserDirectoryService};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{configure_api, not_found};
use backend::outbound::memory::{InMemoryQuestionRepository, InMemoryUserRepository};
use backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};

const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Argon2 parameters cheap enough for debug-build test runs.
fn fast_hasher() -> Argon2PasswordHasher {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("argon2 params");
    Argon2PasswordHasher::with_params(params)
}

/// Handler state over fresh in-memory repositories.
pub fn memory_state() -> web::Data<HttpState> {
    let users = Arc::new(InMemoryUserRepository::new());
    let questions = Arc::new(InMemoryQuestionRepository::new());
    let tokens = Arc::new(JwtTokenService::new(TEST_SECRET, chrono::Duration::days(90)));
    let clock = Arc::new(DefaultClock);
    let question_service = Arc::new(QuestionService::new(questions.clone(), clock.clone()));
    web::Data::new(HttpState {
        accounts: Arc::new(AccountService::new(
            users.clone(),
            Arc::new(fast_hasher()),
            tokens.clone(),
            clock,
        )),
        users: Arc::new(UserDirectoryService::new(users, questions)),
        questions: question_service.clone(),
        questions_query: question_service,
        tokens,
    })
}

/// A registered account as seen by tests.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub token: String,
}

/// Drives requests against one shared state.
pub struct Api {
    state: web::Data<HttpState>,
}

impl Api {
    pub fn new() -> Self {
        Self {
            state: memory_state(),
        }
    }

    /// Send `req` and decode the JSON body (`Null` when empty).
    pub async fn send(&self, req: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(self.state.clone())
                .wrap(Trace)
                .service(web::scope("/api").configure(configure_api))
                .default_service(web::to(not_found)),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("JSON body")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, account: Option<&Account>) -> (StatusCode, Value) {
        self.send(authorised(test::TestRequest::get().uri(uri), account))
            .await
    }

    pub async fn signup(&self, username: &str) -> Account {
        let (status, body) = self
            .send(test::TestRequest::post().uri("/api/signup").set_json(json!({
                "email": format!("{username}@example.com"),
                "username": username,
                "password": "hunter22",
            })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        Account {
            id: body["userInfo"]["id"].as_str().expect("user id").to_owned(),
            token: body["token"].as_str().expect("token").to_owned(),
        }
    }

    /// Ask a question and return its id.
    pub async fn ask(&self, author: &Account, title: &str) -> String {
        let (status, body) = self
            .send(authorised(
                test::TestRequest::post().uri("/api/questions").set_json(json!({
                    "title": title,
                    "text": "Some detail about the problem at hand.",
                    "tags": ["rust"],
                })),
                Some(author),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "ask failed: {body}");
        body["id"].as_str().expect("question id").to_owned()
    }

    pub async fn answer(&self, author: &Account, question: &str) -> (StatusCode, Value) {
        self.send(authorised(
            test::TestRequest::post()
                .uri(&format!("/api/answer/{question}"))
                .set_json(json!({ "text": "Here is a detailed answer." })),
            Some(author),
        ))
        .await
    }
}

/// Attach the account's bearer token, if any.
pub fn authorised(req: test::TestRequest, account: Option<&Account>) -> test::TestRequest {
    match account {
        Some(account) => req.insert_header((AUTHORIZATION, format!("Bearer {}", account.token))),
        None => req,
    }
}
