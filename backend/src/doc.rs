//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the JSON payload schemas and the
//! bearer token security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::answers::AnswerRequest;
use crate::inbound::http::questions::{QuestionListRequest, QuestionRequest};
use crate::inbound::http::schemas::{
    AnswerResponse, AuthResponse, MessageResponse, ProfileResponse, QuestionResponse,
    UserResponse, VoteResponse,
};
use crate::inbound::http::users::{AuthenticateRequest, SignupRequest};

/// Name of the bearer security scheme referenced by authenticated paths.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the JWT bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/signup or POST /api/authenticate.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Q&A backend API",
        description = "Questions, answers, votes and user profiles.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::authenticate,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::search_users,
        crate::inbound::http::users::find_user,
        crate::inbound::http::users::profile,
        crate::inbound::http::users::promote_to_diamond,
        crate::inbound::http::questions::create_question,
        crate::inbound::http::questions::list_questions,
        crate::inbound::http::questions::view_question,
        crate::inbound::http::questions::update_question,
        crate::inbound::http::questions::favorite_question,
        crate::inbound::http::questions::delete_question,
        crate::inbound::http::answers::add_answer,
        crate::inbound::http::answers::toggle_helpful,
        crate::inbound::http::answers::update_answer,
        crate::inbound::http::answers::delete_answer,
        crate::inbound::http::votes::vote_question,
        crate::inbound::http::votes::vote_answer,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignupRequest,
        AuthenticateRequest,
        QuestionRequest,
        QuestionListRequest,
        AnswerRequest,
        UserResponse,
        AuthResponse,
        MessageResponse,
        VoteResponse,
        AnswerResponse,
        QuestionResponse,
        ProfileResponse,
    )),
    tags(
        (name = "users", description = "Accounts, directory and profiles"),
        (name = "questions", description = "Asking, editing and browsing questions"),
        (name = "answers", description = "Answers nested inside questions"),
        (name = "votes", description = "Up- and downvotes on questions and answers"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
