//! HTTP inbound adapter exposing the REST endpoints under `/api`.

pub mod answers;
pub mod auth;
pub mod error;
pub mod health;
pub mod questions;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod votes;

pub use error::json_error_handler;

use actix_web::{HttpResponse, web};

use self::schemas::MessageResponse;

/// Register every `/api` endpoint on `cfg`.
///
/// Shared by the server and the end-to-end tests so both route requests
/// identically.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(users::signup)
        .service(users::authenticate)
        .service(users::list_users)
        .service(users::search_users)
        .service(users::profile)
        .service(users::promote_to_diamond)
        .service(users::find_user)
        .service(questions::create_question)
        .service(questions::list_questions)
        .service(questions::favorite_question)
        .service(questions::view_question)
        .service(questions::update_question)
        .service(questions::delete_question)
        .service(answers::add_answer)
        .service(answers::toggle_helpful)
        .service(answers::update_answer)
        .service(answers::delete_answer)
        .service(votes::vote_question)
        .service(votes::vote_answer);
}

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(MessageResponse::new("Not found"))
}
