//! Answer handlers. Answers live inside their question, so every route names
//! both ids.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AnswerId, AnswerText, ApiResult, Error, QuestionId};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{AnswerResponse, QuestionResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{answer_id, question_id, required};

/// Body for posting or editing an answer.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AnswerRequest {
    #[schema(example = "Return an owned value instead of a reference.")]
    pub text: Option<String>,
}

impl TryFrom<AnswerRequest> for AnswerText {
    type Error = Error;

    fn try_from(value: AnswerRequest) -> Result<Self, Self::Error> {
        Ok(Self::new(required("text", value.text)?)?)
    }
}

fn answer_path(path: &(String, String)) -> Result<(QuestionId, AnswerId), Error> {
    Ok((question_id(&path.0)?, answer_id(&path.1)?))
}

/// Post the caller's answer. Each user may answer a question once.
#[utoipa::path(
    post,
    path = "/api/answer/{question}",
    params(("question" = String, Path, description = "Question id")),
    request_body = AnswerRequest,
    responses(
        (status = 201, description = "Answer created", body = AnswerResponse),
        (status = 400, description = "Already answered or malformed id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown question", body = Error),
        (status = 422, description = "Validation failed", body = Error)
    ),
    tags = ["answers"],
    operation_id = "addAnswer"
)]
#[post("/answer/{question}")]
pub async fn add_answer(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<AnswerRequest>,
) -> ApiResult<HttpResponse> {
    let question = question_id(&path)?;
    let text = AnswerText::try_from(payload.into_inner());
    let answer = state
        .questions
        .add_answer(user.actor(), &question, text)
        .await?;
    Ok(HttpResponse::Created().json(AnswerResponse::from(&answer)))
}

/// Flip the helpful flag. Only the question author or a moderator may.
#[utoipa::path(
    get,
    path = "/api/answer/helpful/{question}/{answer}",
    params(
        ("question" = String, Path, description = "Question id"),
        ("answer" = String, Path, description = "Answer id")
    ),
    responses(
        (status = 200, description = "Question with updated answer", body = QuestionResponse),
        (status = 401, description = "Not the question owner or a moderator", body = Error),
        (status = 404, description = "Unknown question or answer", body = Error)
    ),
    tags = ["answers"],
    operation_id = "toggleHelpful"
)]
#[get("/answer/helpful/{question}/{answer}")]
pub async fn toggle_helpful(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let (question, answer) = answer_path(&path)?;
    let updated = state
        .questions
        .toggle_helpful(user.actor(), &question, &answer)
        .await?;
    Ok(web::Json(QuestionResponse::from(&updated)))
}

#[utoipa::path(
    put,
    path = "/api/answer/{question}/{answer}",
    params(
        ("question" = String, Path, description = "Question id"),
        ("answer" = String, Path, description = "Answer id")
    ),
    request_body = AnswerRequest,
    responses(
        (status = 201, description = "Updated answer", body = AnswerResponse),
        (status = 401, description = "Not the answer owner or a moderator", body = Error),
        (status = 404, description = "Unknown question or answer", body = Error),
        (status = 422, description = "Validation failed", body = Error)
    ),
    tags = ["answers"],
    operation_id = "updateAnswer"
)]
#[put("/answer/{question}/{answer}")]
pub async fn update_answer(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    payload: web::Json<AnswerRequest>,
) -> ApiResult<HttpResponse> {
    let (question, answer) = answer_path(&path)?;
    let text = AnswerText::try_from(payload.into_inner());
    let updated = state
        .questions
        .update_answer(user.actor(), &question, &answer, text)
        .await?;
    Ok(HttpResponse::Created().json(AnswerResponse::from(&updated)))
}

#[utoipa::path(
    delete,
    path = "/api/answer/{question}/{answer}",
    params(
        ("question" = String, Path, description = "Question id"),
        ("answer" = String, Path, description = "Answer id")
    ),
    responses(
        (status = 200, description = "Question without the answer", body = QuestionResponse),
        (status = 401, description = "Not the answer owner or a moderator", body = Error),
        (status = 404, description = "Unknown question or answer", body = Error)
    ),
    tags = ["answers"],
    operation_id = "deleteAnswer"
)]
#[delete("/answer/{question}/{answer}")]
pub async fn delete_answer(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let (question, answer) = answer_path(&path)?;
    let updated = state
        .questions
        .delete_answer(user.actor(), &question, &answer)
        .await?;
    Ok(web::Json(QuestionResponse::from(&updated)))
}
