//! Question handlers: create, list, view, edit, favorite and delete.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{QuestionFilter, QuestionSort};
use crate::domain::{ApiResult, Error, QuestionDraft};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{MessageResponse, QuestionResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{question_id, user_id};

/// Body for creating or editing a question.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct QuestionRequest {
    #[schema(example = "How do lifetimes work?")]
    pub title: Option<String>,
    #[schema(example = "I keep fighting the borrow checker when returning references.")]
    pub text: Option<String>,
    #[schema(example = json!(["rust", "lifetimes"]))]
    pub tags: Option<Vec<String>>,
}

impl TryFrom<QuestionRequest> for QuestionDraft {
    type Error = Error;

    fn try_from(value: QuestionRequest) -> Result<Self, Self::Error> {
        Ok(Self::try_from_parts(
            value.title.as_deref(),
            value.text.as_deref(),
            value.tags.as_deref(),
        )?)
    }
}

/// Listing criteria for `POST /api/question`. Every field is optional.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionListRequest {
    /// One of `-score` (default), `score`, `-created`, `created`, `-views`,
    /// `views`.
    #[schema(example = "-score")]
    pub sort_type: Option<String>,
    /// Only questions carrying all of these tags.
    pub tags: Option<Vec<String>>,
    /// Case-insensitive title fragment.
    pub search: Option<String>,
    /// Only questions favorited by this user id.
    pub favorite: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

impl QuestionListRequest {
    /// Decode a listing body. An empty body means "no criteria"; anything
    /// else must be a well-formed request.
    fn from_body(body: &[u8]) -> Result<Self, Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|err| Error::invalid_request(format!("Malformed request body: {err}")))
    }

    fn into_criteria(self) -> Result<(QuestionFilter, QuestionSort), Error> {
        let sort = match non_empty(self.sort_type) {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::invalid_request(format!("Unknown sort type: {raw}.")))?,
            None => QuestionSort::default(),
        };
        let favorited_by = non_empty(self.favorite)
            .map(|raw| user_id(&raw))
            .transpose()?;
        let filter = QuestionFilter {
            title_contains: non_empty(self.search),
            tags: self.tags.unwrap_or_default(),
            favorited_by,
        };
        Ok((filter, sort))
    }
}

#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = QuestionRequest,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 422, description = "Validation failed", body = Error)
    ),
    tags = ["questions"],
    operation_id = "createQuestion"
)]
#[post("/questions")]
pub async fn create_question(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<QuestionRequest>,
) -> ApiResult<HttpResponse> {
    let draft = QuestionDraft::try_from(payload.into_inner())?;
    let question = state.questions.create_question(user.actor(), draft).await?;
    Ok(HttpResponse::Created().json(QuestionResponse::from(&question)))
}

/// Filtered and sorted question listing.
#[utoipa::path(
    post,
    path = "/api/question",
    request_body = QuestionListRequest,
    responses(
        (status = 200, description = "Questions", body = [QuestionResponse]),
        (status = 400, description = "Malformed body, unknown sort type or malformed user id", body = Error)
    ),
    tags = ["questions"],
    operation_id = "listQuestions",
    security([])
)]
#[post("/question")]
pub async fn list_questions(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<web::Json<Vec<QuestionResponse>>> {
    let (filter, sort) = QuestionListRequest::from_body(&body)?.into_criteria()?;
    let questions = state.questions_query.list_questions(filter, sort).await?;
    Ok(web::Json(
        questions.iter().map(QuestionResponse::from).collect(),
    ))
}

/// Show a question and count the view.
#[utoipa::path(
    get,
    path = "/api/question/{id}",
    params(("id" = String, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question", body = QuestionResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Unknown question", body = Error)
    ),
    tags = ["questions"],
    operation_id = "viewQuestion",
    security([])
)]
#[get("/question/{id}")]
pub async fn view_question(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let id = question_id(&path)?;
    let question = state.questions_query.view_question(&id).await?;
    Ok(web::Json(QuestionResponse::from(&question)))
}

/// Replace title, text and tags while the question has no answers.
#[utoipa::path(
    put,
    path = "/api/question/{id}",
    params(("id" = String, Path, description = "Question id")),
    request_body = QuestionRequest,
    responses(
        (status = 200, description = "Updated question", body = QuestionResponse),
        (status = 401, description = "Not the owner or a moderator", body = Error),
        (status = 404, description = "Unknown question", body = Error),
        (status = 422, description = "Validation failed or already answered", body = Error)
    ),
    tags = ["questions"],
    operation_id = "updateQuestion"
)]
#[put("/question/{id}")]
pub async fn update_question(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<QuestionRequest>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let id = question_id(&path)?;
    let draft = QuestionDraft::try_from(payload.into_inner());
    let question = state
        .questions
        .update_question(user.actor(), &id, draft)
        .await?;
    Ok(web::Json(QuestionResponse::from(&question)))
}

/// Toggle the caller's favorite mark.
#[utoipa::path(
    get,
    path = "/api/question/favorite/{id}",
    params(("id" = String, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question with updated favorites", body = QuestionResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown question", body = Error)
    ),
    tags = ["questions"],
    operation_id = "favoriteQuestion"
)]
#[get("/question/favorite/{id}")]
pub async fn favorite_question(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let id = question_id(&path)?;
    let question = state.questions.toggle_favorite(user.actor(), &id).await?;
    Ok(web::Json(QuestionResponse::from(&question)))
}

#[utoipa::path(
    delete,
    path = "/api/question/{id}",
    params(("id" = String, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question deleted", body = MessageResponse),
        (status = 401, description = "Not the owner or a moderator", body = Error),
        (status = 404, description = "Unknown question", body = Error)
    ),
    tags = ["questions"],
    operation_id = "deleteQuestion"
)]
#[delete("/question/{id}")]
pub async fn delete_question(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = question_id(&path)?;
    state.questions.delete_question(user.actor(), &id).await?;
    Ok(web::Json(MessageResponse::new(
        "Your question is successfully deleted.",
    )))
}
