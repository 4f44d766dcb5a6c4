//! Voting on questions and answers.
//!
//! ```text
//! GET /api/votes/upvote/{question}
//! GET /api/votes/downvote/{question}/{answer}
//! GET /api/votes/unvote/{question}
//! ```

use actix_web::{get, web};

use crate::domain::{ApiResult, Error, VoteCommand, VoteTarget};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::QuestionResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{answer_id, question_id};

fn vote_command(raw: &str) -> Result<VoteCommand, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("Unknown vote command: {raw}.")))
}

async fn cast(
    state: &HttpState,
    user: &AuthenticatedUser,
    command: &str,
    question: &str,
    answer: Option<&str>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let command = vote_command(command)?;
    let question = question_id(question)?;
    let target = match answer {
        Some(raw) => VoteTarget::Answer(answer_id(raw)?),
        None => VoteTarget::Question,
    };
    let updated = state
        .questions
        .vote(user.actor(), &question, target, command)
        .await?;
    Ok(web::Json(QuestionResponse::from(&updated)))
}

/// Vote on a question. Authors cannot vote on their own content.
#[utoipa::path(
    get,
    path = "/api/votes/{command}/{question}",
    params(
        ("command" = String, Path, description = "`upvote`, `downvote` or `unvote`"),
        ("question" = String, Path, description = "Question id")
    ),
    responses(
        (status = 200, description = "Question with updated votes", body = QuestionResponse),
        (status = 400, description = "Own content or malformed id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown question or command", body = Error)
    ),
    tags = ["votes"],
    operation_id = "voteQuestion"
)]
#[get("/votes/{command}/{question}")]
pub async fn vote_question(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let (command, question) = path.into_inner();
    cast(&state, &user, &command, &question, None).await
}

/// Vote on an answer. Returns the enclosing question.
#[utoipa::path(
    get,
    path = "/api/votes/{command}/{question}/{answer}",
    params(
        ("command" = String, Path, description = "`upvote`, `downvote` or `unvote`"),
        ("question" = String, Path, description = "Question id"),
        ("answer" = String, Path, description = "Answer id")
    ),
    responses(
        (status = 200, description = "Question with updated answer votes", body = QuestionResponse),
        (status = 400, description = "Own content or malformed id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown question, answer or command", body = Error)
    ),
    tags = ["votes"],
    operation_id = "voteAnswer"
)]
#[get("/votes/{command}/{question}/{answer}")]
pub async fn vote_answer(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String, String)>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let (command, question, answer) = path.into_inner();
    cast(&state, &user, &command, &question, Some(&answer)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Question, QuestionDraft, UserId};
    use crate::inbound::http::test_utils::{TestPorts, bearer, member};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Utc;
    use rstest::rstest;

    const QUESTION: &str = "77777777-7777-7777-7777-777777777777";
    const ANSWER: &str = "88888888-8888-8888-8888-888888888888";

    fn question() -> Question {
        let draft = QuestionDraft::try_from_parts(
            Some("Which allocator to choose?"),
            Some("Benchmarks disagree with each other."),
            Some(&["alloc".to_owned()]),
        )
        .expect("draft");
        Question::new(UserId::random(), draft, Utc::now())
    }

    async fn send(ports: TestPorts, uri: &str) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .service(web::scope("/api").service(vote_question).service(vote_answer)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", bearer("tok")))
            .to_request();
        test::call_service(&app, req).await
    }

    #[rstest]
    #[case::upvote("upvote", VoteCommand::Upvote)]
    #[case::downvote("downvote", VoteCommand::Downvote)]
    #[case::unvote("unvote", VoteCommand::Unvote)]
    #[actix_web::test]
    async fn question_votes_target_the_question(
        #[case] segment: &str,
        #[case] expected: VoteCommand,
    ) {
        let mut ports = TestPorts::default().with_token("tok", member());
        ports
            .questions
            .expect_vote()
            .withf(move |_, id, target, command| {
                id.to_string() == QUESTION
                    && *target == VoteTarget::Question
                    && *command == expected
            })
            .return_once(|_, _, _, _| Ok(question()));

        let res = send(ports, &format!("/api/votes/{segment}/{QUESTION}")).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn answer_votes_target_the_answer() {
        let mut ports = TestPorts::default().with_token("tok", member());
        ports
            .questions
            .expect_vote()
            .withf(|_, _, target, _| {
                matches!(target, VoteTarget::Answer(id) if id.to_string() == ANSWER)
            })
            .return_once(|_, _, _, _| Ok(question()));

        let res = send(ports, &format!("/api/votes/upvote/{QUESTION}/{ANSWER}")).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn self_votes_surface_as_bad_request() {
        let mut ports = TestPorts::default().with_token("tok", member());
        ports
            .questions
            .expect_vote()
            .return_once(|_, _, _, _| Err(Error::invalid_request("You can't vote on your own content.")));

        let res = send(ports, &format!("/api/votes/upvote/{QUESTION}")).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_command_is_not_found() {
        let ports = TestPorts::default().with_token("tok", member());

        let res = send(ports, &format!("/api/votes/sidevote/{QUESTION}")).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Error = test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::NotFound);
    }
}
