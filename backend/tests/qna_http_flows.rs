//! End-to-end flows through the HTTP adapter over in-memory storage.
//!
//! Each test signs real accounts up, so tokens, password hashing, policy
//! checks and aggregate rules all run as they do in production.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use support::{Api, authorised};

fn votes_of(body: &Value) -> &Vec<Value> {
    body["votes"].as_array().expect("votes array")
}

#[rstest]
#[actix_web::test]
async fn vote_lifecycle_upvote_downvote_unvote() {
    let api = Api::new();
    let author = api.signup("asker").await;
    let voter = api.signup("voter").await;
    let question = api.ask(&author, "Why is my iterator lazy?").await;

    let (status, body) = api
        .get(&format!("/api/votes/upvote/{question}"), Some(&voter))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], json!(10));
    assert_eq!(body["votes"], json!([{ "user": &voter.id, "vote": 10 }]));

    let (_, body) = api
        .get(&format!("/api/votes/downvote/{question}"), Some(&voter))
        .await;
    assert_eq!(body["score"], json!(-5));
    assert_eq!(votes_of(&body).len(), 1);

    let (_, body) = api
        .get(&format!("/api/votes/unvote/{question}"), Some(&voter))
        .await;
    assert_eq!(body["score"], json!(0));
    assert!(votes_of(&body).is_empty());
}

#[rstest]
#[actix_web::test]
async fn repeated_upvotes_count_once() {
    let api = Api::new();
    let author = api.signup("asker").await;
    let voter = api.signup("voter").await;
    let question = api.ask(&author, "Why is my iterator lazy?").await;

    for _ in 0..3 {
        api.get(&format!("/api/votes/upvote/{question}"), Some(&voter))
            .await;
    }
    let (_, body) = api.get(&format!("/api/question/{question}"), None).await;

    assert_eq!(body["score"], json!(10));
    assert_eq!(votes_of(&body).len(), 1);
}

#[rstest]
#[actix_web::test]
async fn self_votes_are_rejected_and_leave_scores_alone() {
    let api = Api::new();
    let author = api.signup("asker").await;
    let helper = api.signup("helper").await;
    let question = api.ask(&author, "Why is my iterator lazy?").await;
    let (_, answer) = api.answer(&helper, &question).await;
    let answer_id = answer["id"].as_str().expect("answer id").to_owned();

    let (on_question, _) = api
        .get(&format!("/api/votes/upvote/{question}"), Some(&author))
        .await;
    let (on_answer, _) = api
        .get(
            &format!("/api/votes/downvote/{question}/{answer_id}"),
            Some(&helper),
        )
        .await;
    let (_, body) = api.get(&format!("/api/question/{question}"), None).await;

    assert_eq!(on_question, StatusCode::BAD_REQUEST);
    assert_eq!(on_answer, StatusCode::BAD_REQUEST);
    assert_eq!(body["score"], json!(0));
    assert_eq!(body["answers"][0]["score"], json!(0));
}

#[rstest]
#[actix_web::test]
async fn one_answer_per_author_per_question() {
    let api = Api::new();
    let author = api.signup("asker").await;
    let helper = api.signup("helper").await;
    let first = api.ask(&author, "Why is my iterator lazy?").await;
    let sibling = api.ask(&author, "What does collect infer?").await;

    let (created, _) = api.answer(&helper, &first).await;
    let (duplicate, _) = api.answer(&helper, &first).await;
    let (elsewhere, _) = api.answer(&helper, &sibling).await;
    let (_, body) = api.get(&format!("/api/question/{first}"), None).await;

    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(duplicate, StatusCode::BAD_REQUEST);
    assert_eq!(elsewhere, StatusCode::CREATED);
    assert_eq!(body["answers"].as_array().expect("answers").len(), 1);
}

#[rstest]
#[actix_web::test]
async fn answered_questions_cannot_be_edited() {
    let api = Api::new();
    let author = api.signup("asker").await;
    let helper = api.signup("helper").await;
    let question = api.ask(&author, "Why is my iterator lazy?").await;
    api.answer(&helper, &question).await;

    let (status, _) = api
        .send(authorised(
            test::TestRequest::put()
                .uri(&format!("/api/question/{question}"))
                .set_json(json!({
                    "title": "A completely new title",
                    "text": "Some detail about the problem at hand.",
                    "tags": ["rust"],
                })),
            Some(&author),
        ))
        .await;
    let (_, body) = api.get(&format!("/api/question/{question}"), None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["title"], json!("Why is my iterator lazy?"));
}

#[rstest]
#[actix_web::test]
async fn viewing_counts_views() {
    let api = Api::new();
    let author = api.signup("asker").await;
    let question = api.ask(&author, "Why is my iterator lazy?").await;

    api.get(&format!("/api/question/{question}"), None).await;
    let (_, body) = api.get(&format!("/api/question/{question}"), None).await;

    assert_eq!(body["views"], json!(2));
}

#[rstest]
#[actix_web::test]
async fn profile_aggregates_activity() {
    let api = Api::new();
    let author = api.signup("asker").await;
    let helper = api.signup("helper").await;
    let question = api.ask(&author, "Why is my iterator lazy?").await;
    let (_, answer) = api.answer(&helper, &question).await;
    let answer_id = answer["id"].as_str().expect("answer id").to_owned();
    api.get(
        &format!("/api/votes/upvote/{question}/{answer_id}"),
        Some(&author),
    )
    .await;
    let (helpful, _) = api
        .get(
            &format!("/api/answer/helpful/{question}/{answer_id}"),
            Some(&author),
        )
        .await;

    let (status, profile) = api
        .get(&format!("/api/user/profile/{}", helper.id), None)
        .await;

    assert_eq!(helpful, StatusCode::OK);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], json!("helper"));
    assert_eq!(profile["answersGiven"], json!(1));
    assert_eq!(profile["answerScore"], json!(10));
    assert_eq!(profile["helpfulAnswers"], json!(1));
    assert_eq!(profile["questionsAsked"], json!(0));
}

#[rstest]
#[actix_web::test]
async fn only_owners_delete_questions() {
    let api = Api::new();
    let author = api.signup("asker").await;
    let stranger = api.signup("stranger").await;
    let question = api.ask(&author, "Why is my iterator lazy?").await;
    let uri = format!("/api/question/{question}");

    let (denied, _) = api
        .send(authorised(
            test::TestRequest::delete().uri(&uri),
            Some(&stranger),
        ))
        .await;
    let (deleted, body) = api
        .send(authorised(test::TestRequest::delete().uri(&uri), Some(&author)))
        .await;
    let (gone, _) = api.get(&uri, None).await;

    assert_eq!(denied, StatusCode::UNAUTHORIZED);
    assert_eq!(deleted, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Your question is successfully deleted." }));
    assert_eq!(gone, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn duplicate_usernames_are_refused() {
    let api = Api::new();
    api.signup("ada").await;

    let (status, body) = api
        .send(test::TestRequest::post().uri("/api/signup").set_json(json!({
            "email": "another@example.com",
            "username": "ada",
            "password": "hunter22",
        })))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!("Username already exists."));
}

#[rstest]
#[actix_web::test]
async fn login_round_trip_and_wrong_password() {
    let api = Api::new();
    api.signup("ada").await;

    let (ok, body) = api
        .send(test::TestRequest::post().uri("/api/authenticate").set_json(json!({
            "email": "ada@example.com",
            "password": "hunter22",
        })))
        .await;
    let (denied, _) = api
        .send(test::TestRequest::post().uri("/api/authenticate").set_json(json!({
            "email": "ada@example.com",
            "password": "hunter23",
        })))
        .await;

    assert_eq!(ok, StatusCode::OK);
    assert_eq!(body["message"], json!("Authentication successful!"));
    assert_eq!(denied, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn members_cannot_promote() {
    let api = Api::new();
    let member = api.signup("member").await;
    let target = api.signup("target").await;

    let (status, _) = api
        .get(
            &format!("/api/user/promoteToDiamond/{}", target.id),
            Some(&member),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn listing_filters_by_search_and_favorites() {
    let api = Api::new();
    let author = api.signup("asker").await;
    let fan = api.signup("fan").await;
    let lazy = api.ask(&author, "Why is my iterator lazy?").await;
    api.ask(&author, "What does collect infer?").await;
    api.get(&format!("/api/question/favorite/{lazy}"), Some(&fan))
        .await;

    let (_, by_title) = api
        .send(
            test::TestRequest::post()
                .uri("/api/question")
                .set_json(json!({ "search": "ITERATOR" })),
        )
        .await;
    let (_, favorites) = api
        .send(
            test::TestRequest::post()
                .uri("/api/question")
                .set_json(json!({ "favorite": &fan.id })),
        )
        .await;

    assert_eq!(by_title.as_array().expect("list").len(), 1);
    assert_eq!(favorites.as_array().expect("list").len(), 1);
    assert_eq!(favorites[0]["id"], json!(lazy));
}

#[rstest]
#[actix_web::test]
async fn unknown_routes_and_missing_tokens() {
    let api = Api::new();

    let (missing, body) = api.get("/api/nothing-here", None).await;
    let (unauthorised, error) = api
        .send(
            test::TestRequest::post()
                .uri("/api/questions")
                .set_json(json!({ "title": "Why is my iterator lazy?" })),
        )
        .await;

    assert_eq!(missing, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not found" }));
    assert_eq!(unauthorised, StatusCode::UNAUTHORIZED);
    assert_eq!(error["code"], json!("unauthorized"));
}

#[rstest]
#[actix_web::test]
async fn listing_with_a_malformed_body_is_refused() {
    let api = Api::new();
    let author = api.signup("asker").await;
    api.ask(&author, "Why is my iterator lazy?").await;

    let (refused, error) = api
        .send(
            test::TestRequest::post()
                .uri("/api/question")
                .set_json(json!({ "tags": "[rust]", "search": "ITERATOR" })),
        )
        .await;
    let (listed, all) = api
        .send(test::TestRequest::post().uri("/api/question"))
        .await;

    assert_eq!(refused, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], json!("invalid_request"));
    assert_eq!(listed, StatusCode::OK);
    assert_eq!(all.as_array().expect("list").len(), 1);
}

#[rstest]
#[actix_web::test]
async fn duplicates_and_ownership_outrank_field_rules() {
    let api = Api::new();
    let author = api.signup("asker").await;
    let helper = api.signup("helper").await;
    let question = api.ask(&author, "Why is my iterator lazy?").await;
    let (_, answer) = api.answer(&helper, &question).await;
    let answer_id = answer["id"].as_str().expect("answer id").to_owned();

    let (second, _) = api
        .send(authorised(
            test::TestRequest::post()
                .uri(&format!("/api/answer/{question}"))
                .set_json(json!({ "text": "short" })),
            Some(&helper),
        ))
        .await;
    let (foreign_edit, _) = api
        .send(authorised(
            test::TestRequest::put()
                .uri(&format!("/api/answer/{question}/{answer_id}"))
                .set_json(json!({ "text": "short" })),
            Some(&author),
        ))
        .await;
    let (own_edit, error) = api
        .send(authorised(
            test::TestRequest::put()
                .uri(&format!("/api/answer/{question}/{answer_id}"))
                .set_json(json!({ "text": "short" })),
            Some(&helper),
        ))
        .await;

    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(foreign_edit, StatusCode::UNAUTHORIZED);
    assert_eq!(own_edit, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["message"], json!("text must be at least 10 characters long"));
}
