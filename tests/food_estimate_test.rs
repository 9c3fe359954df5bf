//! Food-estimate route against a mocked LLM endpoint.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn eggs_reply() -> Value {
    chat_reply(Value::String(
        json!({
            "items": [
                {
                    "name": "eggs",
                    "approxCaloriesPer100g": 155,
                    "approxProteinPer100g": 13,
                    "approxCarbsPer100g": 1.1,
                    "approxFatPer100g": 11,
                    "notes": "two large eggs"
                },
                {
                    "name": "toast with butter",
                    "approxCaloriesPer100g": null,
                    "approxProteinPer100g": null,
                    "approxCarbsPer100g": null,
                    "approxFatPer100g": null,
                    "notes": "bread type unknown"
                }
            ]
        })
        .to_string(),
    ))
}

#[tokio::test]
async fn estimates_are_decoded_into_food_items() -> TestResult {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("authorization", format!("Bearer {}", STATIC_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(eggs_reply()))
        .expect(1)
        .mount(&llm)
        .await;

    let app = app(settings(&llm.uri(), UNUSED_BASE, static_credentials()));
    let (status, body) = send(
        app,
        post_json("/api/food-estimate", &json!({ "query": "  2 eggs and toast with butter " })),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "eggs");
    assert_eq!(items[0]["caloriesPer100g"], 155.0);
    assert_eq!(items[0]["notes"], "two large eggs");
    assert!(items[1]["caloriesPer100g"].is_null());

    let requests = llm.received_requests().await.expect("recording enabled");
    let sent: Value = serde_json::from_slice(&requests[0].body)?;
    assert_eq!(sent["model"], MODEL);
    assert_eq!(sent["stream"], false);
    assert_eq!(sent["messages"].as_array().map(Vec::len), Some(2));
    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][1]["role"], "user");
    assert_eq!(sent["messages"][1]["content"], "2 eggs and toast with butter");

    Ok(())
}

#[tokio::test]
async fn profile_is_sent_as_background_context() -> TestResult {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(eggs_reply()))
        .mount(&llm)
        .await;

    let app = app(settings(&llm.uri(), UNUSED_BASE, static_credentials()));
    let (status, _) = send(
        app,
        post_json(
            "/api/food-estimate",
            &json!({
                "query": "eggs",
                "profile": { "goal": "gain", "diet": "High-protein", "targetCalories": 2600 }
            }),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let requests = llm.received_requests().await.expect("recording enabled");
    let sent: Value = serde_json::from_slice(&requests[0].body)?;
    let contents = message_contents(&sent);
    assert_eq!(contents.len(), 3);
    assert!(contents[1].starts_with("User profile JSON:\n"));
    assert!(contents[1].contains("High-protein"));
    assert_eq!(contents[2], "eggs");

    Ok(())
}

#[tokio::test]
async fn blank_query_is_rejected_without_calling_the_model() -> TestResult {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&llm)
        .await;

    let app = app(settings(&llm.uri(), UNUSED_BASE, static_credentials()));

    let (status, body) = send(app.clone(), post_json("/api/food-estimate", &json!({ "query": "   " }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing query");

    let (status, body) = send(app, post_json("/api/food-estimate", &json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    Ok(())
}

#[tokio::test]
async fn malformed_request_body_is_a_bad_request() -> TestResult {
    let app = app(settings(UNUSED_BASE, UNUSED_BASE, static_credentials()));
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/food-estimate")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"query\": "))?;

    let (status, body) = send(app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    Ok(())
}

#[tokio::test]
async fn prose_reply_is_a_server_error() -> TestResult {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(Value::String(
            "Eggs have roughly 155 kcal per 100 g.".to_string(),
        ))))
        .mount(&llm)
        .await;

    let app = app(settings(&llm.uri(), UNUSED_BASE, static_credentials()));
    let (status, body) = send(app, post_json("/api/food-estimate", &json!({ "query": "eggs" }))).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INVALID_MODEL_OUTPUT");
    assert_eq!(body["error"], "Model did not return valid JSON");

    Ok(())
}

#[tokio::test]
async fn reply_with_extra_keys_is_rejected() -> TestResult {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(json!({
            "items": [{ "name": "eggs", "servingSize": "2 large" }]
        }))))
        .mount(&llm)
        .await;

    let app = app(settings(&llm.uri(), UNUSED_BASE, static_credentials()));
    let (status, body) = send(app, post_json("/api/food-estimate", &json!({ "query": "eggs" }))).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INVALID_MODEL_OUTPUT");

    Ok(())
}

#[tokio::test]
async fn upstream_failure_is_a_bad_gateway() -> TestResult {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("model overloaded"))
        .expect(1)
        .mount(&llm)
        .await;

    let app = app(settings(&llm.uri(), UNUSED_BASE, static_credentials()));
    let (status, body) = send(app, post_json("/api/food-estimate", &json!({ "query": "eggs" }))).await?;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert!(!body["error"].as_str().unwrap_or_default().contains("overloaded"));

    Ok(())
}

#[tokio::test]
async fn missing_credentials_fail_before_any_network_call() -> TestResult {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(eggs_reply()))
        .expect(0)
        .mount(&llm)
        .await;

    let app = app(settings(&llm.uri(), UNUSED_BASE, no_credentials()));
    let (status, body) = send(app, post_json("/api/food-estimate", &json!({ "query": "eggs" }))).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CONFIGURATION_ERROR");
    assert!(body["error"].as_str().unwrap_or_default().contains("GCP_ACCESS_TOKEN"));

    Ok(())
}

#[tokio::test]
async fn request_id_is_forwarded_and_echoed() -> TestResult {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("x-request-id", "req-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(eggs_reply()))
        .expect(1)
        .mount(&llm)
        .await;

    let app = app(settings(&llm.uri(), UNUSED_BASE, static_credentials()));
    let mut request = post_json("/api/food-estimate", &json!({ "query": "eggs" }));
    request
        .headers_mut()
        .insert("x-request-id", "req-42".parse()?);

    let response = tower::ServiceExt::oneshot(app, request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").map(|v| v.as_bytes()),
        Some("req-42".as_bytes())
    );

    Ok(())
}

#[tokio::test]
async fn null_notes_in_reply_are_accepted() -> TestResult {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(json!({
            "items": [{
                "name": "water",
                "approxCaloriesPer100g": 0,
                "approxProteinPer100g": 0,
                "approxCarbsPer100g": 0,
                "approxFatPer100g": 0,
                "notes": null
            }]
        }))))
        .mount(&llm)
        .await;

    let app = app(settings(&llm.uri(), UNUSED_BASE, static_credentials()));
    let (status, body) = send(app, post_json("/api/food-estimate", &json!({ "query": "water" }))).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "water");
    assert_eq!(body["items"][0]["caloriesPer100g"], 0.0);

    Ok(())
}

#[tokio::test]
async fn missing_credentials_win_over_a_blank_query() -> TestResult {
    let app = app(settings(UNUSED_BASE, UNUSED_BASE, no_credentials()));

    let (status, body) = send(app.clone(), post_json("/api/food-estimate", &json!({ "query": "" }))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CONFIGURATION_ERROR");

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/food-estimate")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("not json"))?;
    let (status, body) = send(app, request).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CONFIGURATION_ERROR");

    Ok(())
}
