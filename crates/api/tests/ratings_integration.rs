//! Integration tests for order ratings and profile aggregates.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;
use tower::ServiceExt;

async fn submit_rating(
    app: &axum::Router,
    token: &str,
    order_id: &str,
    body: serde_json::Value,
) -> axum::http::Response<axum::body::Body> {
    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/v1/orders/{}/ratings", order_id),
        body,
        token,
    );
    app.clone().oneshot(request).await.unwrap()
}

async fn complete_order(app: &axum::Router, seller: &TestUser, order_id: &str) {
    let response = app
        .clone()
        .oneshot(post_request_with_auth(
            &format!("/api/v1/orders/{}/complete", order_id),
            &seller.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn fetch_profile(app: &axum::Router, viewer: &TestUser, user_id: uuid::Uuid) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/profiles/{}", user_id),
            &viewer.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    parse_response_body(response).await
}

#[tokio::test]
async fn test_rating_requires_completed_or_delivered_order() {
    let (app, _pool) = create_test_app().await;
    let (_seller, buyer, order) = create_test_order(&app).await;

    // Confirmed is too early
    let response = submit_rating(
        &app,
        &buyer.token,
        order["id"].as_str().unwrap(),
        json!({ "score": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_both_parties_rate_after_completion() {
    let (app, _pool) = create_test_app().await;
    let (seller, buyer, order) = create_test_order(&app).await;
    let order_id = order["id"].as_str().unwrap();
    complete_order(&app, &seller, order_id).await;

    let response = submit_rating(
        &app,
        &buyer.token,
        order_id,
        json!({ "score": 5, "review": "Fast handoff at the door" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let rating = parse_response_body(response).await;
    assert_eq!(rating["rater_id"], buyer.user_id.to_string());
    assert_eq!(rating["rated_user_id"], seller.user_id.to_string());
    assert_eq!(rating["score"], 5);
    assert_eq!(rating["review"], "Fast handoff at the door");

    let response = submit_rating(&app, &seller.token, order_id, json!({ "score": 4 })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let rating = parse_response_body(response).await;
    assert_eq!(rating["rated_user_id"], buyer.user_id.to_string());
}

#[tokio::test]
async fn test_rating_allowed_after_delivery() {
    let (app, _pool) = create_test_app().await;
    let (_seller, buyer, order) = create_test_order(&app).await;
    let order_id = order["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(post_request_with_auth(
            &format!("/api/v1/orders/{}/deliver", order_id),
            &buyer.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = submit_rating(&app, &buyer.token, order_id, json!({ "score": 3 })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_rating_conflicts() {
    let (app, _pool) = create_test_app().await;
    let (seller, buyer, order) = create_test_order(&app).await;
    let order_id = order["id"].as_str().unwrap();
    complete_order(&app, &seller, order_id).await;

    let response = submit_rating(&app, &buyer.token, order_id, json!({ "score": 5 })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = submit_rating(&app, &buyer.token, order_id, json!({ "score": 1 })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rating_rejects_strangers_and_bad_scores() {
    let (app, _pool) = create_test_app().await;
    let (seller, buyer, order) = create_test_order(&app).await;
    let order_id = order["id"].as_str().unwrap();
    complete_order(&app, &seller, order_id).await;

    let response = submit_rating(&app, &TestUser::new().token, order_id, json!({ "score": 5 })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = submit_rating(&app, &buyer.token, order_id, json!({ "score": 0 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = submit_rating(&app, &buyer.token, order_id, json!({ "score": 6 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = submit_rating(
        &app,
        &buyer.token,
        order_id,
        json!({ "score": 4, "review": "x".repeat(501) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_aggregate_tracks_running_mean() {
    let (app, _pool) = create_test_app().await;
    let seller = TestUser::new();
    let venue = unique_venue();

    // Two delivered orders from different buyers, rated 5 and 2
    let mut buyers = Vec::new();
    for score in [5, 2] {
        let buyer = TestUser::new();
        let listing = create_test_listing(&app, &seller, "dining_offer", &venue).await;
        let order = accept_test_listing(&app, &buyer, listing["id"].as_str().unwrap()).await;
        let order_id = order["id"].as_str().unwrap();
        complete_order(&app, &seller, order_id).await;

        let response = submit_rating(&app, &buyer.token, order_id, json!({ "score": score })).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        buyers.push(buyer);
    }

    let profile = fetch_profile(&app, &buyers[0], seller.user_id).await;
    assert_eq!(profile["total_ratings"], 2);
    assert!((profile["rating"].as_f64().unwrap() - 3.5).abs() < 1e-9);

    // Ratings list is newest first and visible to anyone
    let response = app
        .oneshot(get_request_with_auth(
            &format!("/api/v1/profiles/{}/ratings", seller.user_id),
            &buyers[1].token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["score"], 2);
    assert_eq!(data[1]["score"], 5);
}

#[tokio::test]
async fn test_upsert_profile_keeps_aggregates_read_only() {
    let (app, _pool) = create_test_app().await;
    let (seller, buyer, order) = create_test_order(&app).await;
    let order_id = order["id"].as_str().unwrap();
    complete_order(&app, &seller, order_id).await;
    let response = submit_rating(&app, &buyer.token, order_id, json!({ "score": 4 })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = json_request_with_auth(
        Method::PUT,
        "/api/v1/profiles/me",
        json!({ "name": "Oski Bear", "email": "oski@berkeley.edu" }),
        &seller.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = parse_response_body(response).await;

    assert_eq!(profile["name"], "Oski Bear");
    assert_eq!(profile["email"], "oski@berkeley.edu");
    assert_eq!(profile["total_ratings"], 1);
    assert!((profile["rating"].as_f64().unwrap() - 4.0).abs() < 1e-9);

    // Contact fields never leak through the public view
    let public = fetch_profile(&app, &buyer, seller.user_id).await;
    assert!(public.get("email").is_none());
    assert_eq!(public["name"], "Oski Bear");
}

#[tokio::test]
async fn test_concurrent_ratings_from_both_parties() {
    let (app, _pool) = create_test_app().await;
    let (seller, buyer, order) = create_test_order(&app).await;
    let order_id = order["id"].as_str().unwrap().to_string();
    complete_order(&app, &seller, &order_id).await;

    let mut handles = Vec::new();
    for (user, score) in [(&seller, 5), (&buyer, 3)] {
        let app = app.clone();
        let token = user.token.clone();
        let order_id = order_id.clone();
        handles.push(tokio::spawn(async move {
            let request = json_request_with_auth(
                Method::POST,
                &format!("/api/v1/orders/{}/ratings", order_id),
                json!({ "score": score }),
                &token,
            );
            app.oneshot(request).await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    let seller_profile = fetch_profile(&app, &buyer, seller.user_id).await;
    assert_eq!(seller_profile["total_ratings"], 1);
    assert!((seller_profile["rating"].as_f64().unwrap() - 3.0).abs() < 1e-9);

    let buyer_profile = fetch_profile(&app, &seller, buyer.user_id).await;
    assert_eq!(buyer_profile["total_ratings"], 1);
    assert!((buyer_profile["rating"].as_f64().unwrap() - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_concurrent_ratings_serialize_on_one_profile() {
    let (app, _pool) = create_test_app().await;
    let seller = TestUser::new();
    let venue = unique_venue();
    let scores = [5, 4, 3];

    // Three completed orders sold by the same seller to distinct buyers
    let mut raters = Vec::new();
    for score in scores {
        let buyer = TestUser::new();
        let listing = create_test_listing(&app, &seller, "dining_offer", &venue).await;
        let order = accept_test_listing(&app, &buyer, listing["id"].as_str().unwrap()).await;
        let order_id = order["id"].as_str().unwrap().to_string();
        complete_order(&app, &seller, &order_id).await;
        raters.push((buyer, order_id, score));
    }

    // All three buyers rate the seller at once; each submission must fold
    // into the aggregate without losing another's increment
    let mut handles = Vec::new();
    for (buyer, order_id, score) in raters {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let request = json_request_with_auth(
                Method::POST,
                &format!("/api/v1/orders/{}/ratings", order_id),
                json!({ "score": score }),
                &buyer.token,
            );
            app.oneshot(request).await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    let profile = fetch_profile(&app, &TestUser::new(), seller.user_id).await;
    assert_eq!(profile["total_ratings"], 3);
    let mean = scores.iter().sum::<i32>() as f64 / scores.len() as f64;
    assert!((profile["rating"].as_f64().unwrap() - mean).abs() < 1e-9);
}
