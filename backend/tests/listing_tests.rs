use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

#[macro_use]
mod utils;

use utils::test_helpers::{bearer, listing_body, TestContext};

#[actix_web::test]
async fn test_create_listing_starts_pending_and_makes_host() {
    let ctx = TestContext::new();
    let (host_id, token) = ctx.user("host@example.com").await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/listings")
        .insert_header(bearer(&token))
        .set_json(listing_body("Monterey", 150))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["listing"]["status"], "pending");
    assert_eq!(body["listing"]["location"]["country"], "USA");
    assert_eq!(body["listing"]["pricing"]["currency"], "USD");
    assert_eq!(body["listing"]["availability"]["min_nights"], 1);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["user"]["id"], host_id.to_string());
    assert_eq!(me["user"]["is_host"], true);
}

#[actix_web::test]
async fn test_create_listing_requires_auth() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/listings")
        .set_json(listing_body("Monterey", 150))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_search_filters_and_paginates() {
    let ctx = TestContext::new();
    let (host_id, token) = ctx.user("host@example.com").await;
    ctx.approved_listing(host_id, listing_body("San Diego", 200)).await;
    ctx.approved_listing(host_id, listing_body("San Jose", 100)).await;
    ctx.approved_listing(host_id, listing_body("Fresno", 80)).await;
    ctx.services
        .listings
        .create(host_id, serde_json::from_value(listing_body("San Mateo", 90)).unwrap())
        .await
        .unwrap();
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/listings?city=san&sort=price&limit=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["pagination"]["pages"], 2);
    assert_eq!(body["listings"].as_array().unwrap().len(), 1);
    assert_eq!(body["listings"][0]["location"]["city"], "San Jose");
    assert_eq!(body["listings"][0]["host"]["first_name"], "Test");

    let req = test::TestRequest::get()
        .uri("/api/listings?amenities=wifi,kitchen&guests=4")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["total"], 3);

    let req = test::TestRequest::get()
        .uri("/api/listings?guests=5")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["total"], 0);
}

#[actix_web::test]
async fn test_search_rejects_unknown_sort() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/listings?sort=cheapest")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_static_routes_win_over_listing_id() {
    let ctx = TestContext::new();
    let (host_id, _) = ctx.user("host@example.com").await;
    ctx.approved_listing(host_id, listing_body("Napa", 300)).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/api/listings/featured").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["listings"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/listings/host/{}", host_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["listings"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_get_listing_counts_views() {
    let ctx = TestContext::new();
    let (host_id, _) = ctx.user("host@example.com").await;
    let listing_id = ctx.approved_listing(host_id, listing_body("Napa", 300)).await;
    let app = test_app!(ctx);

    for expected in 1..=2 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/listings/{}", listing_id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["listing"]["views"], expected);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/listings/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/listings/not-a-uuid").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_only_host_can_update_or_delete() {
    let ctx = TestContext::new();
    let (host_id, host_token) = ctx.user("host@example.com").await;
    let (_, other_token) = ctx.user("other@example.com").await;
    let listing_id = ctx.approved_listing(host_id, listing_body("Napa", 300)).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::put()
        .uri(&format!("/api/listings/{}", listing_id))
        .insert_header(bearer(&other_token))
        .set_json(json!({ "title": "Mine now" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/listings/{}", listing_id))
        .insert_header(bearer(&host_token))
        .set_json(json!({ "title": "Vineyard cottage" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["listing"]["title"], "Vineyard cottage");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/listings/{}", listing_id))
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/listings/{}", listing_id))
        .insert_header(bearer(&host_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_blocked_dates_round_trip() {
    let ctx = TestContext::new();
    let (host_id, token) = ctx.user("host@example.com").await;
    let listing_id = ctx.approved_listing(host_id, listing_body("Napa", 300)).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri(&format!("/api/listings/{}/blocked-dates", listing_id))
        .insert_header(bearer(&token))
        .set_json(json!({ "from": "2030-06-10T00:00:00Z", "to": "2030-06-01T00:00:00Z" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_dates");

    let req = test::TestRequest::post()
        .uri(&format!("/api/listings/{}/blocked-dates", listing_id))
        .insert_header(bearer(&token))
        .set_json(json!({ "from": "2030-06-01T00:00:00Z", "to": "2030-06-10T00:00:00Z" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let block_id = body["blocked_date"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/bookings/listing/{}/availability?check_in=2030-06-05T00:00:00Z&check_out=2030-06-07T00:00:00Z",
            listing_id
        ))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["available"], false);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/listings/{}/blocked-dates/{}", listing_id, block_id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/listings/{}/blocked-dates/{}", listing_id, block_id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_booked_listing_cannot_be_deleted() {
    let ctx = TestContext::new();
    let (host_id, host_token) = ctx.user("host@example.com").await;
    let (_, guest_token) = ctx.user("guest@example.com").await;
    let listing_id = ctx.approved_listing(host_id, listing_body("Napa", 300)).await;
    let app = test_app!(ctx);

    let check_in = chrono::Utc::now() + chrono::Duration::days(30);
    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header(bearer(&guest_token))
        .set_json(json!({
            "listing_id": listing_id,
            "check_in": check_in,
            "check_out": check_in + chrono::Duration::days(3),
            "guests": { "adults": 2 },
            "payment_method": "credit_card"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/listings/{}", listing_id))
        .insert_header(bearer(&host_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/api/bookings")
        .insert_header(bearer(&guest_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
}
