use actix_web::{http::StatusCode, test};
use chrono::{Duration, Utc};
use eazypg_shared::{CreateBookingRequest, GuestCounts, PaymentMethod};
use serde_json::{json, Value};
use uuid::Uuid;

#[macro_use]
mod utils;

use utils::test_helpers::{bearer, listing_body, TestContext};

/// A booking that has been stayed and completed.
async fn completed_booking(ctx: &TestContext, host_id: Uuid, guest_id: Uuid, listing_id: Uuid) -> Uuid {
    let check_in = Utc::now() + Duration::days(20);
    let booking = ctx
        .services
        .bookings
        .create(
            guest_id,
            CreateBookingRequest {
                listing_id,
                check_in,
                check_out: check_in + Duration::days(2),
                guests: GuestCounts {
                    adults: 2,
                    children: 0,
                    infants: 0,
                    pets: 0,
                },
                guest_details: None,
                payment_method: PaymentMethod::ApplePay,
                special_requests: None,
            },
        )
        .await
        .unwrap();
    ctx.services.bookings.confirm(host_id, booking.id).await.unwrap();

    let mut stored = ctx.repos.bookings.find_by_id(booking.id).await.unwrap().unwrap();
    stored.check_in = Utc::now() - Duration::days(4);
    stored.check_out = Utc::now() - Duration::days(2);
    ctx.repos.bookings.update(&stored, false).await.unwrap();
    ctx.services.bookings.complete(host_id, booking.id).await.unwrap();
    booking.id
}

#[actix_web::test]
async fn test_review_lifecycle() {
    let ctx = TestContext::new();
    let (host_id, host_token) = ctx.user("host@example.com").await;
    let (guest_id, guest_token) = ctx.user("guest@example.com").await;
    let (_, voter_token) = ctx.user("voter@example.com").await;
    let listing_id = ctx.approved_listing(host_id, listing_body("Sedona", 180)).await;
    let booking_id = completed_booking(&ctx, host_id, guest_id, listing_id).await;
    let app = test_app!(ctx);

    let review = json!({
        "booking_id": booking_id,
        "ratings": { "overall": 4, "cleanliness": 5 },
        "comment": "Wonderful views",
        "review_type": "guest_to_host"
    });

    let req = test::TestRequest::post()
        .uri("/api/reviews")
        .insert_header(bearer(&host_token))
        .set_json(&review)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/reviews")
        .insert_header(bearer(&guest_token))
        .set_json(&review)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let review_id = body["review"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/reviews")
        .insert_header(bearer(&guest_token))
        .set_json(&review)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Review already submitted");

    let req = test::TestRequest::get()
        .uri(&format!("/api/listings/{}", listing_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["listing"]["rating"]["average"].as_f64(), Some(4.0));
    assert_eq!(body["listing"]["rating"]["count"], 1);

    let req = test::TestRequest::post()
        .uri(&format!("/api/reviews/{}/response", review_id))
        .insert_header(bearer(&host_token))
        .set_json(json!({ "text": "Come back soon" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["review"]["response"]["text"], "Come back soon");

    let req = test::TestRequest::post()
        .uri(&format!("/api/reviews/{}/helpful", review_id))
        .insert_header(bearer(&voter_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Marked as helpful");
    assert_eq!(body["helpful_count"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/reviews/listing/{}?limit=5", listing_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(body["reviews"][0]["reviewer"]["first_name"], "Test");
    assert_eq!(body["pagination"]["limit"], 5);
}

#[actix_web::test]
async fn test_review_requires_completed_booking() {
    let ctx = TestContext::new();
    let (host_id, _) = ctx.user("host@example.com").await;
    let (_, guest_token) = ctx.user("guest@example.com").await;
    let listing_id = ctx.approved_listing(host_id, listing_body("Sedona", 180)).await;
    let app = test_app!(ctx);

    let check_in = Utc::now() + Duration::days(10);
    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header(bearer(&guest_token))
        .set_json(json!({
            "listing_id": listing_id,
            "check_in": check_in,
            "check_out": check_in + Duration::days(2),
            "guests": { "adults": 1 },
            "payment_method": "paypal"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/reviews")
        .insert_header(bearer(&guest_token))
        .set_json(json!({
            "booking_id": body["booking"]["id"],
            "ratings": { "overall": 5 },
            "comment": "Not yet stayed",
            "review_type": "guest_to_host"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Can only review completed bookings");
}

#[actix_web::test]
async fn test_contact_tickets() {
    let ctx = TestContext::new();
    let (_, owner_token) = ctx.user("owner@example.com").await;
    let (_, other_token) = ctx.user("other@example.com").await;
    let app = test_app!(ctx);

    let ticket = json!({
        "name": "Owner",
        "email": "owner@example.com",
        "subject": "Refund question",
        "message": "When will my refund arrive?",
        "category": "payment"
    });

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .insert_header(bearer(&owner_token))
        .set_json(&ticket)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let owned_id = body["ticket_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(&ticket)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let anonymous_id = body["ticket_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/contact")
        .insert_header(bearer(&owner_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["contacts"].as_array().unwrap().len(), 1);
    assert_eq!(body["contacts"][0]["category"], "payment");

    let req = test::TestRequest::get()
        .uri(&format!("/api/contact/{}", owned_id))
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/contact/{}", anonymous_id))
        .insert_header(bearer(&other_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["contact"]["status"], "open");

    let req = test::TestRequest::get()
        .uri(&format!("/api/contact/{}", owned_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
