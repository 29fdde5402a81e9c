#![allow(dead_code)]

use eazypg_backend::repositories::Repositories;
use eazypg_backend::services::Services;
use eazypg_backend::utils::jwt::JwtService;
use eazypg_shared::{ListingStatus, RegisterRequest, UpdateListingRequest};
use serde_json::{json, Value};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only-must-be-at-least-32-chars";

/// Services over a fresh in-memory store. The repositories share that store
/// so tests can reach behind the API when they need to.
pub struct TestContext {
    pub services: Services,
    pub repos: Repositories,
}

impl TestContext {
    pub fn new() -> Self {
        let repos = Repositories::in_memory();
        let jwt = JwtService::new(TEST_JWT_SECRET, 24).expect("test JWT service");
        Self {
            services: Services::new(repos.clone(), jwt),
            repos,
        }
    }

    /// Register a user and return their id and bearer token.
    pub async fn user(&self, email: &str) -> (Uuid, String) {
        let auth = self
            .services
            .auth
            .register(RegisterRequest {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: email.to_string(),
                password: "password123".to_string(),
                phone: None,
            })
            .await
            .expect("register test user");
        (auth.user.id, auth.token)
    }

    /// Create a listing for `host_id` from `body` and approve it.
    pub async fn approved_listing(&self, host_id: Uuid, body: Value) -> Uuid {
        let request = serde_json::from_value(body).expect("listing request");
        let listing = self
            .services
            .listings
            .create(host_id, request)
            .await
            .expect("create listing");

        self.services
            .listings
            .update(
                host_id,
                listing.id,
                UpdateListingRequest {
                    status: Some(ListingStatus::Approved),
                    ..Default::default()
                },
            )
            .await
            .expect("approve listing");
        listing.id
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn listing_body(city: &str, base_price: i64) -> Value {
    json!({
        "title": format!("Stay in {}", city),
        "description": "Bright two bedroom home",
        "property_type": "house",
        "location": {
            "address": "1 Test Way",
            "city": city,
            "state": "CA",
            "zip_code": "94000"
        },
        "capacity": {
            "guests": 4,
            "bedrooms": 2,
            "beds": 2,
            "bathrooms": 1.5
        },
        "amenities": ["wifi", "kitchen"],
        "pricing": {
            "base_price": base_price,
            "cleaning_fee": 30,
            "service_fee": 15
        }
    })
}
