use super::*;

const SECRET: &str = "test-secret-key-for-testing-only-must-be-at-least-32-chars";

fn setup_jwt_service() -> JwtService {
    JwtService::new(SECRET, 24).expect("Failed to create JWT service")
}

#[test]
fn test_token_round_trip() {
    let jwt_service = setup_jwt_service();
    let user_id = Uuid::new_v4();

    let token = jwt_service
        .issue_token(user_id, "guest@example.com")
        .expect("Failed to issue token");
    let claims = jwt_service
        .validate_token(&token)
        .expect("Failed to validate token");

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.email, "guest@example.com");
    assert_eq!(claims.exp - claims.iat, 24 * 3600);
}

#[test]
fn test_short_secret_is_rejected() {
    assert!(JwtService::new("too-short", 24).is_err());
}

#[test]
fn test_non_positive_expiry_is_rejected() {
    assert!(JwtService::new(SECRET, 0).is_err());
}

#[test]
fn test_invalid_token() {
    let jwt_service = setup_jwt_service();
    let result = jwt_service.validate_token("invalid.token.here");
    assert!(matches!(result, Err(AppError::Authentication(_))));
}

#[test]
fn test_token_from_other_secret_is_rejected() {
    let other = JwtService::new("another-secret-key-that-is-also-long-enough", 24).unwrap();
    let token = other.issue_token(Uuid::new_v4(), "x@example.com").unwrap();

    let result = setup_jwt_service().validate_token(&token);
    assert!(matches!(result, Err(AppError::Authentication(_))));
}

#[test]
fn test_expired_token() {
    let jwt_service = setup_jwt_service();
    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "late@example.com".to_string(),
        exp: (now - Duration::hours(2)).timestamp(),
        iat: (now - Duration::hours(26)).timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    match jwt_service.validate_token(&token) {
        Err(AppError::Authentication(msg)) => assert_eq!(msg, "Token has expired"),
        other => panic!("expected expiry error, got {:?}", other.map(|c| c.sub)),
    }
}
