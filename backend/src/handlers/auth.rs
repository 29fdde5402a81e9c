use actix_web::{web, HttpResponse, Result};
use eazypg_shared::{LoginRequest, RegisterRequest};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::AuthService;

/// Create an account and sign the new user in.
pub async fn register(
    request: web::Json<RegisterRequest>,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn login(
    request: web::Json<LoginRequest>,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn me(
    user: AuthenticatedUser,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    debug!("Loading profile for {}", user.user_id);
    let profile = auth_service.current_user(user.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": profile })))
}
