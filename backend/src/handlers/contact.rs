use actix_web::{web, HttpResponse, Result};
use eazypg_shared::ContactRequest;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::{AuthenticatedUser, OptionalUser};
use crate::services::ContactService;

/// Contact form. Works with or without a bearer token.
pub async fn submit_contact(
    user: OptionalUser,
    request: web::Json<ContactRequest>,
    contact_service: web::Data<ContactService>,
) -> Result<HttpResponse, AppError> {
    let submitted = contact_service
        .submit(user.user_id(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(submitted))
}

pub async fn list_contacts(
    user: AuthenticatedUser,
    contact_service: web::Data<ContactService>,
) -> Result<HttpResponse, AppError> {
    let contacts = contact_service.list(user.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "contacts": contacts })))
}

pub async fn get_contact(
    user: AuthenticatedUser,
    contact_id: web::Path<Uuid>,
    contact_service: web::Data<ContactService>,
) -> Result<HttpResponse, AppError> {
    let contact = contact_service
        .get(user.user_id, contact_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "contact": contact })))
}
