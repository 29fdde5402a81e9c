use actix_web::{web, HttpResponse, Result};
use eazypg_shared::{
    CreateReviewRequest, PageQuery, ReviewReplyRequest, SUCCESS_REVIEW_CREATED,
    SUCCESS_REVIEW_RESPONSE,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::ReviewService;

pub async fn create_review(
    user: AuthenticatedUser,
    request: web::Json<CreateReviewRequest>,
    review_service: web::Data<ReviewService>,
) -> Result<HttpResponse, AppError> {
    let review = review_service
        .create(user.user_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": SUCCESS_REVIEW_CREATED,
        "review": review,
    })))
}

pub async fn listing_reviews(
    listing_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
    review_service: web::Data<ReviewService>,
) -> Result<HttpResponse, AppError> {
    let page = review_service
        .list_for_listing(listing_id.into_inner(), query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn respond_to_review(
    user: AuthenticatedUser,
    review_id: web::Path<Uuid>,
    request: web::Json<ReviewReplyRequest>,
    review_service: web::Data<ReviewService>,
) -> Result<HttpResponse, AppError> {
    let review = review_service
        .respond(user.user_id, review_id.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": SUCCESS_REVIEW_RESPONSE,
        "review": review,
    })))
}

pub async fn toggle_helpful(
    user: AuthenticatedUser,
    review_id: web::Path<Uuid>,
    review_service: web::Data<ReviewService>,
) -> Result<HttpResponse, AppError> {
    let response = review_service
        .toggle_helpful(user.user_id, review_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
