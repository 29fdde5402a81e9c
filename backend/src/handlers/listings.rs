use actix_web::{web, HttpResponse, Result};
use eazypg_shared::{
    BlockDatesRequest, CreateListingRequest, ListingSearchQuery, UpdateListingRequest,
    SUCCESS_LISTING_CREATED, SUCCESS_LISTING_DELETED, SUCCESS_LISTING_UPDATED,
};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::ListingService;

/// Search approved listings
pub async fn search_listings(
    query: web::Query<ListingSearchQuery>,
    listing_service: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    debug!("Listing search: {:?}", query);
    let page = listing_service.search(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn featured_listings(
    listing_service: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    let listings = listing_service.featured().await?;
    Ok(HttpResponse::Ok().json(json!({ "listings": listings })))
}

pub async fn host_listings(
    host_id: web::Path<Uuid>,
    listing_service: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    let listings = listing_service.by_host(host_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "listings": listings })))
}

pub async fn get_listing(
    listing_id: web::Path<Uuid>,
    listing_service: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    let listing = listing_service.get(listing_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "listing": listing })))
}

pub async fn create_listing(
    user: AuthenticatedUser,
    request: web::Json<CreateListingRequest>,
    listing_service: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    let listing = listing_service
        .create(user.user_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": SUCCESS_LISTING_CREATED,
        "listing": listing,
    })))
}

pub async fn update_listing(
    user: AuthenticatedUser,
    listing_id: web::Path<Uuid>,
    request: web::Json<UpdateListingRequest>,
    listing_service: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    let listing = listing_service
        .update(user.user_id, listing_id.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": SUCCESS_LISTING_UPDATED,
        "listing": listing,
    })))
}

pub async fn delete_listing(
    user: AuthenticatedUser,
    listing_id: web::Path<Uuid>,
    listing_service: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    listing_service
        .delete(user.user_id, listing_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": SUCCESS_LISTING_DELETED })))
}

/// Host blocks a date range by hand
pub async fn block_dates(
    user: AuthenticatedUser,
    listing_id: web::Path<Uuid>,
    request: web::Json<BlockDatesRequest>,
    listing_service: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    let block = listing_service
        .block_dates(user.user_id, listing_id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(json!({ "blocked_date": block })))
}

pub async fn unblock_dates(
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    listing_service: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    let (listing_id, block_id) = path.into_inner();
    listing_service
        .unblock_dates(user.user_id, listing_id, block_id)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Blocked dates removed" })))
}
