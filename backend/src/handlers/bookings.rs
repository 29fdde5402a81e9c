use actix_web::{web, HttpResponse, Result};
use eazypg_shared::{
    AvailabilityQuery, BookingListQuery, CancelBookingRequest, CreateBookingRequest,
    SUCCESS_BOOKING_COMPLETED, SUCCESS_BOOKING_CONFIRMED, SUCCESS_BOOKING_CREATED,
    SUCCESS_BOOKING_REJECTED,
};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::BookingService;

pub async fn create_booking(
    user: AuthenticatedUser,
    request: web::Json<CreateBookingRequest>,
    booking_service: web::Data<BookingService>,
) -> Result<HttpResponse, AppError> {
    debug!(
        "Booking request from {} for listing {}",
        user.user_id, request.listing_id
    );
    let booking = booking_service
        .create(user.user_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": SUCCESS_BOOKING_CREATED,
        "booking": booking,
    })))
}

/// Bookings the caller made (`type=guest`) or received (`type=host`)
pub async fn list_bookings(
    user: AuthenticatedUser,
    query: web::Query<BookingListQuery>,
    booking_service: web::Data<BookingService>,
) -> Result<HttpResponse, AppError> {
    let bookings = booking_service
        .list(user.user_id, query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "bookings": bookings })))
}

pub async fn get_booking(
    user: AuthenticatedUser,
    booking_id: web::Path<Uuid>,
    booking_service: web::Data<BookingService>,
) -> Result<HttpResponse, AppError> {
    let booking = booking_service
        .get(user.user_id, booking_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "booking": booking })))
}

pub async fn confirm_booking(
    user: AuthenticatedUser,
    booking_id: web::Path<Uuid>,
    booking_service: web::Data<BookingService>,
) -> Result<HttpResponse, AppError> {
    let booking = booking_service
        .confirm(user.user_id, booking_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": SUCCESS_BOOKING_CONFIRMED,
        "booking": booking,
    })))
}

pub async fn reject_booking(
    user: AuthenticatedUser,
    booking_id: web::Path<Uuid>,
    booking_service: web::Data<BookingService>,
) -> Result<HttpResponse, AppError> {
    let booking = booking_service
        .reject(user.user_id, booking_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": SUCCESS_BOOKING_REJECTED,
        "booking": booking,
    })))
}

/// Cancel as guest or host. The body is optional.
pub async fn cancel_booking(
    user: AuthenticatedUser,
    booking_id: web::Path<Uuid>,
    request: Option<web::Json<CancelBookingRequest>>,
    booking_service: web::Data<BookingService>,
) -> Result<HttpResponse, AppError> {
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let cancelled = booking_service
        .cancel(user.user_id, booking_id.into_inner(), request)
        .await?;
    Ok(HttpResponse::Ok().json(cancelled))
}

pub async fn complete_booking(
    user: AuthenticatedUser,
    booking_id: web::Path<Uuid>,
    booking_service: web::Data<BookingService>,
) -> Result<HttpResponse, AppError> {
    let booking = booking_service
        .complete(user.user_id, booking_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": SUCCESS_BOOKING_COMPLETED,
        "booking": booking,
    })))
}

pub async fn listing_availability(
    listing_id: web::Path<Uuid>,
    query: web::Query<AvailabilityQuery>,
    booking_service: web::Data<BookingService>,
) -> Result<HttpResponse, AppError> {
    let availability = booking_service
        .availability(listing_id.into_inner(), query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(availability))
}
