use chrono::{DateTime, Utc};
use eazypg_shared::{
    AvailabilityQuery, AvailabilityResponse, BookingListQuery, BookingResponse, BookingStatus,
    CancelBookingRequest, CancelBookingResponse, CreateBookingRequest, DateRangeResponse,
    ListingStatus, PaymentStatus, ERROR_BOOKING_NOT_FOUND, ERROR_CANNOT_CANCEL,
    ERROR_LISTING_NOT_FOUND, ERROR_NOT_AUTHORIZED, ERROR_NOT_AVAILABLE, ERROR_TOO_MANY_GUESTS,
    SUCCESS_BOOKING_CANCELLED,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::{unavailable_ranges, user_summaries};
use crate::error::AppError;
use crate::models::{BlockedDate, Booking, Listing, NewBooking};
use crate::repositories::{BookingRepository, ListingRepository, UserRepository};
use crate::rules::{
    can_cancel, compute_breakdown, compute_refund, is_available, nights_between, StayRequest,
};

/// Booking lifecycle service: creation, host decisions, cancellation and
/// completion.
#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    listings: Arc<dyn ListingRepository>,
    users: Arc<dyn UserRepository>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        listings: Arc<dyn ListingRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            bookings,
            listings,
            users,
        }
    }

    pub async fn create(
        &self,
        guest_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        request.validate()?;

        let listing = self.find_listing(request.listing_id).await?;
        if listing.status != ListingStatus::Approved {
            return Err(AppError::Validation(
                "Listing is not accepting bookings".to_string(),
            ));
        }
        if listing.host_id == guest_id {
            return Err(AppError::Validation(
                "Hosts cannot book their own listing".to_string(),
            ));
        }

        let stay = StayRequest::new(request.check_in, request.check_out, request.guests.counted())?;
        if stay.check_in() < Utc::now() {
            return Err(AppError::Validation(
                "Check-in date must be in the future".to_string(),
            ));
        }

        let nights = nights_between(stay.check_in(), stay.check_out());
        if nights < listing.min_nights || nights > listing.max_nights {
            return Err(AppError::Validation(format!(
                "Stay must be between {} and {} nights",
                listing.min_nights, listing.max_nights
            )));
        }
        if stay.guest_count() > listing.max_guests {
            return Err(AppError::Validation(ERROR_TOO_MANY_GUESTS.to_string()));
        }

        let blocked =
            unavailable_ranges(self.listings.as_ref(), self.bookings.as_ref(), listing.id).await?;
        if !is_available(&blocked, &stay) {
            debug!("Stay {:?} collides with {} blocked ranges", stay, blocked.len());
            return Err(AppError::Validation(ERROR_NOT_AVAILABLE.to_string()));
        }

        let breakdown = compute_breakdown(&listing.pricing(), &stay);
        let booking = Booking::from_new(NewBooking {
            guest_id,
            host_id: listing.host_id,
            stay,
            base_price: listing.base_price,
            breakdown,
            currency: listing.currency.clone(),
            request,
        });
        let hold = BlockedDate::new(listing.id, Some(booking.id), stay.range());

        let booking = self
            .bookings
            .create_with_hold(&booking, &hold)
            .await
            .map_err(|err| match err {
                AppError::Conflict(_) => {
                    warn!("Concurrent booking of listing {} lost the race", listing.id);
                    AppError::Conflict(ERROR_NOT_AVAILABLE.to_string())
                }
                other => other,
            })?;

        info!(
            "Booking {} created for listing {} ({} nights, total {})",
            booking.id, listing.id, booking.nights, booking.total
        );
        self.hydrate_one(booking).await
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        query: BookingListQuery,
    ) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = self
            .bookings
            .find_for_user(user_id, query.party.unwrap_or_default(), query.status)
            .await?;
        self.hydrate(bookings).await
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<BookingResponse, AppError> {
        let booking = self.find(id).await?;
        if !booking.is_party(user_id) {
            return Err(AppError::Authorization(
                "Not authorized to view this booking".to_string(),
            ));
        }
        self.hydrate_one(booking).await
    }

    /// Host accepts a pending booking. Payment is recorded as taken.
    pub async fn confirm(&self, user_id: Uuid, id: Uuid) -> Result<BookingResponse, AppError> {
        let mut booking = self.find_as_host(user_id, id).await?;
        transition(&mut booking, BookingStatus::Confirmed, "Booking cannot be confirmed")?;
        booking.payment_status = PaymentStatus::Completed;
        booking.paid_at = Some(Utc::now());

        let booking = self.bookings.update(&booking, false).await?;
        info!("Booking {} confirmed", id);
        self.hydrate_one(booking).await
    }

    /// Host declines a pending booking and its dates are released.
    pub async fn reject(&self, user_id: Uuid, id: Uuid) -> Result<BookingResponse, AppError> {
        let mut booking = self.find_as_host(user_id, id).await?;
        transition(&mut booking, BookingStatus::Rejected, "Booking cannot be rejected")?;

        let booking = self.bookings.update(&booking, true).await?;
        info!("Booking {} rejected", id);
        self.hydrate_one(booking).await
    }

    pub async fn cancel(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: CancelBookingRequest,
    ) -> Result<CancelBookingResponse, AppError> {
        request.validate()?;

        let mut booking = self.find(id).await?;
        if !booking.is_party(user_id) {
            return Err(AppError::Authorization(ERROR_NOT_AUTHORIZED.to_string()));
        }

        let now = Utc::now();
        if !can_cancel(booking.check_in, now, booking.status) {
            return Err(AppError::Validation(ERROR_CANNOT_CANCEL.to_string()));
        }

        let refund = compute_refund(booking.check_in, now, booking.total);
        transition(&mut booking, BookingStatus::Cancelled, ERROR_CANNOT_CANCEL)?;
        booking.cancelled_by = Some(user_id);
        booking.cancelled_at = Some(now);
        booking.cancellation_reason = request.reason;
        booking.refund_amount = Some(refund);
        if refund > Decimal::ZERO && booking.payment_status == PaymentStatus::Completed {
            booking.payment_status = PaymentStatus::Refunded;
        }

        let booking = self.bookings.update(&booking, true).await?;
        info!("Booking {} cancelled by {}, refund {}", id, user_id, refund);

        Ok(CancelBookingResponse {
            message: SUCCESS_BOOKING_CANCELLED.to_string(),
            booking: self.hydrate_one(booking).await?,
            refund_amount: refund,
        })
    }

    /// Host closes a confirmed stay once checkout has passed.
    pub async fn complete(&self, user_id: Uuid, id: Uuid) -> Result<BookingResponse, AppError> {
        let mut booking = self.find_as_host(user_id, id).await?;
        if booking.check_out > Utc::now() {
            return Err(AppError::Validation(
                "Booking cannot be completed before check-out".to_string(),
            ));
        }
        transition(&mut booking, BookingStatus::Completed, "Booking cannot be completed")?;

        let booking = self.bookings.update(&booking, false).await?;
        info!("Booking {} completed", id);
        self.hydrate_one(booking).await
    }

    /// Sweep confirmed bookings whose checkout is before `now` into completed.
    pub async fn complete_past_bookings(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let completed = self.bookings.complete_past(now).await?;
        if completed > 0 {
            info!("Marked {} past bookings as completed", completed);
        }
        Ok(completed)
    }

    pub async fn availability(
        &self,
        listing_id: Uuid,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityResponse, AppError> {
        let listing = self.find_listing(listing_id).await?;
        let blocked =
            unavailable_ranges(self.listings.as_ref(), self.bookings.as_ref(), listing.id).await?;

        let available = match (query.check_in, query.check_out) {
            (Some(check_in), Some(check_out)) => {
                let stay = StayRequest::new(check_in, check_out, 1)?;
                is_available(&blocked, &stay)
            }
            _ => true,
        };

        Ok(AvailabilityResponse {
            available,
            unavailable_dates: blocked
                .iter()
                .map(|range| DateRangeResponse {
                    from: range.from(),
                    to: range.to(),
                })
                .collect(),
            min_nights: listing.min_nights,
            max_nights: listing.max_nights,
        })
    }

    async fn find(&self, id: Uuid) -> Result<Booking, AppError> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_BOOKING_NOT_FOUND.to_string()))
    }

    async fn find_as_host(&self, user_id: Uuid, id: Uuid) -> Result<Booking, AppError> {
        let booking = self.find(id).await?;
        if booking.host_id != user_id {
            return Err(AppError::Authorization(ERROR_NOT_AUTHORIZED.to_string()));
        }
        Ok(booking)
    }

    async fn find_listing(&self, id: Uuid) -> Result<Listing, AppError> {
        self.listings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_LISTING_NOT_FOUND.to_string()))
    }

    async fn hydrate_one(&self, booking: Booking) -> Result<BookingResponse, AppError> {
        let mut hydrated = self.hydrate(vec![booking]).await?;
        hydrated
            .pop()
            .ok_or_else(|| AppError::Internal("Booking hydration returned nothing".to_string()))
    }

    /// Attach listing, guest and host summaries.
    async fn hydrate(&self, bookings: Vec<Booking>) -> Result<Vec<BookingResponse>, AppError> {
        let mut listing_ids: Vec<Uuid> = bookings.iter().map(|b| b.listing_id).collect();
        listing_ids.sort();
        listing_ids.dedup();
        let listings = self.listings.find_many(&listing_ids).await?;

        let users = user_summaries(
            self.users.as_ref(),
            bookings.iter().flat_map(|b| [b.guest_id, b.host_id]),
        )
        .await?;

        Ok(bookings
            .iter()
            .map(|booking| {
                let listing = listings
                    .iter()
                    .find(|l| l.id == booking.listing_id)
                    .map(|l| l.to_summary());
                booking.to_response(
                    listing,
                    users.get(&booking.guest_id).cloned(),
                    users.get(&booking.host_id).cloned(),
                )
            })
            .collect())
    }
}

/// Move a booking along the lifecycle table or fail with `message`.
fn transition(booking: &mut Booking, next: BookingStatus, message: &str) -> Result<(), AppError> {
    if !booking.status.can_transition_to(next) {
        return Err(AppError::Validation(message.to_string()));
    }
    booking.status = next;
    Ok(())
}
