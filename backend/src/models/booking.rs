use chrono::{DateTime, Utc};
use eazypg_shared::{
    BookingParty, BookingPricingResponse, BookingResponse, BookingStatus, CancellationResponse,
    CreateBookingRequest, GuestCounts, GuestDetails, ListingSummary, PaymentMethod,
    PaymentResponse, PaymentStatus, ReviewedFlags, UserSummary, ERROR_BOOKING_CHANGED,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::BlockedDate;
use crate::rules::{DateRange, InvalidRangeError, PriceBreakdown, StayRequest};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub guest_id: Uuid,
    pub host_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub nights: i32,
    pub adults: i32,
    pub children: i32,
    pub infants: i32,
    pub pets: i32,
    pub base_price: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub status: BookingStatus,
    pub guest_first_name: Option<String>,
    pub guest_last_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub special_requests: String,
    pub cancelled_by: Option<Uuid>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub refund_amount: Option<Decimal>,
    pub reviewed_by_guest: bool,
    pub reviewed_by_host: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inputs for a new pending booking once the stay has been checked and priced.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub guest_id: Uuid,
    pub host_id: Uuid,
    pub stay: StayRequest,
    pub base_price: Decimal,
    pub breakdown: PriceBreakdown,
    pub currency: String,
    pub request: CreateBookingRequest,
}

impl Booking {
    pub fn from_new(new: NewBooking) -> Self {
        let now = Utc::now();
        let details = new.request.guest_details.unwrap_or_default();

        Self {
            id: Uuid::new_v4(),
            listing_id: new.request.listing_id,
            guest_id: new.guest_id,
            host_id: new.host_id,
            check_in: new.stay.check_in(),
            check_out: new.stay.check_out(),
            nights: new.breakdown.nights,
            adults: new.request.guests.adults,
            children: new.request.guests.children,
            infants: new.request.guests.infants,
            pets: new.request.guests.pets,
            base_price: new.base_price,
            cleaning_fee: new.breakdown.cleaning_fee,
            service_fee: new.breakdown.service_fee,
            subtotal: new.breakdown.subtotal,
            total: new.breakdown.total,
            currency: new.currency,
            payment_method: new.request.payment_method,
            payment_status: PaymentStatus::Pending,
            transaction_id: None,
            paid_at: None,
            status: BookingStatus::Pending,
            guest_first_name: details.first_name,
            guest_last_name: details.last_name,
            guest_email: details.email,
            guest_phone: details.phone,
            special_requests: new.request.special_requests.unwrap_or_default(),
            cancelled_by: None,
            cancelled_at: None,
            cancellation_reason: None,
            refund_amount: None,
            reviewed_by_guest: false,
            reviewed_by_host: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn stay_range(&self) -> Result<DateRange, InvalidRangeError> {
        DateRange::new(self.check_in, self.check_out)
    }

    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.guest_id == user_id || self.host_id == user_id
    }

    /// Insert the booking and its calendar hold in one transaction.
    pub async fn create_with_hold(
        pool: &PgPool,
        booking: &Booking,
        hold: &BlockedDate,
    ) -> Result<Self, AppError> {
        let mut tx = pool.begin().await?;

        let created = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, listing_id, guest_id, host_id, check_in, check_out, nights,
                adults, children, infants, pets,
                base_price, cleaning_fee, service_fee, subtotal, total, currency,
                payment_method, payment_status, status,
                guest_first_name, guest_last_name, guest_email, guest_phone,
                special_requests, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27
            )
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(booking.listing_id)
        .bind(booking.guest_id)
        .bind(booking.host_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.nights)
        .bind(booking.adults)
        .bind(booking.children)
        .bind(booking.infants)
        .bind(booking.pets)
        .bind(booking.base_price)
        .bind(booking.cleaning_fee)
        .bind(booking.service_fee)
        .bind(booking.subtotal)
        .bind(booking.total)
        .bind(&booking.currency)
        .bind(booking.payment_method)
        .bind(booking.payment_status)
        .bind(booking.status)
        .bind(&booking.guest_first_name)
        .bind(&booking.guest_last_name)
        .bind(&booking.guest_email)
        .bind(&booking.guest_phone)
        .bind(&booking.special_requests)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        BlockedDate::create(&mut *tx, hold).await?;
        tx.commit().await?;

        Ok(created)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(booking)
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: Uuid,
        party: BookingParty,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Self>, AppError> {
        let sql = match party {
            BookingParty::Guest => {
                r#"
                SELECT * FROM bookings
                WHERE guest_id = $1 AND ($2::booking_status IS NULL OR status = $2)
                ORDER BY created_at DESC
                "#
            }
            BookingParty::Host => {
                r#"
                SELECT * FROM bookings
                WHERE host_id = $1 AND ($2::booking_status IS NULL OR status = $2)
                ORDER BY created_at DESC
                "#
            }
        };

        let bookings = sqlx::query_as::<_, Booking>(sql)
            .bind(user_id)
            .bind(status)
            .fetch_all(pool)
            .await?;

        Ok(bookings)
    }

    /// Pending and confirmed bookings of a listing.
    pub async fn find_active_for_listing(
        pool: &PgPool,
        listing_id: Uuid,
    ) -> Result<Vec<Self>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE listing_id = $1 AND status IN ('pending', 'confirmed')
            ORDER BY check_in
            "#,
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await?;

        Ok(bookings)
    }

    /// Persist lifecycle, payment, cancellation and review state. When
    /// `release_hold` is set the booking's calendar hold is dropped in the
    /// same transaction. Fails with a conflict if the row changed since
    /// `booking` was read.
    pub async fn update(
        pool: &PgPool,
        booking: &Booking,
        release_hold: bool,
    ) -> Result<Self, AppError> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET
                status = $2, payment_status = $3, transaction_id = $4, paid_at = $5,
                cancelled_by = $6, cancelled_at = $7, cancellation_reason = $8,
                refund_amount = $9, reviewed_by_guest = $10, reviewed_by_host = $11,
                updated_at = NOW()
            WHERE id = $1 AND updated_at = $12
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(booking.status)
        .bind(booking.payment_status)
        .bind(&booking.transaction_id)
        .bind(booking.paid_at)
        .bind(booking.cancelled_by)
        .bind(booking.cancelled_at)
        .bind(&booking.cancellation_reason)
        .bind(booking.refund_amount)
        .bind(booking.reviewed_by_guest)
        .bind(booking.reviewed_by_host)
        .bind(booking.updated_at)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Conflict(ERROR_BOOKING_CHANGED.to_string()))?;

        if release_hold {
            BlockedDate::release_for_booking(&mut *tx, booking.id).await?;
        }
        tx.commit().await?;

        Ok(updated)
    }

    /// Mark confirmed bookings whose checkout has passed as completed.
    pub async fn complete_past(pool: &PgPool, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET status = 'completed', updated_at = NOW()
            WHERE status = 'confirmed' AND check_out < $1
            "#,
        )
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub fn to_response(
        &self,
        listing: Option<ListingSummary>,
        guest: Option<UserSummary>,
        host: Option<UserSummary>,
    ) -> BookingResponse {
        let cancellation = self.cancelled_at.map(|cancelled_at| CancellationResponse {
            cancelled_by: self.cancelled_by,
            cancelled_at,
            reason: self.cancellation_reason.clone(),
            refund_amount: self.refund_amount.unwrap_or(Decimal::ZERO),
        });

        BookingResponse {
            id: self.id,
            listing_id: self.listing_id,
            listing,
            guest_id: self.guest_id,
            guest,
            host_id: self.host_id,
            host,
            check_in: self.check_in,
            check_out: self.check_out,
            nights: self.nights,
            guests: GuestCounts {
                adults: self.adults,
                children: self.children,
                infants: self.infants,
                pets: self.pets,
            },
            pricing: BookingPricingResponse {
                base_price: self.base_price,
                nights: self.nights,
                subtotal: self.subtotal,
                cleaning_fee: self.cleaning_fee,
                service_fee: self.service_fee,
                total: self.total,
                currency: self.currency.clone(),
            },
            payment: PaymentResponse {
                method: self.payment_method,
                status: self.payment_status,
                transaction_id: self.transaction_id.clone(),
                paid_at: self.paid_at,
            },
            status: self.status,
            guest_details: GuestDetails {
                first_name: self.guest_first_name.clone(),
                last_name: self.guest_last_name.clone(),
                email: self.guest_email.clone(),
                phone: self.guest_phone.clone(),
            },
            special_requests: self.special_requests.clone(),
            cancellation,
            reviewed: ReviewedFlags {
                by_guest: self.reviewed_by_guest,
                by_host: self.reviewed_by_host,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
