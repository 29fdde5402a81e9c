use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eazypg_shared::{BookingParty, BookingStatus, ReviewType};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    BookingRepository, ContactRepository, ListingRepository, ReviewRepository, UserRepository,
};
use crate::error::AppError;
use crate::models::{
    BlockedDate, Booking, ContactTicket, Listing, ListingFilter, NewUser, Review, User,
};

/// PostgreSQL-backed repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, new: NewUser) -> Result<User, AppError> {
        User::create(&self.pool, new).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        User::find_by_id(&self.pool, id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        User::find_by_email(&self.pool, email).await
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        User::find_many(&self.pool, ids).await
    }

    async fn mark_host(&self, id: Uuid) -> Result<(), AppError> {
        User::mark_host(&self.pool, id).await
    }
}

#[async_trait]
impl ListingRepository for PgStore {
    async fn create(&self, listing: &Listing) -> Result<Listing, AppError> {
        Listing::create(&self.pool, listing).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, AppError> {
        Listing::find_by_id(&self.pool, id).await
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Listing>, AppError> {
        Listing::find_many(&self.pool, ids).await
    }

    async fn update(&self, listing: &Listing) -> Result<Listing, AppError> {
        Listing::update(&self.pool, listing).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Listing::delete(&self.pool, id).await
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), AppError> {
        Listing::increment_views(&self.pool, id).await
    }

    async fn update_rating(&self, id: Uuid, average: Decimal, count: i32) -> Result<(), AppError> {
        Listing::update_rating(&self.pool, id, average, count).await
    }

    async fn search(&self, filter: &ListingFilter) -> Result<(Vec<Listing>, i64), AppError> {
        Listing::search(&self.pool, filter).await
    }

    async fn featured(&self, limit: i64) -> Result<Vec<Listing>, AppError> {
        Listing::find_featured(&self.pool, limit).await
    }

    async fn approved_by_host(&self, host_id: Uuid) -> Result<Vec<Listing>, AppError> {
        Listing::find_approved_by_host(&self.pool, host_id).await
    }

    async fn blocked_dates(&self, listing_id: Uuid) -> Result<Vec<BlockedDate>, AppError> {
        BlockedDate::find_by_listing(&self.pool, listing_id).await
    }

    async fn add_block(&self, block: &BlockedDate) -> Result<BlockedDate, AppError> {
        BlockedDate::create(&self.pool, block).await
    }

    async fn remove_host_block(&self, listing_id: Uuid, block_id: Uuid) -> Result<bool, AppError> {
        BlockedDate::delete_host_block(&self.pool, listing_id, block_id).await
    }
}

#[async_trait]
impl BookingRepository for PgStore {
    async fn create_with_hold(
        &self,
        booking: &Booking,
        hold: &BlockedDate,
    ) -> Result<Booking, AppError> {
        Booking::create_with_hold(&self.pool, booking, hold).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        Booking::find_by_id(&self.pool, id).await
    }

    async fn find_for_user(
        &self,
        user_id: Uuid,
        party: BookingParty,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, AppError> {
        Booking::find_for_user(&self.pool, user_id, party, status).await
    }

    async fn active_for_listing(&self, listing_id: Uuid) -> Result<Vec<Booking>, AppError> {
        Booking::find_active_for_listing(&self.pool, listing_id).await
    }

    async fn update(&self, booking: &Booking, release_hold: bool) -> Result<Booking, AppError> {
        Booking::update(&self.pool, booking, release_hold).await
    }

    async fn complete_past(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        Booking::complete_past(&self.pool, now).await
    }
}

#[async_trait]
impl ReviewRepository for PgStore {
    async fn create(&self, review: &Review) -> Result<Review, AppError> {
        Review::create(&self.pool, review).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, AppError> {
        Review::find_by_id(&self.pool, id).await
    }

    async fn exists_for_booking(
        &self,
        booking_id: Uuid,
        review_type: ReviewType,
    ) -> Result<bool, AppError> {
        Review::exists_for_booking(&self.pool, booking_id, review_type).await
    }

    async fn visible_for_listing(
        &self,
        listing_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Review>, i64), AppError> {
        Review::find_visible_for_listing(&self.pool, listing_id, limit, offset).await
    }

    async fn visible_overall_ratings(&self, listing_id: Uuid) -> Result<Vec<i16>, AppError> {
        Review::visible_overall_ratings(&self.pool, listing_id).await
    }

    async fn set_response(
        &self,
        id: Uuid,
        text: &str,
        responded_at: DateTime<Utc>,
    ) -> Result<Review, AppError> {
        Review::set_response(&self.pool, id, text, responded_at).await
    }

    async fn toggle_helpful(&self, id: Uuid, user_id: Uuid) -> Result<Option<Review>, AppError> {
        Review::toggle_helpful_vote(&self.pool, id, user_id).await
    }
}

#[async_trait]
impl ContactRepository for PgStore {
    async fn create(&self, ticket: &ContactTicket) -> Result<ContactTicket, AppError> {
        ContactTicket::create(&self.pool, ticket).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContactTicket>, AppError> {
        ContactTicket::find_by_id(&self.pool, id).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<ContactTicket>, AppError> {
        ContactTicket::find_by_user(&self.pool, user_id).await
    }
}
