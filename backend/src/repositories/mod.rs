//! Repository seams between the services and storage.
//!
//! Services only see these traits. `postgres` delegates to the SQL on the
//! model types, `memory` keeps everything in process and backs the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eazypg_shared::{BookingParty, BookingStatus, ReviewType};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    BlockedDate, Booking, ContactTicket, Listing, ListingFilter, NewUser, Review, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new: NewUser) -> Result<User, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError>;
    async fn mark_host(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create(&self, listing: &Listing) -> Result<Listing, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, AppError>;
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Listing>, AppError>;
    async fn update(&self, listing: &Listing) -> Result<Listing, AppError>;
    /// Removes a never-booked listing or retires a booked one to `inactive`.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
    async fn increment_views(&self, id: Uuid) -> Result<(), AppError>;
    async fn update_rating(&self, id: Uuid, average: Decimal, count: i32) -> Result<(), AppError>;
    /// A page of matching approved listings and the total match count.
    async fn search(&self, filter: &ListingFilter) -> Result<(Vec<Listing>, i64), AppError>;
    async fn featured(&self, limit: i64) -> Result<Vec<Listing>, AppError>;
    async fn approved_by_host(&self, host_id: Uuid) -> Result<Vec<Listing>, AppError>;
    async fn blocked_dates(&self, listing_id: Uuid) -> Result<Vec<BlockedDate>, AppError>;
    async fn add_block(&self, block: &BlockedDate) -> Result<BlockedDate, AppError>;
    /// Only removes blocks without a booking id.
    async fn remove_host_block(&self, listing_id: Uuid, block_id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a booking together with its hold. A concurrent booking of the
    /// same stay surfaces as `AppError::Conflict`.
    async fn create_with_hold(&self, booking: &Booking, hold: &BlockedDate)
        -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError>;
    async fn find_for_user(
        &self,
        user_id: Uuid,
        party: BookingParty,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, AppError>;
    async fn active_for_listing(&self, listing_id: Uuid) -> Result<Vec<Booking>, AppError>;
    /// Writes only if the stored row still carries `booking.updated_at`;
    /// otherwise `AppError::Conflict`.
    async fn update(&self, booking: &Booking, release_hold: bool) -> Result<Booking, AppError>;
    async fn complete_past(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> Result<Review, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, AppError>;
    async fn exists_for_booking(&self, booking_id: Uuid, review_type: ReviewType)
        -> Result<bool, AppError>;
    async fn visible_for_listing(
        &self,
        listing_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Review>, i64), AppError>;
    async fn visible_overall_ratings(&self, listing_id: Uuid) -> Result<Vec<i16>, AppError>;
    async fn set_response(
        &self,
        id: Uuid,
        text: &str,
        responded_at: DateTime<Utc>,
    ) -> Result<Review, AppError>;
    async fn toggle_helpful(&self, id: Uuid, user_id: Uuid) -> Result<Option<Review>, AppError>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, ticket: &ContactTicket) -> Result<ContactTicket, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContactTicket>, AppError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<ContactTicket>, AppError>;
}

/// Repository container that holds all repositories
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub listings: Arc<dyn ListingRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub contacts: Arc<dyn ContactRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool)))
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::default()))
    }

    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + ListingRepository
            + BookingRepository
            + ReviewRepository
            + ContactRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            listings: store.clone(),
            bookings: store.clone(),
            reviews: store.clone(),
            contacts: store,
        }
    }
}

/// Page/limit pair resolved to SQL limit and offset.
#[derive(Debug, Clone, Copy)]
pub struct PaginationParams {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PaginationParams {
    pub fn from_page(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        let limit = limit
            .unwrap_or(default_limit)
            .clamp(1, eazypg_shared::MAX_PAGE_SIZE);
        let page = page.unwrap_or(1).max(1);
        Self {
            page,
            limit,
            offset: (page - 1) * limit,
        }
    }
}
