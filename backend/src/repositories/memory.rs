use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eazypg_shared::{
    BookingParty, BookingStatus, ListingStatus, ReviewType, ERROR_BOOKING_CHANGED,
    ERROR_EMAIL_ALREADY_EXISTS,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    BookingRepository, ContactRepository, ListingRepository, ReviewRepository, UserRepository,
};
use crate::error::AppError;
use crate::models::{
    BlockedDate, Booking, ContactTicket, Listing, ListingFilter, NewUser, Review, User,
};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    listings: HashMap<Uuid, Listing>,
    blocked_dates: HashMap<Uuid, BlockedDate>,
    bookings: HashMap<Uuid, Booking>,
    reviews: HashMap<Uuid, Review>,
    contacts: HashMap<Uuid, ContactTicket>,
}

/// In-process store with the same uniqueness rules as the SQL schema.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

fn not_found(what: &str, id: Uuid) -> AppError {
    AppError::NotFound(format!("{} {} not found", what, id))
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new: NewUser) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == new.email) {
            return Err(AppError::Conflict(ERROR_EMAIL_ALREADY_EXISTS.to_string()));
        }

        let user = User::from_new(new);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.users.get(id).cloned()).collect())
    }

    async fn mark_host(&self, id: Uuid) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.get_mut(&id) {
            user.is_host = true;
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn create(&self, listing: &Listing) -> Result<Listing, AppError> {
        let mut state = self.state.write().await;
        state.listings.insert(listing.id, listing.clone());
        Ok(listing.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, AppError> {
        Ok(self.state.read().await.listings.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Listing>, AppError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.listings.get(id).cloned())
            .collect())
    }

    async fn update(&self, listing: &Listing) -> Result<Listing, AppError> {
        let mut state = self.state.write().await;
        let stored = state
            .listings
            .get_mut(&listing.id)
            .ok_or_else(|| not_found("Listing", listing.id))?;

        let views = stored.views;
        let (rating_average, rating_count) = (stored.rating_average, stored.rating_count);
        *stored = listing.clone();
        stored.views = views;
        stored.rating_average = rating_average;
        stored.rating_count = rating_count;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let has_history = state.bookings.values().any(|b| b.listing_id == id);
        if has_history {
            return Ok(match state.listings.get_mut(&id) {
                Some(listing) => {
                    listing.status = ListingStatus::Inactive;
                    listing.updated_at = Utc::now();
                    true
                }
                None => false,
            });
        }

        let removed = state.listings.remove(&id).is_some();
        if removed {
            state.blocked_dates.retain(|_, b| b.listing_id != id);
        }
        Ok(removed)
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(listing) = state.listings.get_mut(&id) {
            listing.views += 1;
        }
        Ok(())
    }

    async fn update_rating(&self, id: Uuid, average: Decimal, count: i32) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(listing) = state.listings.get_mut(&id) {
            listing.rating_average = average;
            listing.rating_count = count;
            listing.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn search(&self, filter: &ListingFilter) -> Result<(Vec<Listing>, i64), AppError> {
        let state = self.state.read().await;
        let mut matched: Vec<Listing> = state
            .listings
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        matched.sort_by(|a, b| filter.compare(a, b));

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn featured(&self, limit: i64) -> Result<Vec<Listing>, AppError> {
        let state = self.state.read().await;
        let mut featured: Vec<Listing> = state
            .listings
            .values()
            .filter(|l| l.featured && l.status == eazypg_shared::ListingStatus::Approved)
            .cloned()
            .collect();
        featured.sort_by(|a, b| {
            b.rating_average
                .cmp(&a.rating_average)
                .then(b.created_at.cmp(&a.created_at))
        });
        featured.truncate(limit.max(0) as usize);
        Ok(featured)
    }

    async fn approved_by_host(&self, host_id: Uuid) -> Result<Vec<Listing>, AppError> {
        let state = self.state.read().await;
        let mut listings: Vec<Listing> = state
            .listings
            .values()
            .filter(|l| l.host_id == host_id && l.status == eazypg_shared::ListingStatus::Approved)
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn blocked_dates(&self, listing_id: Uuid) -> Result<Vec<BlockedDate>, AppError> {
        let state = self.state.read().await;
        let mut blocks: Vec<BlockedDate> = state
            .blocked_dates
            .values()
            .filter(|b| b.listing_id == listing_id)
            .cloned()
            .collect();
        blocks.sort_by_key(|b| b.blocked_from);
        Ok(blocks)
    }

    async fn add_block(&self, block: &BlockedDate) -> Result<BlockedDate, AppError> {
        let mut state = self.state.write().await;
        state.blocked_dates.insert(block.id, block.clone());
        Ok(block.clone())
    }

    async fn remove_host_block(&self, listing_id: Uuid, block_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let removable = state
            .blocked_dates
            .get(&block_id)
            .map_or(false, |b| b.listing_id == listing_id && b.booking_id.is_none());
        if removable {
            state.blocked_dates.remove(&block_id);
        }
        Ok(removable)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_with_hold(
        &self,
        booking: &Booking,
        hold: &BlockedDate,
    ) -> Result<Booking, AppError> {
        let mut state = self.state.write().await;
        let duplicate = state.bookings.values().any(|b| {
            b.listing_id == booking.listing_id
                && b.check_in == booking.check_in
                && b.check_out == booking.check_out
                && b.status.is_active()
        });
        if duplicate {
            return Err(AppError::Conflict(
                "duplicate key value violates unique constraint \"uq_bookings_active_stay\""
                    .to_string(),
            ));
        }

        state.bookings.insert(booking.id, booking.clone());
        state.blocked_dates.insert(hold.id, hold.clone());
        Ok(booking.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        Ok(self.state.read().await.bookings.get(&id).cloned())
    }

    async fn find_for_user(
        &self,
        user_id: Uuid,
        party: BookingParty,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, AppError> {
        let state = self.state.read().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| match party {
                BookingParty::Guest => b.guest_id == user_id,
                BookingParty::Host => b.host_id == user_id,
            })
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn active_for_listing(&self, listing_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let state = self.state.read().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.listing_id == listing_id && b.status.is_active())
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.check_in);
        Ok(bookings)
    }

    async fn update(&self, booking: &Booking, release_hold: bool) -> Result<Booking, AppError> {
        let mut state = self.state.write().await;
        let stored = state
            .bookings
            .get_mut(&booking.id)
            .ok_or_else(|| not_found("Booking", booking.id))?;
        if stored.updated_at != booking.updated_at {
            return Err(AppError::Conflict(ERROR_BOOKING_CHANGED.to_string()));
        }

        *stored = booking.clone();
        stored.updated_at = Utc::now();
        let updated = stored.clone();

        if release_hold {
            state
                .blocked_dates
                .retain(|_, b| b.booking_id != Some(booking.id));
        }
        Ok(updated)
    }

    async fn complete_past(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut state = self.state.write().await;
        let mut completed = 0;
        for booking in state.bookings.values_mut() {
            if booking.status == BookingStatus::Confirmed && booking.check_out < now {
                booking.status = BookingStatus::Completed;
                booking.updated_at = Utc::now();
                completed += 1;
            }
        }
        Ok(completed)
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn create(&self, review: &Review) -> Result<Review, AppError> {
        let mut state = self.state.write().await;
        let duplicate = state
            .reviews
            .values()
            .any(|r| r.booking_id == review.booking_id && r.review_type == review.review_type);
        if duplicate {
            return Err(AppError::Conflict(
                "duplicate key value violates unique constraint \"reviews_booking_id_review_type_key\""
                    .to_string(),
            ));
        }

        state.reviews.insert(review.id, review.clone());
        Ok(review.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, AppError> {
        Ok(self.state.read().await.reviews.get(&id).cloned())
    }

    async fn exists_for_booking(
        &self,
        booking_id: Uuid,
        review_type: ReviewType,
    ) -> Result<bool, AppError> {
        let state = self.state.read().await;
        Ok(state
            .reviews
            .values()
            .any(|r| r.booking_id == booking_id && r.review_type == review_type))
    }

    async fn visible_for_listing(
        &self,
        listing_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Review>, i64), AppError> {
        let state = self.state.read().await;
        let mut reviews: Vec<Review> = state
            .reviews
            .values()
            .filter(|r| {
                r.listing_id == listing_id && r.review_type == ReviewType::GuestToHost && r.visible
            })
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = reviews.len() as i64;
        let page = reviews
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn visible_overall_ratings(&self, listing_id: Uuid) -> Result<Vec<i16>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .reviews
            .values()
            .filter(|r| {
                r.listing_id == listing_id && r.review_type == ReviewType::GuestToHost && r.visible
            })
            .map(|r| r.rating_overall)
            .collect())
    }

    async fn set_response(
        &self,
        id: Uuid,
        text: &str,
        responded_at: DateTime<Utc>,
    ) -> Result<Review, AppError> {
        let mut state = self.state.write().await;
        let review = state
            .reviews
            .get_mut(&id)
            .ok_or_else(|| not_found("Review", id))?;
        review.response_text = Some(text.to_string());
        review.responded_at = Some(responded_at);
        review.updated_at = Utc::now();
        Ok(review.clone())
    }

    async fn toggle_helpful(&self, id: Uuid, user_id: Uuid) -> Result<Option<Review>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.reviews.get_mut(&id).map(|review| {
            review.toggle_helpful(user_id);
            review.updated_at = Utc::now();
            review.clone()
        }))
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create(&self, ticket: &ContactTicket) -> Result<ContactTicket, AppError> {
        let mut state = self.state.write().await;
        state.contacts.insert(ticket.id, ticket.clone());
        Ok(ticket.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContactTicket>, AppError> {
        Ok(self.state.read().await.contacts.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<ContactTicket>, AppError> {
        let state = self.state.read().await;
        let mut tickets: Vec<ContactTicket> = state
            .contacts
            .values()
            .filter(|t| t.user_id == Some(user_id))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }
}
