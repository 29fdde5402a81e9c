use eazypg_shared::UserSummary;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{BlockedDate, Booking};
use crate::repositories::{
    BookingRepository, ListingRepository, Repositories, UserRepository,
};
use crate::rules::{DateRange, InvalidRangeError};
use crate::utils::jwt::JwtService;

pub mod auth_service;
pub mod booking_service;
pub mod contact_service;
pub mod listing_service;
pub mod review_service;

pub use auth_service::AuthService;
pub use booking_service::BookingService;
pub use contact_service::ContactService;
pub use listing_service::ListingService;
pub use review_service::ReviewService;

/// Service container shared by every worker.
#[derive(Clone)]
pub struct Services {
    pub jwt: Arc<JwtService>,
    pub auth: AuthService,
    pub listings: ListingService,
    pub bookings: BookingService,
    pub reviews: ReviewService,
    pub contact: ContactService,
}

impl Services {
    pub fn new(repositories: Repositories, jwt_service: JwtService) -> Self {
        let jwt = Arc::new(jwt_service);

        Self {
            auth: AuthService::new(repositories.users.clone(), jwt.clone()),
            listings: ListingService::new(
                repositories.listings.clone(),
                repositories.users.clone(),
                repositories.bookings.clone(),
            ),
            bookings: BookingService::new(
                repositories.bookings.clone(),
                repositories.listings.clone(),
                repositories.users.clone(),
            ),
            reviews: ReviewService::new(
                repositories.reviews.clone(),
                repositories.bookings.clone(),
                repositories.listings.clone(),
                repositories.users.clone(),
            ),
            contact: ContactService::new(repositories.contacts),
            jwt,
        }
    }
}

/// Public summaries for a set of users, keyed by id.
pub(crate) async fn user_summaries(
    users: &dyn UserRepository,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, UserSummary>, AppError> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(users
        .find_many(&ids)
        .await?
        .iter()
        .map(|user| (user.id, user.to_summary()))
        .collect())
}

/// Every range a listing cannot be booked for: host blocks, booking holds
/// and the stays of active bookings. Identical ranges are reported once.
pub(crate) async fn unavailable_ranges(
    listings: &dyn ListingRepository,
    bookings: &dyn BookingRepository,
    listing_id: Uuid,
) -> Result<Vec<DateRange>, AppError> {
    let blocks = listings.blocked_dates(listing_id).await?;
    let active = bookings.active_for_listing(listing_id).await?;
    Ok(merge_ranges(&blocks, &active)?)
}

fn merge_ranges(
    blocks: &[BlockedDate],
    active: &[Booking],
) -> Result<Vec<DateRange>, InvalidRangeError> {
    let mut ranges = blocks
        .iter()
        .map(BlockedDate::range)
        .chain(active.iter().map(Booking::stay_range))
        .collect::<Result<Vec<_>, _>>()?;

    ranges.sort_by_key(|range| (range.from(), range.to()));
    ranges.dedup();
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn block(from_day: u32, to_day: u32) -> BlockedDate {
        BlockedDate {
            id: Uuid::new_v4(),
            listing_id: Uuid::new_v4(),
            booking_id: None,
            blocked_from: Utc.with_ymd_and_hms(2030, 3, from_day, 0, 0, 0).unwrap(),
            blocked_to: Utc.with_ymd_and_hms(2030, 3, to_day, 0, 0, 0).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_ranges_sorts_and_dedups() {
        let ranges = merge_ranges(&[block(10, 12), block(1, 3), block(10, 12)], &[]).unwrap();

        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].from(), block(1, 3).blocked_from);
        assert_eq!(ranges[1].to() - ranges[1].from(), Duration::days(2));
    }

    #[test]
    fn test_merge_ranges_rejects_malformed_block() {
        let err = merge_ranges(&[block(1, 3), block(5, 5)], &[]).unwrap_err();
        assert_eq!(err.from, err.to);
    }
}
