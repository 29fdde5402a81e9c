use eazypg_shared::{
    Amenity, BlockDatesRequest, BlockedDateResponse, CreateListingRequest, ListingPage,
    ListingResponse, ListingSearchQuery, PaginationMeta, UpdateListingRequest, DEFAULT_PAGE_SIZE,
    ERROR_LISTING_HAS_BOOKINGS, ERROR_LISTING_NOT_FOUND, FEATURED_LISTINGS_LIMIT,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::{unavailable_ranges, user_summaries};
use crate::error::AppError;
use crate::models::{BlockedDate, Listing, ListingFilter, ListingSort};
use crate::repositories::{
    BookingRepository, ListingRepository, PaginationParams, UserRepository,
};
use crate::rules::{is_available, DateRange, StayRequest};

/// Listing management service handles search, detail and host-side edits.
#[derive(Clone)]
pub struct ListingService {
    listings: Arc<dyn ListingRepository>,
    users: Arc<dyn UserRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl ListingService {
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        users: Arc<dyn UserRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            listings,
            users,
            bookings,
        }
    }

    /// Search approved listings. When both `check_in` and `check_out` are
    /// given, listings that cannot host the stay are dropped from the page;
    /// the pagination total still counts them.
    pub async fn search(&self, query: ListingSearchQuery) -> Result<ListingPage, AppError> {
        query.validate()?;

        let pagination = PaginationParams::from_page(query.page, query.limit, DEFAULT_PAGE_SIZE);
        let filter = ListingFilter {
            city: query.city.filter(|c| !c.trim().is_empty()),
            state: query.state.filter(|s| !s.trim().is_empty()),
            min_guests: query.guests,
            min_bedrooms: query.bedrooms,
            min_price: query.min_price,
            max_price: query.max_price,
            amenities: parse_amenities(query.amenities.as_deref())?,
            property_type: query.property_type,
            sort: ListingSort::parse(query.sort.as_deref())?,
            limit: pagination.limit,
            offset: pagination.offset,
        };
        debug!("Searching listings with {:?}", filter);

        let (mut listings, total) = self.listings.search(&filter).await?;

        if let (Some(check_in), Some(check_out)) = (query.check_in, query.check_out) {
            let stay = StayRequest::new(check_in, check_out, query.guests.unwrap_or(1))?;
            let mut open = Vec::with_capacity(listings.len());
            for listing in listings {
                let blocked =
                    unavailable_ranges(self.listings.as_ref(), self.bookings.as_ref(), listing.id)
                        .await?;
                if is_available(&blocked, &stay) {
                    open.push(listing);
                }
            }
            listings = open;
        }

        Ok(ListingPage {
            listings: self.with_hosts(listings).await?,
            pagination: PaginationMeta::new(pagination.page, pagination.limit, total),
        })
    }

    pub async fn featured(&self) -> Result<Vec<ListingResponse>, AppError> {
        let listings = self.listings.featured(FEATURED_LISTINGS_LIMIT).await?;
        self.with_hosts(listings).await
    }

    pub async fn by_host(&self, host_id: Uuid) -> Result<Vec<ListingResponse>, AppError> {
        let listings = self.listings.approved_by_host(host_id).await?;
        self.with_hosts(listings).await
    }

    /// Listing detail. Counts as a view.
    pub async fn get(&self, id: Uuid) -> Result<ListingResponse, AppError> {
        let mut listing = self.find(id).await?;
        self.listings.increment_views(id).await?;
        listing.views += 1;

        let host = self
            .users
            .find_by_id(listing.host_id)
            .await?
            .map(|user| user.to_summary());
        Ok(listing.to_response(host))
    }

    pub async fn create(
        &self,
        host_id: Uuid,
        request: CreateListingRequest,
    ) -> Result<ListingResponse, AppError> {
        request.validate()?;

        let listing = Listing::from_request(host_id, request);
        validate_listing(&listing)?;

        let listing = self.listings.create(&listing).await?;
        self.users.mark_host(host_id).await?;

        info!("Host {} created listing {}", host_id, listing.id);
        self.with_host(listing).await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: UpdateListingRequest,
    ) -> Result<ListingResponse, AppError> {
        request.validate()?;

        let mut listing = self.find_owned(user_id, id).await?;
        listing.apply_update(request);
        validate_listing(&listing)?;

        let listing = self.listings.update(&listing).await?;
        info!("Listing {} updated", id);
        self.with_host(listing).await
    }

    /// Listings with pending or confirmed bookings cannot be deleted. A
    /// listing with booking history is retired to `inactive` instead of
    /// being removed.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.find_owned(user_id, id).await?;
        if !self.bookings.active_for_listing(id).await?.is_empty() {
            return Err(AppError::Conflict(ERROR_LISTING_HAS_BOOKINGS.to_string()));
        }
        if !self.listings.delete(id).await? {
            return Err(AppError::NotFound(ERROR_LISTING_NOT_FOUND.to_string()));
        }

        info!("Listing {} deleted", id);
        Ok(())
    }

    pub async fn block_dates(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: BlockDatesRequest,
    ) -> Result<BlockedDateResponse, AppError> {
        let listing = self.find_owned(user_id, id).await?;
        let range = DateRange::new(request.from, request.to)?;

        let block = self
            .listings
            .add_block(&BlockedDate::new(listing.id, None, &range))
            .await?;

        info!("Blocked {} .. {} on listing {}", range.from(), range.to(), id);
        Ok(block.to_response())
    }

    pub async fn unblock_dates(
        &self,
        user_id: Uuid,
        id: Uuid,
        block_id: Uuid,
    ) -> Result<(), AppError> {
        self.find_owned(user_id, id).await?;
        if !self.listings.remove_host_block(id, block_id).await? {
            return Err(AppError::NotFound("Blocked dates not found".to_string()));
        }

        info!("Removed block {} from listing {}", block_id, id);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Listing, AppError> {
        self.listings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_LISTING_NOT_FOUND.to_string()))
    }

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Listing, AppError> {
        let listing = self.find(id).await?;
        if listing.host_id != user_id {
            return Err(AppError::Authorization(
                "Not authorized to modify this listing".to_string(),
            ));
        }
        Ok(listing)
    }

    async fn with_host(&self, listing: Listing) -> Result<ListingResponse, AppError> {
        let host = self
            .users
            .find_by_id(listing.host_id)
            .await?
            .map(|user| user.to_summary());
        Ok(listing.to_response(host))
    }

    async fn with_hosts(&self, listings: Vec<Listing>) -> Result<Vec<ListingResponse>, AppError> {
        let hosts = user_summaries(self.users.as_ref(), listings.iter().map(|l| l.host_id)).await?;
        Ok(listings
            .iter()
            .map(|listing| listing.to_response(hosts.get(&listing.host_id).cloned()))
            .collect())
    }
}

/// Parse a comma separated amenity list. Blank entries are skipped.
fn parse_amenities(raw: Option<&str>) -> Result<Vec<Amenity>, AppError> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Amenity>().map_err(AppError::Validation))
        .collect()
}

/// Numeric constraints that validator cannot express on `Decimal` fields.
fn validate_listing(listing: &Listing) -> Result<(), AppError> {
    if listing.bathrooms < Decimal::new(5, 1) {
        return Err(AppError::Validation(
            "Bathrooms must be at least 0.5".to_string(),
        ));
    }
    if listing.base_price < Decimal::ZERO
        || listing.cleaning_fee < Decimal::ZERO
        || listing.service_fee < Decimal::ZERO
    {
        return Err(AppError::Validation("Prices cannot be negative".to_string()));
    }
    if listing.min_nights > listing.max_nights {
        return Err(AppError::Validation(
            "Minimum nights cannot exceed maximum nights".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::repositories::Repositories;
    use chrono::{Duration, Utc};
    use eazypg_shared::{
        CapacityInput, ListingStatus, LocationInput, PricingInput, PropertyType,
    };

    struct Fixture {
        service: ListingService,
        host_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let repos = Repositories::in_memory();
        let host = repos
            .users
            .create(NewUser {
                first_name: "Hana".to_string(),
                last_name: "Host".to_string(),
                email: "host@example.com".to_string(),
                password_hash: "x".to_string(),
                phone: None,
            })
            .await
            .unwrap();

        Fixture {
            service: ListingService::new(repos.listings, repos.users, repos.bookings),
            host_id: host.id,
        }
    }

    fn create_request(city: &str, price: i64, amenities: Vec<Amenity>) -> CreateListingRequest {
        CreateListingRequest {
            title: format!("Flat in {}", city),
            description: "Bright and quiet".to_string(),
            property_type: PropertyType::Apartment,
            location: LocationInput {
                address: "1 Main St".to_string(),
                city: city.to_string(),
                state: "CA".to_string(),
                zip_code: "94000".to_string(),
                country: None,
                latitude: None,
                longitude: None,
            },
            capacity: CapacityInput {
                guests: 4,
                bedrooms: 2,
                beds: 2,
                bathrooms: Decimal::ONE,
            },
            amenities,
            images: Vec::new(),
            pricing: PricingInput {
                base_price: Decimal::from(price),
                cleaning_fee: Decimal::from(30),
                service_fee: Decimal::from(15),
                currency: None,
            },
            availability: None,
        }
    }

    async fn publish(fx: &Fixture, request: CreateListingRequest) -> ListingResponse {
        let listing = fx.service.create(fx.host_id, request).await.unwrap();
        fx.service
            .update(
                fx.host_id,
                listing.id,
                UpdateListingRequest {
                    status: Some(ListingStatus::Approved),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_applies_defaults_and_marks_host() {
        let fx = fixture().await;
        let listing = fx
            .service
            .create(fx.host_id, create_request("Oakland", 120, vec![]))
            .await
            .unwrap();

        assert_eq!(listing.status, ListingStatus::Pending);
        assert_eq!(listing.location.country, "USA");
        assert_eq!(listing.pricing.currency, "USD");
        assert_eq!(listing.availability.min_nights, 1);
        assert_eq!(listing.availability.max_nights, 365);
        assert_eq!(listing.host.map(|h| h.id), Some(fx.host_id));
    }

    #[tokio::test]
    async fn test_create_rejects_small_bathroom_count() {
        let fx = fixture().await;
        let mut request = create_request("Oakland", 120, vec![]);
        request.capacity.bathrooms = Decimal::new(2, 1);

        let result = fx.service.create(fx.host_id, request).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_only_returns_approved_matches() {
        let fx = fixture().await;
        publish(&fx, create_request("San Francisco", 200, vec![Amenity::Wifi, Amenity::Pool])).await;
        publish(&fx, create_request("San Jose", 90, vec![Amenity::Wifi])).await;
        fx.service
            .create(fx.host_id, create_request("San Diego", 100, vec![Amenity::Wifi]))
            .await
            .unwrap();

        let page = fx
            .service
            .search(ListingSearchQuery {
                city: Some("san".to_string()),
                amenities: Some("wifi".to_string()),
                sort: Some("price".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.listings[0].location.city, "San Jose");

        let page = fx
            .service
            .search(ListingSearchQuery {
                amenities: Some("wifi, pool".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.listings.len(), 1);
        assert_eq!(page.listings[0].location.city, "San Francisco");
    }

    #[tokio::test]
    async fn test_search_rejects_unknown_amenity() {
        let fx = fixture().await;
        let result = fx
            .service
            .search(ListingSearchQuery {
                amenities: Some("helipad".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_drops_blocked_listings_for_stay() {
        let fx = fixture().await;
        let blocked = publish(&fx, create_request("Fresno", 80, vec![])).await;
        publish(&fx, create_request("Fresno", 85, vec![])).await;

        let check_in = Utc::now() + Duration::days(10);
        let check_out = check_in + Duration::days(3);
        fx.service
            .block_dates(
                fx.host_id,
                blocked.id,
                BlockDatesRequest {
                    from: check_in + Duration::days(1),
                    to: check_in + Duration::days(5),
                },
            )
            .await
            .unwrap();

        let page = fx
            .service
            .search(ListingSearchQuery {
                city: Some("fresno".to_string()),
                check_in: Some(check_in),
                check_out: Some(check_out),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.listings.len(), 1);
        assert_ne!(page.listings[0].id, blocked.id);
    }

    #[tokio::test]
    async fn test_get_counts_views() {
        let fx = fixture().await;
        let listing = publish(&fx, create_request("Reno", 70, vec![])).await;

        assert_eq!(fx.service.get(listing.id).await.unwrap().views, 1);
        assert_eq!(fx.service.get(listing.id).await.unwrap().views, 2);
    }

    #[tokio::test]
    async fn test_only_host_can_edit() {
        let fx = fixture().await;
        let listing = publish(&fx, create_request("Reno", 70, vec![])).await;

        let result = fx
            .service
            .update(Uuid::new_v4(), listing.id, UpdateListingRequest::default())
            .await;
        assert!(matches!(result, Err(AppError::Authorization(_))));

        let result = fx.service.delete(Uuid::new_v4(), listing.id).await;
        assert!(matches!(result, Err(AppError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_block_dates_rejects_inverted_range() {
        let fx = fixture().await;
        let listing = publish(&fx, create_request("Reno", 70, vec![])).await;
        let at = Utc::now() + Duration::days(3);

        let result = fx
            .service
            .block_dates(fx.host_id, listing.id, BlockDatesRequest { from: at, to: at })
            .await;
        assert!(matches!(result, Err(AppError::InvalidRange(_))));
    }

    #[tokio::test]
    async fn test_unblock_host_block() {
        let fx = fixture().await;
        let listing = publish(&fx, create_request("Reno", 70, vec![])).await;
        let from = Utc::now() + Duration::days(3);

        let block = fx
            .service
            .block_dates(
                fx.host_id,
                listing.id,
                BlockDatesRequest {
                    from,
                    to: from + Duration::days(2),
                },
            )
            .await
            .unwrap();

        fx.service
            .unblock_dates(fx.host_id, listing.id, block.id)
            .await
            .unwrap();
        let again = fx.service.unblock_dates(fx.host_id, listing.id, block.id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }
}
