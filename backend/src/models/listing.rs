use chrono::{DateTime, Utc};
use eazypg_shared::{
    Amenity, AvailabilityRulesResponse, BlockedDateResponse, CapacityResponse, CreateListingRequest,
    ListingImage, ListingResponse, ListingStatus, ListingSummary, LocationResponse,
    PricingResponse, PropertyType, RatingResponse, UpdateListingRequest, UserSummary,
    DEFAULT_COUNTRY, DEFAULT_CURRENCY, DEFAULT_MAX_NIGHTS, DEFAULT_MIN_NIGHTS,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::AppError;
use crate::rules::{DateRange, InvalidRangeError, ListingPricing};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_guests: i32,
    pub bedrooms: i32,
    pub beds: i32,
    pub bathrooms: Decimal,
    pub amenities: Json<Vec<Amenity>>,
    pub images: Json<Vec<ListingImage>>,
    pub base_price: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub currency: String,
    pub min_nights: i32,
    pub max_nights: i32,
    pub instant_book: bool,
    pub rating_average: Decimal,
    pub rating_count: i32,
    pub status: ListingStatus,
    pub views: i64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sort orders accepted by listing search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingSort {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    TopRated,
}

impl ListingSort {
    pub fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None | Some("-created_at") => Ok(ListingSort::Newest),
            Some("created_at") => Ok(ListingSort::Oldest),
            Some("price") => Ok(ListingSort::PriceAsc),
            Some("-price") => Ok(ListingSort::PriceDesc),
            Some("-rating") => Ok(ListingSort::TopRated),
            Some(other) => Err(AppError::Validation(format!("Invalid sort: {}", other))),
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            ListingSort::Newest => "created_at DESC",
            ListingSort::Oldest => "created_at ASC",
            ListingSort::PriceAsc => "base_price ASC, created_at DESC",
            ListingSort::PriceDesc => "base_price DESC, created_at DESC",
            ListingSort::TopRated => "rating_average DESC, created_at DESC",
        }
    }
}

/// Search filter over approved listings.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_guests: Option<i32>,
    pub min_bedrooms: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub amenities: Vec<Amenity>,
    pub property_type: Option<PropertyType>,
    pub sort: ListingSort,
    pub limit: i64,
    pub offset: i64,
}

impl ListingFilter {
    /// In-process equivalent of the SQL predicate built by `push_filters`.
    pub fn matches(&self, listing: &Listing) -> bool {
        fn contains_ci(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        listing.status == ListingStatus::Approved
            && self.city.as_deref().map_or(true, |c| contains_ci(&listing.city, c))
            && self.state.as_deref().map_or(true, |s| contains_ci(&listing.state, s))
            && self.min_guests.map_or(true, |g| listing.max_guests >= g)
            && self.min_bedrooms.map_or(true, |b| listing.bedrooms >= b)
            && self.min_price.map_or(true, |p| listing.base_price >= p)
            && self.max_price.map_or(true, |p| listing.base_price <= p)
            && self.amenities.iter().all(|a| listing.amenities.0.contains(a))
            && self.property_type.map_or(true, |t| listing.property_type == t)
    }

    pub fn compare(&self, a: &Listing, b: &Listing) -> std::cmp::Ordering {
        match self.sort {
            ListingSort::Newest => b.created_at.cmp(&a.created_at),
            ListingSort::Oldest => a.created_at.cmp(&b.created_at),
            ListingSort::PriceAsc => a
                .base_price
                .cmp(&b.base_price)
                .then(b.created_at.cmp(&a.created_at)),
            ListingSort::PriceDesc => b
                .base_price
                .cmp(&a.base_price)
                .then(b.created_at.cmp(&a.created_at)),
            ListingSort::TopRated => b
                .rating_average
                .cmp(&a.rating_average)
                .then(b.created_at.cmp(&a.created_at)),
        }
    }

    fn push_filters(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE status = ").push_bind(ListingStatus::Approved);

        if let Some(city) = &self.city {
            qb.push(" AND city ILIKE ").push_bind(format!("%{}%", city));
        }
        if let Some(state) = &self.state {
            qb.push(" AND state ILIKE ").push_bind(format!("%{}%", state));
        }
        if let Some(guests) = self.min_guests {
            qb.push(" AND max_guests >= ").push_bind(guests);
        }
        if let Some(bedrooms) = self.min_bedrooms {
            qb.push(" AND bedrooms >= ").push_bind(bedrooms);
        }
        if let Some(min_price) = self.min_price {
            qb.push(" AND base_price >= ").push_bind(min_price);
        }
        if let Some(max_price) = self.max_price {
            qb.push(" AND base_price <= ").push_bind(max_price);
        }
        if !self.amenities.is_empty() {
            qb.push(" AND amenities @> ").push_bind(Json(self.amenities.clone()));
        }
        if let Some(property_type) = self.property_type {
            qb.push(" AND property_type = ").push_bind(property_type);
        }
    }
}

impl Listing {
    /// Build a new, pending listing from a host's request, applying defaults.
    pub fn from_request(host_id: Uuid, request: CreateListingRequest) -> Self {
        let now = Utc::now();
        let rules = request.availability.unwrap_or(eazypg_shared::AvailabilityRulesInput {
            min_nights: None,
            max_nights: None,
            instant_book: None,
        });

        Self {
            id: Uuid::new_v4(),
            host_id,
            title: request.title,
            description: request.description,
            property_type: request.property_type,
            address: request.location.address,
            city: request.location.city,
            state: request.location.state,
            zip_code: request.location.zip_code,
            country: request
                .location
                .country
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            latitude: request.location.latitude,
            longitude: request.location.longitude,
            max_guests: request.capacity.guests,
            bedrooms: request.capacity.bedrooms,
            beds: request.capacity.beds,
            bathrooms: request.capacity.bathrooms,
            amenities: Json(request.amenities),
            images: Json(request.images),
            base_price: request.pricing.base_price,
            cleaning_fee: request.pricing.cleaning_fee,
            service_fee: request.pricing.service_fee,
            currency: request
                .pricing
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            min_nights: rules.min_nights.unwrap_or(DEFAULT_MIN_NIGHTS),
            max_nights: rules.max_nights.unwrap_or(DEFAULT_MAX_NIGHTS),
            instant_book: rules.instant_book.unwrap_or(false),
            rating_average: Decimal::ZERO,
            rating_count: 0,
            status: ListingStatus::Pending,
            views: 0,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update into this listing.
    pub fn apply_update(&mut self, update: UpdateListingRequest) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(property_type) = update.property_type {
            self.property_type = property_type;
        }
        if let Some(location) = update.location {
            self.address = location.address;
            self.city = location.city;
            self.state = location.state;
            self.zip_code = location.zip_code;
            if let Some(country) = location.country {
                self.country = country;
            }
            self.latitude = location.latitude;
            self.longitude = location.longitude;
        }
        if let Some(capacity) = update.capacity {
            self.max_guests = capacity.guests;
            self.bedrooms = capacity.bedrooms;
            self.beds = capacity.beds;
            self.bathrooms = capacity.bathrooms;
        }
        if let Some(amenities) = update.amenities {
            self.amenities = Json(amenities);
        }
        if let Some(images) = update.images {
            self.images = Json(images);
        }
        if let Some(pricing) = update.pricing {
            self.base_price = pricing.base_price;
            self.cleaning_fee = pricing.cleaning_fee;
            self.service_fee = pricing.service_fee;
            if let Some(currency) = pricing.currency {
                self.currency = currency;
            }
        }
        if let Some(rules) = update.availability {
            if let Some(min_nights) = rules.min_nights {
                self.min_nights = min_nights;
            }
            if let Some(max_nights) = rules.max_nights {
                self.max_nights = max_nights;
            }
            if let Some(instant_book) = rules.instant_book {
                self.instant_book = instant_book;
            }
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }

    pub fn pricing(&self) -> ListingPricing {
        ListingPricing {
            base_price_per_night: self.base_price,
            cleaning_fee: self.cleaning_fee,
            service_fee_per_night: self.service_fee,
            currency: self.currency.clone(),
        }
    }

    pub async fn create(pool: &PgPool, listing: &Listing) -> Result<Self, AppError> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            INSERT INTO listings (
                id, host_id, title, description, property_type,
                address, city, state, zip_code, country, latitude, longitude,
                max_guests, bedrooms, beds, bathrooms, amenities, images,
                base_price, cleaning_fee, service_fee, currency,
                min_nights, max_nights, instant_book,
                rating_average, rating_count, status, views, featured,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32
            )
            RETURNING *
            "#,
        )
        .bind(listing.id)
        .bind(listing.host_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.property_type)
        .bind(&listing.address)
        .bind(&listing.city)
        .bind(&listing.state)
        .bind(&listing.zip_code)
        .bind(&listing.country)
        .bind(listing.latitude)
        .bind(listing.longitude)
        .bind(listing.max_guests)
        .bind(listing.bedrooms)
        .bind(listing.beds)
        .bind(listing.bathrooms)
        .bind(&listing.amenities)
        .bind(&listing.images)
        .bind(listing.base_price)
        .bind(listing.cleaning_fee)
        .bind(listing.service_fee)
        .bind(&listing.currency)
        .bind(listing.min_nights)
        .bind(listing.max_nights)
        .bind(listing.instant_book)
        .bind(listing.rating_average)
        .bind(listing.rating_count)
        .bind(listing.status)
        .bind(listing.views)
        .bind(listing.featured)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(listing)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        let listing = sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(listing)
    }

    pub async fn find_many(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Self>, AppError> {
        let listings = sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await?;

        Ok(listings)
    }

    /// Persist every host-editable column.
    pub async fn update(pool: &PgPool, listing: &Listing) -> Result<Self, AppError> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            UPDATE listings SET
                title = $2, description = $3, property_type = $4,
                address = $5, city = $6, state = $7, zip_code = $8, country = $9,
                latitude = $10, longitude = $11,
                max_guests = $12, bedrooms = $13, beds = $14, bathrooms = $15,
                amenities = $16, images = $17,
                base_price = $18, cleaning_fee = $19, service_fee = $20, currency = $21,
                min_nights = $22, max_nights = $23, instant_book = $24,
                status = $25, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(listing.id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.property_type)
        .bind(&listing.address)
        .bind(&listing.city)
        .bind(&listing.state)
        .bind(&listing.zip_code)
        .bind(&listing.country)
        .bind(listing.latitude)
        .bind(listing.longitude)
        .bind(listing.max_guests)
        .bind(listing.bedrooms)
        .bind(listing.beds)
        .bind(listing.bathrooms)
        .bind(&listing.amenities)
        .bind(&listing.images)
        .bind(listing.base_price)
        .bind(listing.cleaning_fee)
        .bind(listing.service_fee)
        .bind(&listing.currency)
        .bind(listing.min_nights)
        .bind(listing.max_nights)
        .bind(listing.instant_book)
        .bind(listing.status)
        .fetch_one(pool)
        .await?;

        Ok(listing)
    }

    /// Remove a listing that was never booked. Listings with booking
    /// history are set to `inactive` so bookings and reviews keep their
    /// listing.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let mut tx = pool.begin().await?;

        let booked: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM bookings WHERE listing_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let result = if booked {
            sqlx::query(
                "UPDATE listings SET status = 'inactive', updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?
        } else {
            sqlx::query("DELETE FROM listings WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
        };
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_views(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE listings SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn update_rating(
        pool: &PgPool,
        id: Uuid,
        average: Decimal,
        count: i32,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE listings SET rating_average = $1, rating_count = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(average)
        .bind(count)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// One page of approved listings plus the total matching count.
    pub async fn search(pool: &PgPool, filter: &ListingFilter) -> Result<(Vec<Self>, i64), AppError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM listings");
        filter.push_filters(&mut query);
        query.push(" ORDER BY ").push(filter.sort.order_by());
        query.push(" LIMIT ").push_bind(filter.limit);
        query.push(" OFFSET ").push_bind(filter.offset);

        let listings = query
            .build_query_as::<Listing>()
            .fetch_all(pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM listings");
        filter.push_filters(&mut count);
        let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

        Ok((listings, total))
    }

    pub async fn find_featured(pool: &PgPool, limit: i64) -> Result<Vec<Self>, AppError> {
        let listings = sqlx::query_as::<_, Listing>(
            r#"
            SELECT * FROM listings
            WHERE status = 'approved' AND featured = TRUE
            ORDER BY rating_average DESC, created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(listings)
    }

    pub async fn find_approved_by_host(pool: &PgPool, host_id: Uuid) -> Result<Vec<Self>, AppError> {
        let listings = sqlx::query_as::<_, Listing>(
            r#"
            SELECT * FROM listings
            WHERE host_id = $1 AND status = 'approved'
            ORDER BY created_at DESC
            "#,
        )
        .bind(host_id)
        .fetch_all(pool)
        .await?;

        Ok(listings)
    }

    pub fn to_response(&self, host: Option<UserSummary>) -> ListingResponse {
        ListingResponse {
            id: self.id,
            host_id: self.host_id,
            host,
            title: self.title.clone(),
            description: self.description.clone(),
            property_type: self.property_type,
            location: LocationResponse {
                address: self.address.clone(),
                city: self.city.clone(),
                state: self.state.clone(),
                zip_code: self.zip_code.clone(),
                country: self.country.clone(),
                latitude: self.latitude,
                longitude: self.longitude,
            },
            capacity: CapacityResponse {
                guests: self.max_guests,
                bedrooms: self.bedrooms,
                beds: self.beds,
                bathrooms: self.bathrooms,
            },
            amenities: self.amenities.0.clone(),
            images: self.images.0.clone(),
            pricing: self.pricing_response(),
            availability: AvailabilityRulesResponse {
                min_nights: self.min_nights,
                max_nights: self.max_nights,
                instant_book: self.instant_book,
            },
            rating: RatingResponse {
                average: self.rating_average,
                count: self.rating_count,
            },
            status: self.status,
            views: self.views,
            featured: self.featured,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn to_summary(&self) -> ListingSummary {
        ListingSummary {
            id: self.id,
            title: self.title.clone(),
            images: self.images.0.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            pricing: self.pricing_response(),
        }
    }

    fn pricing_response(&self) -> PricingResponse {
        PricingResponse {
            base_price: self.base_price,
            cleaning_fee: self.cleaning_fee,
            service_fee: self.service_fee,
            currency: self.currency.clone(),
        }
    }
}

/// A host block or a booking's hold on a listing's calendar.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BlockedDate {
    pub id: Uuid,
    pub listing_id: Uuid,
    /// Set when the block is a booking's hold; released with the booking.
    pub booking_id: Option<Uuid>,
    pub blocked_from: DateTime<Utc>,
    pub blocked_to: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl BlockedDate {
    pub fn new(
        listing_id: Uuid,
        booking_id: Option<Uuid>,
        range: &DateRange,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            listing_id,
            booking_id,
            blocked_from: range.from(),
            blocked_to: range.to(),
            created_at: Utc::now(),
        }
    }

    pub fn range(&self) -> Result<DateRange, InvalidRangeError> {
        DateRange::new(self.blocked_from, self.blocked_to)
    }

    pub async fn find_by_listing(pool: &PgPool, listing_id: Uuid) -> Result<Vec<Self>, AppError> {
        let blocks = sqlx::query_as::<_, BlockedDate>(
            "SELECT * FROM blocked_dates WHERE listing_id = $1 ORDER BY blocked_from",
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await?;

        Ok(blocks)
    }

    pub async fn create<'e, E>(executor: E, block: &BlockedDate) -> Result<Self, AppError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let block = sqlx::query_as::<_, BlockedDate>(
            r#"
            INSERT INTO blocked_dates (id, listing_id, booking_id, blocked_from, blocked_to, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(block.id)
        .bind(block.listing_id)
        .bind(block.booking_id)
        .bind(block.blocked_from)
        .bind(block.blocked_to)
        .bind(block.created_at)
        .fetch_one(executor)
        .await?;

        Ok(block)
    }

    /// Remove a host block. Booking holds are only released through their booking.
    pub async fn delete_host_block(
        pool: &PgPool,
        listing_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM blocked_dates WHERE id = $1 AND listing_id = $2 AND booking_id IS NULL",
        )
        .bind(id)
        .bind(listing_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn release_for_booking<'e, E>(executor: E, booking_id: Uuid) -> Result<u64, AppError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM blocked_dates WHERE booking_id = $1")
            .bind(booking_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub fn to_response(&self) -> BlockedDateResponse {
        BlockedDateResponse {
            id: self.id,
            from: self.blocked_from,
            to: self.blocked_to,
            booking_id: self.booking_id,
        }
    }
}
