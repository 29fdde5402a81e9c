use crate::types::*;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// User DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Public view of another user, embedded in listings, bookings and reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub is_host: bool,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

// Listing DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationInput {
    #[validate(length(min = 1, max = 255))]
    pub address: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 100))]
    pub state: String,

    #[validate(length(min = 1, max = 20))]
    pub zip_code: String,

    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CapacityInput {
    #[validate(range(min = 1, max = 100))]
    pub guests: i32,

    #[validate(range(min = 0, max = 100))]
    pub bedrooms: i32,

    #[validate(range(min = 1, max = 100))]
    pub beds: i32,

    /// Half bathrooms allowed, minimum 0.5.
    pub bathrooms: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInput {
    pub base_price: Decimal,
    #[serde(default)]
    pub cleaning_fee: Decimal,
    #[serde(default)]
    pub service_fee: Decimal,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AvailabilityRulesInput {
    #[validate(range(min = 1, max = 365))]
    pub min_nights: Option<i32>,

    #[validate(range(min = 1, max = 365))]
    pub max_nights: Option<i32>,

    pub instant_book: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    pub property_type: PropertyType,

    #[validate]
    pub location: LocationInput,

    #[validate]
    pub capacity: CapacityInput,

    #[serde(default)]
    pub amenities: Vec<Amenity>,

    #[serde(default)]
    #[validate(length(max = 20))]
    pub images: Vec<ListingImage>,

    pub pricing: PricingInput,

    #[validate]
    pub availability: Option<AvailabilityRulesInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateListingRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,

    pub property_type: Option<PropertyType>,

    #[validate]
    pub location: Option<LocationInput>,

    #[validate]
    pub capacity: Option<CapacityInput>,

    pub amenities: Option<Vec<Amenity>>,

    #[validate(length(max = 20))]
    pub images: Option<Vec<ListingImage>>,

    pub pricing: Option<PricingInput>,

    #[validate]
    pub availability: Option<AvailabilityRulesInput>,

    pub status: Option<ListingStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityResponse {
    pub guests: i32,
    pub bedrooms: i32,
    pub beds: i32,
    pub bathrooms: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingResponse {
    pub base_price: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRulesResponse {
    pub min_nights: i32,
    pub max_nights: i32,
    pub instant_book: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingResponse {
    pub average: Decimal,
    pub count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub id: Uuid,
    pub host_id: Uuid,
    pub host: Option<UserSummary>,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub location: LocationResponse,
    pub capacity: CapacityResponse,
    pub amenities: Vec<Amenity>,
    pub images: Vec<ListingImage>,
    pub pricing: PricingResponse,
    pub availability: AvailabilityRulesResponse,
    pub rating: RatingResponse,
    pub status: ListingStatus,
    pub views: i64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact listing view embedded in bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSummary {
    pub id: Uuid,
    pub title: String,
    pub images: Vec<ListingImage>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pricing: PricingResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListingSearchQuery {
    pub city: Option<String>,
    pub state: Option<String>,

    #[validate(range(min = 1))]
    pub guests: Option<i32>,

    #[validate(range(min = 0))]
    pub bedrooms: Option<i32>,

    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,

    /// Comma separated, every amenity must be present.
    pub amenities: Option<String>,

    pub property_type: Option<PropertyType>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,

    #[validate(range(min = 1))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,

    pub sort: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PaginationMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingPage {
    pub listings: Vec<ListingResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDatesRequest {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedDateResponse {
    pub id: Uuid,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub booking_id: Option<Uuid>,
}

// Booking DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GuestCounts {
    #[validate(range(min = 1, max = 100))]
    pub adults: i32,

    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub children: i32,

    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub infants: i32,

    #[serde(default)]
    #[validate(range(min = 0, max = 20))]
    pub pets: i32,
}

impl GuestCounts {
    /// Infants and pets do not count towards listing capacity.
    pub fn counted(&self) -> i32 {
        self.adults + self.children
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GuestDetails {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,

    #[validate(length(max = 100))]
    pub last_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub listing_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,

    #[validate]
    pub guests: GuestCounts,

    #[validate]
    pub guest_details: Option<GuestDetails>,

    pub payment_method: PaymentMethod,

    #[validate(length(max = 2000))]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CancelBookingRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingListQuery {
    #[serde(rename = "type")]
    pub party: Option<BookingParty>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPricingResponse {
    pub base_price: Decimal,
    pub nights: i32,
    pub subtotal: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationResponse {
    pub cancelled_by: Option<Uuid>,
    pub cancelled_at: DateTime<Utc>,
    pub reason: Option<String>,
    pub refund_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewedFlags {
    pub by_guest: bool,
    pub by_host: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub listing: Option<ListingSummary>,
    pub guest_id: Uuid,
    pub guest: Option<UserSummary>,
    pub host_id: Uuid,
    pub host: Option<UserSummary>,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub nights: i32,
    pub guests: GuestCounts,
    pub pricing: BookingPricingResponse,
    pub payment: PaymentResponse,
    pub status: BookingStatus,
    pub guest_details: GuestDetails,
    pub special_requests: String,
    pub cancellation: Option<CancellationResponse>,
    pub reviewed: ReviewedFlags,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    pub message: String,
    pub booking: BookingResponse,
    pub refund_amount: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRangeResponse {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub unavailable_dates: Vec<DateRangeResponse>,
    pub min_nights: i32,
    pub max_nights: i32,
}

// Review DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RatingsInput {
    #[validate(range(min = 1, max = 5))]
    pub overall: i16,

    #[validate(range(min = 1, max = 5))]
    pub cleanliness: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub accuracy: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub check_in: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub communication: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub location: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub value: Option<i16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub booking_id: Uuid,

    #[validate]
    pub ratings: RatingsInput,

    #[validate(length(min = 1, max = 1000))]
    pub comment: String,

    pub review_type: ReviewType,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewReplyRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewReply {
    pub text: String,
    pub responded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub booking_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewer: Option<UserSummary>,
    pub reviewee_id: Uuid,
    pub review_type: ReviewType,
    pub ratings: RatingsInput,
    pub comment: String,
    pub response: Option<ReviewReply>,
    pub helpful_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewPage {
    pub reviews: Vec<ReviewResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HelpfulResponse {
    pub message: String,
    pub helpful_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

// Contact DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000))]
    pub message: String,

    pub category: Option<ContactCategory>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactSubmittedResponse {
    pub message: String,
    pub ticket_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub category: ContactCategory,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
