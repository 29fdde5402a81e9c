// Authentication
pub const JWT_DEFAULT_EXPIRY_HOURS: i64 = 24;
pub const JWT_MIN_SECRET_LENGTH: usize = 32;

// Pagination defaults
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const DEFAULT_REVIEW_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const FEATURED_LISTINGS_LIMIT: i64 = 10;

// Listing defaults
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_COUNTRY: &str = "USA";
pub const DEFAULT_MIN_NIGHTS: i32 = 1;
pub const DEFAULT_MAX_NIGHTS: i32 = 365;

// Cancellation policy (hours before check-in)
pub const CANCELLATION_CUTOFF_HOURS: i64 = 48;
pub const FULL_REFUND_CUTOFF_HOURS: i64 = 168;
pub const PARTIAL_REFUND_PERCENT: i64 = 50;

// Reviews
pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;
pub const MAX_REVIEW_COMMENT_LENGTH: u64 = 1000;

// Error messages
pub const ERROR_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ERROR_EMAIL_ALREADY_EXISTS: &str = "Email address is already registered";
pub const ERROR_USER_NOT_FOUND: &str = "User not found";
pub const ERROR_LISTING_NOT_FOUND: &str = "Listing not found";
pub const ERROR_BOOKING_NOT_FOUND: &str = "Booking not found";
pub const ERROR_REVIEW_NOT_FOUND: &str = "Review not found";
pub const ERROR_CONTACT_NOT_FOUND: &str = "Contact form not found";
pub const ERROR_NOT_AVAILABLE: &str = "Listing not available for selected dates";
pub const ERROR_TOO_MANY_GUESTS: &str = "Too many guests for this listing";
pub const ERROR_CANNOT_CANCEL: &str = "Booking cannot be cancelled within 48 hours of check-in";
pub const ERROR_REVIEW_EXISTS: &str = "Review already submitted";
pub const ERROR_LISTING_HAS_BOOKINGS: &str = "Listing has pending or confirmed bookings";
pub const ERROR_BOOKING_CHANGED: &str = "Booking was changed by another request";
pub const ERROR_NOT_AUTHORIZED: &str = "Not authorized";

// Success messages
pub const SUCCESS_USER_CREATED: &str = "User registered successfully";
pub const SUCCESS_LOGIN: &str = "Login successful";
pub const SUCCESS_LISTING_CREATED: &str = "Listing created successfully";
pub const SUCCESS_LISTING_UPDATED: &str = "Listing updated successfully";
pub const SUCCESS_LISTING_DELETED: &str = "Listing deleted successfully";
pub const SUCCESS_BOOKING_CREATED: &str = "Booking created successfully";
pub const SUCCESS_BOOKING_CONFIRMED: &str = "Booking confirmed successfully";
pub const SUCCESS_BOOKING_REJECTED: &str = "Booking rejected";
pub const SUCCESS_BOOKING_CANCELLED: &str = "Booking cancelled successfully";
pub const SUCCESS_BOOKING_COMPLETED: &str = "Booking marked as completed";
pub const SUCCESS_REVIEW_CREATED: &str = "Review submitted successfully";
pub const SUCCESS_REVIEW_RESPONSE: &str = "Response added successfully";
pub const SUCCESS_CONTACT_SUBMITTED: &str =
    "Contact form submitted successfully. We will get back to you soon.";
