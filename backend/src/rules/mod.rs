//! Pure booking rules.
//!
//! Everything in here is synchronous and free of I/O: the services fetch a
//! snapshot of the relevant rows, hand plain values to these functions and
//! persist whatever comes back.

pub mod availability;
pub mod pricing;
pub mod rating;
pub mod refund;

pub use availability::{is_available, DateRange, InvalidRangeError, StayRequest};
pub use pricing::{compute_breakdown, nights_between, ListingPricing, PriceBreakdown};
pub use rating::{average_rating, RatingSummary};
pub use refund::{can_cancel, compute_refund};
