pub mod booking;
pub mod contact;
pub mod listing;
pub mod review;
pub mod user;

pub use booking::{Booking, NewBooking};
pub use contact::ContactTicket;
pub use listing::{BlockedDate, Listing, ListingFilter, ListingSort};
pub use review::Review;
pub use user::{NewUser, User};
