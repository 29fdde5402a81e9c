//! Eazypg backend: vacation rental listings, bookings, reviews and support
//! tickets over an actix-web JSON API.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod rules;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use database::Database;
pub use error::AppError;
pub use repositories::Repositories;
pub use services::Services;
