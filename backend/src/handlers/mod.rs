use actix_web::web;

use crate::error::AppError;
use crate::services::Services;

pub mod auth;
pub mod bookings;
pub mod contact;
pub mod health;
pub mod listings;
pub mod reviews;

/// Register shared state and every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig, services: &Services) {
    cfg.app_data(web::Data::from(services.jwt.clone()))
        .app_data(web::Data::new(services.auth.clone()))
        .app_data(web::Data::new(services.listings.clone()))
        .app_data(web::Data::new(services.bookings.clone()))
        .app_data(web::Data::new(services.reviews.clone()))
        .app_data(web::Data::new(services.contact.clone()))
        .app_data(web::JsonConfig::default().error_handler(|err, _| {
            AppError::Validation(err.to_string()).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _| {
            AppError::Validation(err.to_string()).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _| {
            AppError::Validation(err.to_string()).into()
        }))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                .service(
                    web::scope("/listings")
                        .route("", web::get().to(listings::search_listings))
                        .route("", web::post().to(listings::create_listing))
                        .route("/featured", web::get().to(listings::featured_listings))
                        .route("/host/{host_id}", web::get().to(listings::host_listings))
                        .route("/{id}", web::get().to(listings::get_listing))
                        .route("/{id}", web::put().to(listings::update_listing))
                        .route("/{id}", web::delete().to(listings::delete_listing))
                        .route("/{id}/blocked-dates", web::post().to(listings::block_dates))
                        .route(
                            "/{id}/blocked-dates/{block_id}",
                            web::delete().to(listings::unblock_dates),
                        ),
                )
                .service(
                    web::scope("/bookings")
                        .route("", web::get().to(bookings::list_bookings))
                        .route("", web::post().to(bookings::create_booking))
                        .route(
                            "/listing/{listing_id}/availability",
                            web::get().to(bookings::listing_availability),
                        )
                        .route("/{id}", web::get().to(bookings::get_booking))
                        .route("/{id}/confirm", web::put().to(bookings::confirm_booking))
                        .route("/{id}/reject", web::put().to(bookings::reject_booking))
                        .route("/{id}/cancel", web::put().to(bookings::cancel_booking))
                        .route("/{id}/complete", web::put().to(bookings::complete_booking)),
                )
                .service(
                    web::scope("/reviews")
                        .route("", web::post().to(reviews::create_review))
                        .route("/listing/{listing_id}", web::get().to(reviews::listing_reviews))
                        .route("/{id}/response", web::post().to(reviews::respond_to_review))
                        .route("/{id}/helpful", web::post().to(reviews::toggle_helpful)),
                )
                .service(
                    web::scope("/contact")
                        .route("", web::post().to(contact::submit_contact))
                        .route("", web::get().to(contact::list_contacts))
                        .route("/{id}", web::get().to(contact::get_contact)),
                ),
        );
}
