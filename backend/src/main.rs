use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, App, HttpServer};
use chrono::Utc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use eazypg_backend::handlers;
use eazypg_backend::services::BookingService;
use eazypg_backend::utils::jwt::JwtService;
use eazypg_backend::{AppConfig, AppError, Database, Repositories, Services};

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!("Starting Eazypg backend on {}:{}", config.host, config.port);

    let database = Database::new(&config.database_url, config.max_db_connections).await?;
    database.migrate().await?;
    info!("Database migrations applied");

    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiry_hours)?;
    let services = Services::new(Repositories::postgres(database.pool().clone()), jwt_service);

    spawn_completion_sweep(
        services.bookings.clone(),
        Duration::from_secs(config.completion_sweep_secs.max(1)),
    );

    let allowed_origin = config.cors_allowed_origin.clone();
    HttpServer::new(move || {
        let cors = match &allowed_origin {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(3600);

        let services = services.clone();
        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .configure(|cfg| handlers::configure(cfg, &services))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
    .map_err(AppError::from)
}

/// Periodically move confirmed bookings past checkout to completed.
fn spawn_completion_sweep(bookings: BookingService, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            if let Err(err) = bookings.complete_past_bookings(Utc::now()).await {
                error!("Booking completion sweep failed: {}", err);
            }
        }
    });
}
