use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::env;
use tracing::{info, warn};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let command = env::args().nth(1).unwrap_or_else(|| "up".to_string());
    match command.as_str() {
        "up" => {
            info!("Running database migrations...");
            MIGRATOR
                .run(&pool)
                .await
                .context("Failed to apply migrations")?;
            info!("Database migrations completed successfully");
        }
        "status" => show_migration_status(&pool).await?,
        _ => {
            eprintln!("Usage: migrate [up|status]");
            eprintln!("  up      - Run all pending migrations (default)");
            eprintln!("  status  - Show applied and pending migrations");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn show_migration_status(pool: &sqlx::PgPool) -> Result<()> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = '_sqlx_migrations'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("Failed to check migrations table")?;

    let applied: HashMap<i64, chrono::DateTime<chrono::Utc>> = if table_exists {
        sqlx::query_as::<_, (i64, chrono::DateTime<chrono::Utc>)>(
            "SELECT version, installed_on FROM _sqlx_migrations WHERE success = TRUE",
        )
        .fetch_all(pool)
        .await
        .context("Failed to fetch migration status")?
        .into_iter()
        .collect()
    } else {
        HashMap::new()
    };

    for migration in MIGRATOR.iter() {
        match applied.get(&migration.version) {
            Some(applied_at) => info!(
                "  {} {} (applied at: {})",
                migration.version,
                migration.description,
                applied_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => warn!("  {} {} (pending)", migration.version, migration.description),
        }
    }

    Ok(())
}
