use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_db_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// Seconds between sweeps that complete bookings past their checkout.
    pub completion_sweep_secs: u64,
    pub cors_allowed_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("max_db_connections", 20)?
            .set_default("jwt_expiry_hours", eazypg_shared::JWT_DEFAULT_EXPIRY_HOURS)?
            .set_default("completion_sweep_secs", 3600)?
            .add_source(config::Environment::default())
            .build()?;

        config.try_deserialize()
    }
}
