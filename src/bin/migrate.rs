//! Applies pending schema migrations to the configured client database.

use std::env;

use config::Config;
use dotenvy::dotenv;

use client_registry::db::{establish_connection_pool_with, get_connection, run_migrations};
use client_registry::models::config::DatabaseConfig;

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            std::process::exit(1);
        }
    };

    let database_config = match settings.try_deserialize::<DatabaseConfig>() {
        Ok(database_config) => database_config,
        Err(err) => {
            log::error!("Error loading database config: {}", err);
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool_with(&database_config) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let mut conn = match get_connection(&pool) {
        Ok(conn) => conn,
        Err(_) => std::process::exit(1),
    };

    match run_migrations(&mut conn) {
        Ok(0) => log::info!("Database {} is up to date", database_config.database_url),
        Ok(applied) => log::info!(
            "Applied {applied} migration(s) to {}",
            database_config.database_url
        ),
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}
