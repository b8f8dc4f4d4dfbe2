// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use errors::AppError;
use services::{start_cleanup_task, AuthRateLimiter, Mailer};
use std::io;

/// Seconds between housekeeping runs
const CLEANUP_INTERVAL_SECS: u64 = 300;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        if config.is_production() {
            std::process::exit(1);
        }
    }

    log::info!("Starting shutterconnect-api...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config::run_migrations(&pool).await {
        log::error!("Failed to run database migrations: {}", e);
        std::process::exit(1);
    }

    // 5. Shared services
    let mailer = Mailer::new(&config);

    let limiter = AuthRateLimiter::per_minute(config.auth_rate_limit_per_minute);
    log::info!(
        "Auth rate limit: {} requests/minute per client",
        config.auth_rate_limit_per_minute
    );

    start_cleanup_task(pool.clone(), limiter.clone(), CLEANUP_INTERVAL_SECS);
    log::info!("Started token cleanup task (interval: {}s)", CLEANUP_INTERVAL_SECS);

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let pool = web::Data::new(pool);
    let config = web::Data::new(config);
    let mailer = web::Data::new(mailer);
    let limiter = web::Data::new(limiter);

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(pool.clone())
            .app_data(config.clone())
            .app_data(mailer.clone())
            .app_data(limiter.clone())
            // Malformed bodies, queries and paths use the same error shape as everything else
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::InvalidInput(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::InvalidInput(err.to_string()).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                AppError::InvalidInput(err.to_string()).into()
            }))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::auth_config)
            .configure(handlers::photographers_config)
            .configure(handlers::packages_config)
            .configure(handlers::availability_config)
            .configure(handlers::bookings_config)
            .configure(handlers::payments_config)
            .configure(handlers::notifications_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
