mod auth;
mod config;
mod database;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;

use crate::db::{stage_db, stage_redis};
use crate::middleware::RequestLogger;
use crate::routes as app_routes;
use crate::service::token::TokenService;
use rocket::http::Method;
use rocket::{Build, Rocket, catchers};
use rocket_cors::{AllowedOrigins, CorsOptions};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG overrides the configured level for fine-grained control,
    // e.g. RUST_LOG=info,classtrack::routes=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    // A later call (another local test client, for instance) finds the global
    // subscriber already set; that is not an error.
    if json_format {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}

fn build_cors(cors_config: &config::CorsConfig) -> CorsOptions {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    if is_wildcard && cors_config.allow_credentials {
        panic!(
            "Invalid CORS configuration: Cannot use wildcard origins (*) with credentials enabled. \
            Either set specific origins or disable credentials."
        );
    }

    let allowed_origins = if cors_config.allowed_origins.is_empty() {
        AllowedOrigins::some_exact::<&str>(&[])
    } else if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Put, Method::Delete, Method::Options, Method::Head]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Authorization", "Accept"]),
        allow_credentials: cors_config.allow_credentials,
        ..Default::default()
    }
}

pub fn build_rocket(config: Config) -> Rocket<Build> {
    init_tracing(&config.logging.level, config.logging.json_format);

    let cors = build_cors(&config.cors).to_cors().expect("Failed to create CORS fairing");

    let figment = rocket::Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", config.server.address.clone()));

    let refresh_ttl = Duration::from_secs(config.jwt.refresh_ttl_seconds);

    rocket::custom(figment)
        .attach(cors)
        .attach(RequestLogger)
        .attach(stage_db(config.database))
        .attach(stage_redis(config.redis, refresh_ttl))
        .manage(TokenService::from_config(&config.jwt))
        .mount("/api/auth", app_routes::auth::routes())
        .mount("/api/users", app_routes::user::routes())
        .mount("/api/modules", app_routes::module::routes())
        .mount("/api/enrollments", app_routes::enrollment::routes())
        .mount("/api/attendance", app_routes::attendance::routes())
        .mount("/api/statistics", app_routes::statistics::routes())
        .mount("/api/posts", app_routes::post::routes())
        .mount("/api/health", app_routes::health::routes())
        .register(
            "/api",
            catchers![
                app_routes::error::unauthorized,
                app_routes::error::forbidden,
                app_routes::error::not_found,
                app_routes::error::conflict,
            ],
        )
}
