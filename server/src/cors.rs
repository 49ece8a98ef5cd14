use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, Cors, CorsOptions};
use std::env;

/// Builds the CORS fairing from the comma separated `CORS_ALLOWED_ORIGINS`.
pub fn create_cors() -> Result<Cors, rocket_cors::Error> {
    let allowed_origins_env =
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string());

    let allowed_origins: Vec<String> = allowed_origins_env
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    CorsOptions {
        allowed_origins: AllowedOrigins::some_exact(&allowed_origins),
        allowed_methods: [Method::Get, Method::Post, Method::Delete, Method::Options]
            .into_iter()
            .map(Into::into)
            .collect(),
        allowed_headers: AllowedHeaders::some(&["Accept", "Content-Type"]),
        allow_credentials: false,
        ..Default::default()
    }
    .to_cors()
}
