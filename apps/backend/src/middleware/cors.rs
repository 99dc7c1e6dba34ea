use std::env;

use actix_cors::Cors;
use actix_web::http::header;

pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// Origins allowed to call the API.
///
/// The local frontend origin is always present; `FRONTEND_ORIGIN` and each
/// comma-separated list (`CORS_ORIGIN`, `CORS_ALLOWED_ORIGINS`) add to it.
/// Empty, "null" and non-http(s) entries are ignored.
pub fn allowed_origins_from(frontend: Option<&str>, lists: &[Option<&str>]) -> Vec<String> {
    let mut origins = vec![DEFAULT_FRONTEND_ORIGIN.to_string()];

    let configured = frontend
        .into_iter()
        .chain(lists.iter().flatten().copied().flat_map(|raw| raw.split(',')))
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"));

    for origin in configured {
        if !origins.iter().any(|o| o == origin) {
            origins.push(origin.to_string());
        }
    }
    origins
}

/// CORS for the draw API. Requests without an Origin header are not CORS
/// requests and pass through untouched.
pub fn cors_middleware() -> Cors {
    let frontend = env::var("FRONTEND_ORIGIN").ok();
    let cors_origin = env::var("CORS_ORIGIN").ok();
    let cors_allowed = env::var("CORS_ALLOWED_ORIGINS").ok();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-guest-id"),
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
            header::RETRY_AFTER,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in allowed_origins_from(
        frontend.as_deref(),
        &[cors_origin.as_deref(), cors_allowed.as_deref()],
    ) {
        cors = cors.allowed_origin(&origin);
    }

    cors
}
