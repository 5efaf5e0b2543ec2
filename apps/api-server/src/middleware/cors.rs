//! CORS response headers, added to every response.

use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept";
/// Sent on preflight responses only.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Middleware that stamps the CORS headers on every response.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
}
