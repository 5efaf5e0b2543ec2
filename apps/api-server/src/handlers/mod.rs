//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::{http::Method, web};

/// Configure all application routes, with the posts API under `base_path`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, base_path: &str) {
    // A root mount must be an empty scope prefix, or routes would need `//`.
    let prefix = if base_path == "/" { "" } else { base_path };

    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope(prefix)
                .route("/", web::get().to(posts::list_posts))
                .route("/", web::post().to(posts::create_post))
                .route("/", web::method(Method::OPTIONS).to(posts::preflight))
                .route("/{id}", web::get().to(posts::get_post))
                .route("/{id}", web::method(Method::OPTIONS).to(posts::preflight)),
        );
}
