//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Which post store is serving reads and writes.
    pub store: &'static str,
    /// Number of subjects allowed to create posts.
    pub authors: usize,
}

/// GET /health
///
/// Reports the active store so an accidental in-memory fallback is visible.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.posts.store_backend(),
        authors: state.posts.policy().len(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use serde_json::Value;

    use quill_core::AuthorPolicy;
    use quill_infra::{InMemoryPostStore, JwtConfig, JwtIdTokenVerifier};

    use super::*;

    #[actix_web::test]
    async fn test_health_reports_store_and_allowlist() {
        let state = AppState::from_parts(
            Arc::new(InMemoryPostStore::new()),
            Arc::new(JwtIdTokenVerifier::new(JwtConfig::default())),
            AuthorPolicy::new(["uid-a", "uid-b"]),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/health", web::get().to(health_check)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["authors"], 2);
    }
}
