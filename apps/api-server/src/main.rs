//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::{MountRoot, cors_headers};
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API Server on {}:{} (posts at {})",
        config.host,
        config.port,
        config.base_path
    );

    let state = AppState::new(&config).map_err(std::io::Error::other)?;
    let base_path = config.base_path.clone();

    HttpServer::new(move || {
        let base_path = base_path.clone();
        App::new()
            .wrap(cors_headers())
            .wrap(MountRoot::new(base_path.clone()))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| handlers::configure_routes(cfg, &base_path))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
