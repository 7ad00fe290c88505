// src/main.rs
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::fmt::init as tracing_init;

use motorpool_backend::assets::FsAssetStore;
use motorpool_backend::auth::jwt::AuthConfig;
use motorpool_backend::database;
use motorpool_backend::routes;
use motorpool_backend::state::AppState;
use motorpool_backend::store::postgres::PostgresStore;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_init();

    // Load environment variables
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let audience = std::env::var("AUTH_AUDIENCE").expect("AUTH_AUDIENCE must be set");

    let pool = database::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");
    database::ensure_schema(&pool)
        .await
        .expect("Failed to prepare document table");

    let media_dir = std::env::var("MEDIA_DIR").unwrap_or_else(|_| "media".to_string());
    let media_base = std::env::var("MEDIA_BASE_URL").unwrap_or_else(|_| "/media".to_string());

    let app_state = AppState::new(
        Arc::new(PostgresStore::new(pool)),
        Arc::new(FsAssetStore::new(media_dir, media_base)),
        Arc::new(AuthConfig {
            secret: jwt_secret,
            audience,
        }),
    );

    // CORS: local development origin plus the hosted frontend, when set
    let mut origins: Vec<HeaderValue> =
        vec!["http://localhost:3000".parse().expect("static origin")];
    if let Ok(frontend) = std::env::var("FRONTEND_URL") {
        match frontend.parse() {
            Ok(origin) => origins.push(origin),
            Err(e) => tracing::warn!(%frontend, error = %e, "Ignoring invalid FRONTEND_URL"),
        }
    }
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let app = Router::new()
        .nest("/api", routes::create_router(app_state.clone()))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(app_state);

    // Start server with HOST/PORT env and graceful port selection
    let host_str = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let host: IpAddr = host_str
        .parse()
        .unwrap_or_else(|_| "127.0.0.1".parse().unwrap());
    let base_port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    // Try base_port..base_port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = base_port.saturating_add(offset);
            let addr = SocketAddr::from((host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => {
                    bound = Some((l, addr));
                    break;
                }
                Err(e) => {
                    if offset == 0 {
                        tracing::warn!(%addr, error = %e, "Port in use, trying next");
                    }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on {}", addr);
                l
            }
            None => {
                tracing::error!(
                    "Failed to bind to any port starting at {} on {}",
                    base_port,
                    host
                );
                return;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
    }
}

async fn health_check() -> &'static str {
    "OK"
}
