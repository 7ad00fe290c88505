use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth::{get_profile, upload_license};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/profile", get(get_profile))
        .route("/auth/upload-license", post(upload_license))
}
