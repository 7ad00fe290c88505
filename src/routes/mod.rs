pub mod auth;
pub mod reimbursements;
pub mod reservations;
pub mod vehicles;

use axum::{middleware, Router};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

/// Every API route sits behind bearer authentication; the state handle is
/// threaded into the middleware so role lookup goes through the injected
/// store.
pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(vehicles::routes())
        .merge(reservations::routes())
        .merge(reimbursements::routes())
        .merge(auth::routes())
        .layer(middleware::from_fn_with_state(state, require_auth))
}
