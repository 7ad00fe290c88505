use axum::routing::get;
use axum::Router;

use crate::handlers::reservation::{delete_reservation, get_reservation, get_reservations};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reservation/reservations", get(get_reservations))
        .route(
            "/reservation/reservations/{resId}",
            get(get_reservation).delete(delete_reservation),
        )
}
