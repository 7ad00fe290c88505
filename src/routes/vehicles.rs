use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::vehicle::{
    admin_reservations, create_vehicle, delete_vehicle, get_vehicles, repair_vehicle,
    report_malfunction, reserve_vehicle, unreserve_vehicle,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vehicle/vehicles", get(get_vehicles).post(create_vehicle))
        .route("/vehicle/vehicles/{vehicleId}", delete(delete_vehicle))
        .route("/vehicle/vehicles/{vehicleId}/repair", patch(repair_vehicle))
        .route(
            "/vehicle/vehicles/{vehicleId}/reserve",
            patch(reserve_vehicle),
        )
        .route(
            "/vehicle/vehicles/{vehicleId}/unreserve",
            patch(unreserve_vehicle),
        )
        .route("/vehicle/report-malfunction", post(report_malfunction))
        .route("/vehicle/admin-reservations", get(admin_reservations))
}
