use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dtos::vehicle::{CreateVehicleRequest, ReportMalfunctionRequest, ReserveVehicleRequest};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::malfunction::{self, MalfunctionReport};
use crate::models::reservation::{self, Reservation, ReservationStatus};
use crate::models::user::Role;
use crate::models::vehicle::{self, Vehicle, VehicleStatus};
use crate::state::AppState;
use crate::store::{Document, StoreError, WriteBatch};

const VEHICLE_NOT_FOUND: &str = "No vehicle found with the specified ID";

/// Full inventory, raw document passthrough. Visibility filtering by status
/// is a front-end concern.
pub async fn get_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let docs = state.store.list(vehicle::COLLECTION).await?;
    Ok(Json(docs.into_iter().map(|doc| doc.data).collect()))
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    if auth.role != Role::Admin {
        return Err(AppError::forbidden("Only admins can add vehicles."));
    }
    if req.vehicle_name.trim().is_empty() {
        return Err(AppError::validation("Vehicle name is required."));
    }

    let new_vehicle = Vehicle {
        vehicle_id: Uuid::new_v4().to_string(),
        vehicle_name: req.vehicle_name.trim().to_string(),
        color: req.color,
        year: req.year,
        image: req.image,
        engine: req.engine,
        hp: req.hp,
        vehicle_type: req.vehicle_type,
        status: VehicleStatus::Available,
    };
    let data = serde_json::to_value(&new_vehicle).map_err(|e| AppError::internal(e.to_string()))?;
    state
        .store
        .set(vehicle::COLLECTION, &new_vehicle.vehicle_id, data)
        .await?;

    Ok((StatusCode::CREATED, Json(new_vehicle)))
}

/// Toggle a vehicle in and out of the repair state. Reserved vehicles cannot
/// change status; a maintenance-requested vehicle toggles into repair.
pub async fn repair_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doc = state
        .store
        .get(vehicle::COLLECTION, &vehicle_id)
        .await?
        .ok_or_else(|| AppError::not_found(VEHICLE_NOT_FOUND))?;

    let status = doc
        .data
        .get("status")
        .and_then(Value::as_str)
        .and_then(VehicleStatus::parse);
    let next = match status {
        Some(VehicleStatus::Reserved) => {
            return Err(AppError::invalid_state(
                "Cannot change status, vehicle is reserved.",
            ))
        }
        Some(VehicleStatus::Repair) => VehicleStatus::Available,
        _ => VehicleStatus::Repair,
    };

    state
        .store
        .update(vehicle::COLLECTION, &vehicle_id, json!({ "status": next }))
        .await?;

    Ok(Json(json!({ "message": "Vehicle status updated." })))
}

pub async fn reserve_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(vehicle_id): Path<String>,
    Json(req): Json<ReserveVehicleRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let (Some(start), Some(end)) = (req.start_date, req.end_date) else {
        return Err(AppError::validation("Start date and end date are required."));
    };
    let start: NaiveDate = start
        .parse()
        .map_err(|_| AppError::validation("Invalid date range."))?;
    let end: NaiveDate = end
        .parse()
        .map_err(|_| AppError::validation("Invalid date range."))?;
    if start > end {
        return Err(AppError::validation("Invalid date range."));
    }

    if state
        .store
        .get(vehicle::COLLECTION, &vehicle_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found(VEHICLE_NOT_FOUND));
    }

    let new_reservation = Reservation {
        reservation_id: Uuid::new_v4().to_string(),
        vehicle_id: vehicle_id.clone(),
        user_id: auth.uid,
        start_date: start,
        end_date: end,
        status: ReservationStatus::Confirmed,
    };
    let data =
        serde_json::to_value(&new_reservation).map_err(|e| AppError::internal(e.to_string()))?;

    // Reservation insert and status flip land in one batch, guarded on the
    // vehicle still being available when the batch commits. Two racing
    // callers cannot both reserve the same vehicle.
    let batch = WriteBatch::new()
        .require_field(
            vehicle::COLLECTION,
            &vehicle_id,
            "status",
            json!(VehicleStatus::Available),
        )
        .set(
            reservation::COLLECTION,
            &new_reservation.reservation_id,
            data,
        )
        .update(
            vehicle::COLLECTION,
            &vehicle_id,
            json!({ "status": VehicleStatus::Reserved }),
        );

    state.store.commit(batch).await.map_err(|err| match err {
        StoreError::PreconditionFailed => {
            AppError::invalid_state("Vehicle is not available for reservation.")
        }
        other => other.into(),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Vehicle reserved successfully.",
            "reservationId": new_reservation.reservation_id,
        })),
    ))
}

/// Revert a vehicle to available. Idempotent; reservation documents are left
/// alone (deleting one is a separate operation).
pub async fn unreserve_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if state
        .store
        .get(vehicle::COLLECTION, &vehicle_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found(VEHICLE_NOT_FOUND));
    }

    state
        .store
        .update(
            vehicle::COLLECTION,
            &vehicle_id,
            json!({ "status": VehicleStatus::Available }),
        )
        .await?;

    Ok(Json(json!({ "message": "Vehicle unreserved successfully." })))
}

/// Delete a vehicle and every reservation referencing it in one atomic batch.
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let key = Value::from(vehicle_id);

    let vehicles = state
        .store
        .query_eq(vehicle::COLLECTION, "vehicleId", &key)
        .await?;
    if vehicles.is_empty() {
        return Err(AppError::not_found(VEHICLE_NOT_FOUND));
    }
    let reservations = state
        .store
        .query_eq(reservation::COLLECTION, "vehicleId", &key)
        .await?;

    let mut batch = WriteBatch::new();
    for doc in &vehicles {
        batch = batch.delete(vehicle::COLLECTION, &doc.id);
    }
    for doc in &reservations {
        batch = batch.delete(reservation::COLLECTION, &doc.id);
    }
    state.store.commit(batch).await?;

    Ok(Json(json!({
        "message": "Vehicle and its reservations deleted successfully."
    })))
}

/// File a malfunction report. The response intentionally carries no record
/// id; this matches the documented current behavior.
pub async fn report_malfunction(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ReportMalfunctionRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let report = MalfunctionReport {
        vehicle_id: req.vehicle_id,
        user_id: auth.uid,
        description: req.description,
        created_at: Utc::now(),
    };
    let data = serde_json::to_value(&report).map_err(|e| AppError::internal(e.to_string()))?;
    state.store.add(malfunction::COLLECTION, data).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Malfunction reported successfully." })),
    ))
}

/// Every reservation in the fleet, for reviewers. Drivers only see their own
/// through the reservation routes.
pub async fn admin_reservations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Value>>, AppError> {
    if auth.role == Role::Driver {
        return Err(AppError::forbidden(
            "Only managers or admins can view all reservations.",
        ));
    }
    let docs = state.store.list(reservation::COLLECTION).await?;
    Ok(Json(
        docs.into_iter().map(Document::into_value_with_id).collect(),
    ))
}
