use axum::extract::{Extension, Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::reservation;
use crate::state::AppState;
use crate::store::{Document, WriteBatch};

/// Reservations belonging to the caller.
pub async fn get_reservations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Value>>, AppError> {
    let docs = state
        .store
        .query_eq(reservation::COLLECTION, "userId", &Value::from(auth.uid))
        .await?;
    Ok(Json(
        docs.into_iter().map(Document::into_value_with_id).collect(),
    ))
}

pub async fn get_reservation(
    State(state): State<AppState>,
    Path(res_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doc = state
        .store
        .get(reservation::COLLECTION, &res_id)
        .await?
        .ok_or_else(|| AppError::not_found("Reservation not found"))?;
    Ok(Json(doc.into_value_with_id()))
}

/// Delete every reservation carrying the given logical id. Matches are found
/// through a predicate query rather than direct lookup, and removed in one
/// atomic batch.
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(res_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let matches = state
        .store
        .query_eq(
            reservation::COLLECTION,
            "reservationId",
            &Value::from(res_id.clone()),
        )
        .await?;
    if matches.is_empty() {
        return Err(AppError::not_found(
            "No reservation found with the specified ID",
        ));
    }

    let mut batch = WriteBatch::new();
    for doc in &matches {
        batch = batch.delete(reservation::COLLECTION, &doc.id);
    }
    state.store.commit(batch).await?;

    Ok(Json(json!({
        "message": format!("Reservation with id '{res_id}' successfully deleted")
    })))
}
