use axum::extract::{Extension, Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::dtos::reimbursement::UpdateReimbursementStatusRequest;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::reimbursement::{self, Reimbursement, ReimbursementStatus};
use crate::models::user::Role;
use crate::state::AppState;
use crate::store::{Document, StoreError};

/// Submit a reimbursement request: multipart form with `cost`, `description`
/// and an `invoice` image. The image is uploaded first; the request document
/// references the resulting URL and starts out Pending.
pub async fn submit_reimbursement(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut cost: Option<f64> = None;
    let mut description = String::new();
    let mut invoice: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.to_string()))?
    {
        match field.name() {
            Some("cost") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(e.to_string()))?;
                cost = text.trim().parse().ok();
            }
            Some("description") => {
                description = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(e.to_string()))?;
            }
            Some("invoice") => {
                let filename = field.file_name().unwrap_or("invoice").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(e.to_string()))?;
                invoice = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let Some((filename, bytes)) = invoice else {
        return Err(AppError::validation("Invoice image is required."));
    };
    let cost = match cost {
        Some(cost) if cost > 0.0 => cost,
        _ => return Err(AppError::validation("A positive cost is required.")),
    };

    let invoice_url = state
        .assets
        .upload(&filename, bytes)
        .await
        .map_err(|e| AppError::internal(e.to_string()))?;

    let request = Reimbursement {
        user_id: auth.uid,
        cost,
        description,
        invoice_url,
        status: ReimbursementStatus::Pending,
        created_at: Utc::now(),
    };
    let data = serde_json::to_value(&request).map_err(|e| AppError::internal(e.to_string()))?;
    state.store.add(reimbursement::COLLECTION, data).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Reimbursement request submitted successfully." })),
    ))
}

pub async fn get_pending_reimbursements(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Value>>, AppError> {
    if auth.role != Role::Manager {
        return Err(AppError::forbidden(
            "Only managers can review reimbursements.",
        ));
    }
    let docs = state
        .store
        .query_eq(
            reimbursement::COLLECTION,
            "status",
            &json!(ReimbursementStatus::Pending),
        )
        .await?;
    Ok(Json(
        docs.into_iter().map(Document::into_value_with_id).collect(),
    ))
}

pub async fn update_reimbursement_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateReimbursementStatusRequest>,
) -> Result<Json<Value>, AppError> {
    if auth.role != Role::Manager {
        return Err(AppError::forbidden(
            "Only managers can update reimbursement status.",
        ));
    }
    let status = match ReimbursementStatus::parse(&req.status) {
        Some(status @ (ReimbursementStatus::Approved | ReimbursementStatus::Rejected)) => status,
        _ => return Err(AppError::validation("Invalid status update.")),
    };

    state
        .store
        .update(
            reimbursement::COLLECTION,
            &req.id,
            json!({ "status": status }),
        )
        .await
        .map_err(|err| match err {
            StoreError::NotFound => AppError::not_found("Reimbursement not found"),
            other => other.into(),
        })?;

    Ok(Json(json!({
        "message": format!("Reimbursement request {}.", status.as_str())
    })))
}
