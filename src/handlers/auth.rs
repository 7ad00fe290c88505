use axum::extract::{Extension, Multipart, State};
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::user::{self, Role, RoleResolution};
use crate::state::AppState;
use crate::store::StoreError;

/// The caller's own profile document, with the Driver default applied when no
/// document exists yet.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Value>, AppError> {
    match auth.resolution {
        RoleResolution::DefaultedDriver => {
            Ok(Json(json!({ "uid": auth.uid, "role": Role::Driver })))
        }
        RoleResolution::Found(_) => {
            let doc = state
                .store
                .get(user::COLLECTION, &auth.uid)
                .await?
                .ok_or_else(|| AppError::not_found("User not found"))?;
            let mut data = doc.data;
            if let Some(obj) = data.as_object_mut() {
                obj.insert("uid".to_string(), Value::String(auth.uid));
            }
            Ok(Json(data))
        }
    }
}

/// Upload a driving-license image and attach its URL to the caller's profile,
/// creating the profile document when it does not exist yet.
pub async fn upload_license(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut license: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.to_string()))?
    {
        if field.name() == Some("license") {
            let filename = field.file_name().unwrap_or("license").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(e.to_string()))?;
            license = Some((filename, bytes.to_vec()));
        }
    }

    let Some((filename, bytes)) = license else {
        return Err(AppError::validation("License image is required."));
    };

    let url = state
        .assets
        .upload(&filename, bytes)
        .await
        .map_err(|e| AppError::internal(e.to_string()))?;

    let fields = json!({ "licenseImageUrl": url });
    match state.store.update(user::COLLECTION, &auth.uid, fields).await {
        Ok(()) => {}
        Err(StoreError::NotFound) => {
            state
                .store
                .set(
                    user::COLLECTION,
                    &auth.uid,
                    json!({ "role": Role::Driver, "licenseImageUrl": url }),
                )
                .await?;
        }
        Err(other) => return Err(other.into()),
    }

    Ok(Json(json!({
        "message": "License uploaded successfully.",
        "licenseImageUrl": url,
    })))
}
