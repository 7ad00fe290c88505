use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::models::user::{resolve_role, Role, RoleResolution};
use crate::state::AppState;

/// Caller identity attached to every authenticated request.
#[derive(Clone)]
pub struct AuthContext {
    pub uid: String,
    pub role: Role,
    pub resolution: RoleResolution,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Expect "Bearer <token>"
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    let token = match token {
        Some(token) => token,
        None => return reject(StatusCode::UNAUTHORIZED, "Authorization token missing"),
    };

    let claims = match verify_token(token, &state.auth) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(error = %e, "token verification failed");
            return reject(StatusCode::FORBIDDEN, "Unauthorized access");
        }
    };

    // A missing user document is not an auth failure: the caller proceeds as
    // a Driver, and the resolution tag records that the role was defaulted.
    let resolution = match resolve_role(state.store.as_ref(), &claims.sub).await {
        Ok(resolution) => resolution,
        Err(e) => return AppError::internal(e.to_string()).into_response(),
    };

    req.extensions_mut().insert(AuthContext {
        uid: claims.sub,
        role: resolution.role(),
        resolution,
    });

    next.run(req).await
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
