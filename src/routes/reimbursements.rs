use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::reimbursement::{
    get_pending_reimbursements, submit_reimbursement, update_reimbursement_status,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reimbursements", post(submit_reimbursement))
        .route("/reimbursements/pending", get(get_pending_reimbursements))
        .route("/reimbursements/status", patch(update_reimbursement_status))
}
