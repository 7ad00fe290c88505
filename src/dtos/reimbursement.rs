use serde::Deserialize;

#[derive(Deserialize)]
pub struct UpdateReimbursementStatusRequest {
    pub id: String,
    pub status: String,
}
