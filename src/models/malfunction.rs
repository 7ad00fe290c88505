use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "malfunctions";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MalfunctionReport {
    pub vehicle_id: String,
    pub user_id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
