use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "reimbursements";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReimbursementStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReimbursementStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(ReimbursementStatus::Pending),
            "Approved" => Some(ReimbursementStatus::Approved),
            "Rejected" => Some(ReimbursementStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReimbursementStatus::Pending => "Pending",
            ReimbursementStatus::Approved => "Approved",
            ReimbursementStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reimbursement {
    pub user_id: String,
    pub cost: f64,
    pub description: String,
    pub invoice_url: String,
    pub status: ReimbursementStatus,
    pub created_at: DateTime<Utc>,
}
