use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "reservations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

/// A reservation document. `reservationId` mirrors the doc id so reservations
/// stay reachable through predicate queries as well as direct lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub reservation_id: String,
    pub vehicle_id: String,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
}
