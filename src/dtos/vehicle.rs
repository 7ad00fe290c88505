use serde::Deserialize;

use crate::models::vehicle::VehicleType;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    pub vehicle_name: String,
    pub color: String,
    pub year: i32,
    pub image: Option<String>,
    pub engine: String,
    pub hp: i32,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
}

// Dates stay optional strings so a missing field surfaces as the documented
// validation message instead of a deserialization error.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveVehicleRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMalfunctionRequest {
    pub vehicle_id: String,
    pub description: String,
}
