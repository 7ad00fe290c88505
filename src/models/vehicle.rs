use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "vehicles";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleStatus {
    Available,
    Reserved,
    Repair,
    MaintenanceRequested,
}

impl VehicleStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(VehicleStatus::Available),
            "reserved" => Some(VehicleStatus::Reserved),
            "repair" => Some(VehicleStatus::Repair),
            "maintenance-requested" => Some(VehicleStatus::MaintenanceRequested),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    Car,
    Bike,
    Van,
    Truck,
}

/// A vehicle document. The doc id doubles as `vehicleId`, which is also kept
/// as a queryable field inside the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub color: String,
    pub year: i32,
    pub image: Option<String>,
    pub engine: String,
    pub hp: i32,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub status: VehicleStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(VehicleStatus::MaintenanceRequested).unwrap(),
            "maintenance-requested"
        );
        assert_eq!(
            serde_json::to_value(VehicleStatus::Available).unwrap(),
            "available"
        );
    }

    #[test]
    fn status_parse_mirrors_serde() {
        for status in [
            VehicleStatus::Available,
            VehicleStatus::Reserved,
            VehicleStatus::Repair,
            VehicleStatus::MaintenanceRequested,
        ] {
            let text = serde_json::to_value(status).unwrap();
            assert_eq!(VehicleStatus::parse(text.as_str().unwrap()), Some(status));
        }
        assert_eq!(VehicleStatus::parse("scrapped"), None);
    }
}
