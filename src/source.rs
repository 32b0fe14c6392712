//! Data-source boundary.
//!
//! Records enter the crate here and nowhere else. A dataset is a JSON
//! document with one array per record kind; every array is optional. Shape
//! violations (missing fields, unknown enum values) are rejected while
//! parsing, and range violations (scores above 100, negative or non-finite
//! measures, inverted ranges) by [`Dataset::validate`]. The views downstream
//! assume both checks have passed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{
    ApiStatusRecord, DeliveryWindowRecord, DemandRecord, ForecastPoint, InventoryRecord,
    PerishableAlert, RouteRecord, TrafficAlert, TruckLoad, VehicleRecord,
};
use crate::views::traffic::{DelayBlock, DeliveryTally};

/// Built-in demo dataset.
const SAMPLE_DATASET: &str = include_str!("../data/sample.json");

/// Upper bound of every 0–100 score.
const MAX_SCORE: u32 = 100;

/// Upper bound of the route urgency score.
const MAX_URGENCY_SCORE: f64 = 10.0;

/// Errors raised while bringing records into the crate.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid {kind} record #{index}: {reason}")]
    Invalid {
        kind: &'static str,
        index: usize,
        reason: String,
    },
}

/// Every record kind the dashboards display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub inventory: Vec<InventoryRecord>,
    pub demand: Vec<DemandRecord>,
    pub perishable_alerts: Vec<PerishableAlert>,
    pub routes: Vec<RouteRecord>,
    pub vehicles: Vec<VehicleRecord>,
    pub traffic_alerts: Vec<TrafficAlert>,
    pub delivery_tally: DeliveryTally,
    pub delay_blocks: Vec<DelayBlock>,
    pub forecast: Vec<ForecastPoint>,
    pub truck_loads: Vec<TruckLoad>,
    pub delivery_windows: Vec<DeliveryWindowRecord>,
    pub api_status: Vec<ApiStatusRecord>,
}

impl Dataset {
    /// Parse and validate a JSON dataset.
    pub fn from_json(raw: &str) -> Result<Self, SourceError> {
        let dataset: Dataset = serde_json::from_str(raw)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// The built-in demo dataset.
    pub fn sample() -> Result<Self, SourceError> {
        Self::from_json(SAMPLE_DATASET)
    }

    /// Total records across all kinds.
    pub fn record_count(&self) -> usize {
        self.inventory.len()
            + self.demand.len()
            + self.perishable_alerts.len()
            + self.routes.len()
            + self.vehicles.len()
            + self.traffic_alerts.len()
            + self.delay_blocks.len()
            + self.forecast.len()
            + self.truck_loads.len()
            + self.delivery_windows.len()
            + self.api_status.len()
    }

    /// Check the range constraints serde cannot express.
    pub fn validate(&self) -> Result<(), SourceError> {
        check_all(&self.inventory)?;
        check_all(&self.demand)?;
        check_all(&self.perishable_alerts)?;
        check_all(&self.routes)?;
        check_all(&self.vehicles)?;
        check_all(&self.traffic_alerts)?;
        check_all(&self.delay_blocks)?;
        check_all(&self.forecast)?;
        check_all(&self.truck_loads)?;
        check_all(&self.delivery_windows)?;
        check_all(&self.api_status)?;

        let tally = &self.delivery_tally;
        if tally.delayed_deliveries > tally.total_deliveries {
            return Err(SourceError::Invalid {
                kind: "delivery_tally",
                index: 0,
                reason: format!(
                    "delayed_deliveries {} exceeds total_deliveries {}",
                    tally.delayed_deliveries, tally.total_deliveries
                ),
            });
        }
        Ok(())
    }
}

/// Read, parse and validate a dataset file.
pub async fn load_dataset(path: &Path) -> Result<Dataset, SourceError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    match Dataset::from_json(&raw) {
        Ok(dataset) => {
            info!(
                path = %path.display(),
                records = dataset.record_count(),
                "Dataset loaded"
            );
            Ok(dataset)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Rejected dataset");
            Err(e)
        }
    }
}

/// Per-record range checks.
trait Validate {
    const KIND: &'static str;

    fn check(&self) -> Result<(), String>;
}

fn check_all<T: Validate>(records: &[T]) -> Result<(), SourceError> {
    for (index, record) in records.iter().enumerate() {
        record.check().map_err(|reason| SourceError::Invalid {
            kind: T::KIND,
            index,
            reason,
        })?;
    }
    Ok(())
}

fn score(field: &str, value: u32) -> Result<(), String> {
    if value > MAX_SCORE {
        return Err(format!("{} {} exceeds {}", field, value, MAX_SCORE));
    }
    Ok(())
}

fn measure(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{} must be a non-negative number, got {}", field, value));
    }
    Ok(())
}

fn coordinate(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be finite", field));
    }
    Ok(())
}

fn required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is empty", field));
    }
    Ok(())
}

impl Validate for InventoryRecord {
    const KIND: &'static str = "inventory";

    fn check(&self) -> Result<(), String> {
        required("store_id", &self.store_id)?;
        required("item_id", &self.item_id)
    }
}

impl Validate for DemandRecord {
    const KIND: &'static str = "demand";

    fn check(&self) -> Result<(), String> {
        required("store_id", &self.store_id)?;
        coordinate("lat", self.lat)?;
        coordinate("lng", self.lng)?;
        score("current_demand_score", self.current_demand_score)?;
        for item in &self.top_requested_items {
            if let Some(hours) = item.shelf_hours_left {
                measure("shelf_hours_left", hours)?;
            }
        }
        Ok(())
    }
}

impl Validate for PerishableAlert {
    const KIND: &'static str = "perishable_alert";

    fn check(&self) -> Result<(), String> {
        measure("shelf_life_remaining_hrs", self.shelf_life_remaining_hrs)
    }
}

impl Validate for RouteRecord {
    const KIND: &'static str = "route";

    fn check(&self) -> Result<(), String> {
        required("truck_id", &self.truck_id)?;
        measure("urgency_score", self.urgency_score)?;
        if self.urgency_score > MAX_URGENCY_SCORE {
            return Err(format!(
                "urgency_score {} exceeds {}",
                self.urgency_score, MAX_URGENCY_SCORE
            ));
        }
        measure("route_distance_km", self.route_distance_km)?;
        for stop in &self.stops {
            coordinate("stop lat", stop.lat)?;
            coordinate("stop lng", stop.lng)?;
        }
        Ok(())
    }
}

impl Validate for VehicleRecord {
    const KIND: &'static str = "vehicle";

    fn check(&self) -> Result<(), String> {
        required("truck_id", &self.truck_id)?;
        coordinate("lat", self.lat)?;
        coordinate("lng", self.lng)?;
        measure("route_distance_km", self.route_distance_km)?;
        for item in &self.items_onboard {
            measure("expiry_hours", item.expiry_hours)?;
        }
        Ok(())
    }
}

impl Validate for TrafficAlert {
    const KIND: &'static str = "traffic_alert";

    fn check(&self) -> Result<(), String> {
        required("id", &self.id)
    }
}

impl Validate for DelayBlock {
    const KIND: &'static str = "delay_block";

    fn check(&self) -> Result<(), String> {
        measure("average_delay_minutes", self.average_delay_minutes)
    }
}

impl Validate for ForecastPoint {
    const KIND: &'static str = "forecast";

    fn check(&self) -> Result<(), String> {
        measure("predicted_volume", self.predicted_volume)?;
        measure("historical_avg", self.historical_avg)?;
        let (low, high) = self.confidence_range;
        measure("confidence_range low", low)?;
        measure("confidence_range high", high)?;
        if low > high {
            return Err(format!("confidence_range is inverted ({} > {})", low, high));
        }
        Ok(())
    }
}

impl Validate for TruckLoad {
    const KIND: &'static str = "truck_load";

    fn check(&self) -> Result<(), String> {
        required("truck_id", &self.truck_id)?;
        measure("capacity", self.capacity)?;
        measure("occupied", self.occupied)?;
        score("load_score", self.load_score)?;
        for item in &self.items {
            measure("item volume", item.volume)?;
        }
        Ok(())
    }
}

impl Validate for DeliveryWindowRecord {
    const KIND: &'static str = "delivery_window";

    fn check(&self) -> Result<(), String> {
        required("truck_id", &self.truck_id)?;
        score("delay_risk_score", self.delay_risk_score)?;
        let (start, end) = self.allowed_window;
        if start > end {
            return Err(format!("allowed_window is inverted ({} > {})", start, end));
        }
        Ok(())
    }
}

impl Validate for ApiStatusRecord {
    const KIND: &'static str = "api_status";

    fn check(&self) -> Result<(), String> {
        required("service", &self.service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_dataset_is_valid() {
        let dataset = Dataset::sample().unwrap();

        assert_eq!(dataset.inventory.len(), 6);
        assert_eq!(dataset.demand.len(), 3);
        assert_eq!(dataset.perishable_alerts.len(), 3);
        assert_eq!(dataset.routes.len(), 3);
        assert_eq!(dataset.vehicles.len(), 3);
        assert_eq!(dataset.forecast.len(), 14);
        assert_eq!(dataset.truck_loads.len(), 4);
        assert_eq!(dataset.delivery_windows.len(), 6);
        assert_eq!(dataset.api_status.len(), 6);
        assert_eq!(dataset.delivery_tally.total_deliveries, 192);
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let dataset = Dataset::from_json("{}").unwrap();
        assert_eq!(dataset.record_count(), 0);
        assert_eq!(dataset, Dataset::default());
    }

    #[test]
    fn test_missing_field_fails_parse() {
        let raw = r#"{"inventory": [{"store_id": "ST001"}]}"#;
        assert!(matches!(Dataset::from_json(raw), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_unknown_enum_fails_parse() {
        let raw = r#"{"api_status": [
            {"service": "WMS", "status": "Degraded", "last_sync": "2025-01-05T22:15:00"}
        ]}"#;
        assert!(matches!(Dataset::from_json(raw), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_negative_quantity_fails_parse() {
        let raw = r#"{"inventory": [{
            "store_id": "ST001", "store_name": "Store", "item_id": "P1",
            "item_name": "Milk", "quantity": -1, "safety_threshold": 10,
            "perishable": true, "last_refill_date": "2025-07-01",
            "restocking_priority": "High"
        }]}"#;
        assert!(matches!(Dataset::from_json(raw), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_score_out_of_range_fails_validation() {
        let raw = r#"{"demand": [{
            "store_id": "ST001", "store_name": "Store", "lat": 12.9, "lng": 77.5,
            "current_demand_score": 140, "top_requested_items": [],
            "has_stockout": false
        }]}"#;
        match Dataset::from_json(raw) {
            Err(SourceError::Invalid { kind, index, reason }) => {
                assert_eq!(kind, "demand");
                assert_eq!(index, 0);
                assert!(reason.contains("current_demand_score"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_window_fails_validation() {
        let raw = r#"{"delivery_windows": [{
            "truck_id": "TR001", "store_id": "ST005", "store_name": "Store",
            "delivery_eta": "2025-01-06T10:45:00",
            "allowed_window": ["2025-01-06T12:00:00", "2025-01-06T10:00:00"],
            "compliance": true, "delay_risk_score": 15
        }]}"#;
        let err = Dataset::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("delivery_window record #0"));
    }

    #[test]
    fn test_tally_consistency() {
        let raw = r#"{"delivery_tally": {"total_deliveries": 5, "delayed_deliveries": 9}}"#;
        assert!(matches!(
            Dataset::from_json(raw),
            Err(SourceError::Invalid { kind: "delivery_tally", .. })
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_dataset(Path::new("/nonexistent/supplyboard.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/supplyboard.json"));
    }
}
