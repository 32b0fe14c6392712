//! Traffic awareness: trucks in transit, congestion and operational alerts.

use serde::{Deserialize, Serialize};

use crate::aggregation::{average, count_where, on_time_rate};
use crate::engine::{Choice, View, matches_search};
use crate::model::{Band, ItemType, Level, TrafficAlert, VehicleRecord};
use crate::thresholds::Thresholds;

/// Vehicle list filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleCriteria {
    /// Matched against truck id and driver.
    pub search: String,
    pub congestion: Choice<Level>,
    /// `perishable` keeps trucks carrying any perishable; `non-perishable`
    /// keeps trucks carrying none.
    pub delivery_type: Choice<ItemType>,
}

/// Fleet KPI cards, over the visible vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub total_vehicles: usize,
    pub active_vehicles: usize,
    pub delayed_vehicles: usize,
    pub high_congestion: usize,
    /// Vehicles carrying a perishable that expires before the critical
    /// shelf-life cutoff.
    pub perishable_risks: usize,
    pub average_delay_minutes: f64,
    /// Share of visible vehicles running without delay.
    pub on_time_rate: f64,
}

/// Trucks-in-transit view; perishable risk uses the critical shelf-life cutoff.
#[derive(Debug, Clone, Default)]
pub struct VehicleView {
    pub thresholds: Thresholds,
}

impl View for VehicleView {
    const NAME: &'static str = "vehicles";

    type Record = VehicleRecord;
    type Criteria = VehicleCriteria;
    type Summary = VehicleSummary;

    fn matches(&self, criteria: &VehicleCriteria, vehicle: &VehicleRecord) -> bool {
        let delivery_type = match criteria.delivery_type {
            Choice::All => true,
            Choice::Only(ItemType::Perishable) => vehicle.carries_perishables(),
            Choice::Only(ItemType::NonPerishable) => !vehicle.carries_perishables(),
        };

        matches_search(
            &criteria.search,
            [vehicle.truck_id.as_str(), vehicle.driver.as_str()],
        ) && criteria.congestion.admits(&vehicle.current_congestion_level)
            && delivery_type
    }

    fn summarize(&self, all: &[VehicleRecord], visible: &[VehicleRecord]) -> VehicleSummary {
        let delayed = count_where(visible, VehicleRecord::is_delayed);

        VehicleSummary {
            total_vehicles: all.len(),
            active_vehicles: visible.len(),
            delayed_vehicles: delayed,
            high_congestion: count_where(visible, |v| v.current_congestion_level == Level::High),
            perishable_risks: count_where(visible, |v| v.perishables_at_risk(&self.thresholds) > 0),
            average_delay_minutes: average(visible.iter().map(|v| f64::from(v.delayed_minutes))),
            on_time_rate: on_time_rate(visible.len(), delayed),
        }
    }
}

/// Fleet-wide delivery counters reported by dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTally {
    pub total_deliveries: usize,
    pub delayed_deliveries: usize,
}

impl DeliveryTally {
    /// On-time share in percent, 0 without deliveries.
    pub fn on_time_rate(&self) -> f64 {
        on_time_rate(self.total_deliveries, self.delayed_deliveries)
    }
}

/// Average delay for one time block of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayBlock {
    pub label: String,
    pub average_delay_minutes: f64,
}

impl DelayBlock {
    pub fn band(&self) -> Band {
        Band::for_average_delay(self.average_delay_minutes)
    }
}

/// Alert feed filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficAlertCriteria {
    pub severity: Choice<Level>,
    pub action_required_only: bool,
}

/// Alert feed counts over every alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficAlertSummary {
    pub total: usize,
    pub visible: usize,
    pub action_required: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Operational alert feed view.
#[derive(Debug, Clone, Default)]
pub struct TrafficAlertView;

impl View for TrafficAlertView {
    const NAME: &'static str = "traffic_alerts";

    type Record = TrafficAlert;
    type Criteria = TrafficAlertCriteria;
    type Summary = TrafficAlertSummary;

    fn matches(&self, criteria: &TrafficAlertCriteria, alert: &TrafficAlert) -> bool {
        criteria.severity.admits(&alert.severity)
            && (!criteria.action_required_only || alert.action_required)
    }

    fn summarize(&self, all: &[TrafficAlert], visible: &[TrafficAlert]) -> TrafficAlertSummary {
        TrafficAlertSummary {
            total: all.len(),
            visible: visible.len(),
            action_required: count_where(all, |a| a.action_required),
            high: count_where(all, |a| a.severity == Level::High),
            medium: count_where(all, |a| a.severity == Level::Medium),
            low: count_where(all, |a| a.severity == Level::Low),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{evaluate, filter};
    use crate::model::{AlertKind, OnboardItem};
    use chrono::{TimeZone, Utc};

    fn item(name: &str, perishable: bool, expiry_hours: f64) -> OnboardItem {
        OnboardItem {
            item: name.to_string(),
            perishable,
            expiry_hours,
        }
    }

    fn vehicle(
        id: &str,
        congestion: Level,
        delayed_minutes: u32,
        items: Vec<OnboardItem>,
    ) -> VehicleRecord {
        VehicleRecord {
            truck_id: id.to_string(),
            lat: 12.94,
            lng: 77.61,
            route_polyline: vec![(12.941, 77.612), (12.945, 77.615)],
            current_congestion_level: congestion,
            delayed_minutes,
            eta_minutes: 30,
            items_onboard: items,
            driver: format!("Driver {}", id),
            route_distance_km: 20.0,
            last_reroute_timestamp: Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap(),
        }
    }

    fn fleet() -> Vec<VehicleRecord> {
        vec![
            vehicle(
                "TR-092",
                Level::High,
                17,
                vec![item("Yogurt", true, 6.0), item("Toilet Paper", false, 0.0)],
            ),
            vehicle(
                "TR-045",
                Level::Medium,
                8,
                vec![item("Fresh Milk", true, 12.0), item("Bread", true, 8.0)],
            ),
            vehicle(
                "TR-078",
                Level::Low,
                0,
                vec![item("Canned Goods", false, 0.0)],
            ),
        ]
    }

    #[test]
    fn test_delivery_type_semantics() {
        let perishable = VehicleCriteria {
            delivery_type: Choice::Only(ItemType::Perishable),
            ..Default::default()
        };
        let ids: Vec<String> = filter(&VehicleView::default(), &fleet(), &perishable)
            .into_iter()
            .map(|v| v.truck_id)
            .collect();
        assert_eq!(ids, vec!["TR-092", "TR-045"]);

        let non_perishable = VehicleCriteria {
            delivery_type: Choice::Only(ItemType::NonPerishable),
            ..Default::default()
        };
        let visible = filter(&VehicleView::default(), &fleet(), &non_perishable);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].truck_id, "TR-078");
    }

    #[test]
    fn test_vehicle_summary() {
        let out = evaluate(&VehicleView::default(), &fleet(), &VehicleCriteria::default());
        let summary = out.summary;

        assert_eq!(summary.active_vehicles, 3);
        assert_eq!(summary.delayed_vehicles, 2);
        assert_eq!(summary.high_congestion, 1);
        assert_eq!(summary.perishable_risks, 1);
        assert!((summary.average_delay_minutes - 25.0 / 3.0).abs() < 1e-9);
        assert!((summary.on_time_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_congestion_filter_and_empty_summary() {
        let criteria = VehicleCriteria {
            congestion: Choice::Only(Level::High),
            search: "nobody".to_string(),
            ..Default::default()
        };
        let out = evaluate(&VehicleView::default(), &fleet(), &criteria);
        assert!(out.visible.is_empty());
        assert_eq!(out.summary.on_time_rate, 0.0);
        assert_eq!(out.summary.average_delay_minutes, 0.0);
        assert_eq!(out.summary.total_vehicles, 3);
    }

    #[test]
    fn test_delivery_tally() {
        let tally = DeliveryTally {
            total_deliveries: 192,
            delayed_deliveries: 27,
        };
        assert!((tally.on_time_rate() - 85.9375).abs() < 1e-9);
        assert_eq!(DeliveryTally::default().on_time_rate(), 0.0);
    }

    #[test]
    fn test_delay_block_band() {
        let block = DelayBlock {
            label: "1 PM".to_string(),
            average_delay_minutes: 15.0,
        };
        assert_eq!(block.band(), Band::Red);
    }

    #[test]
    fn test_alert_feed() {
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 14, 35, 0).unwrap();
        let alerts = vec![
            TrafficAlert {
                id: "1".to_string(),
                kind: AlertKind::Congestion,
                message: "Truck TR-092 is stuck in heavy congestion".to_string(),
                severity: Level::High,
                timestamp: at,
                vehicle_id: Some("TR-092".to_string()),
                action_required: true,
            },
            TrafficAlert {
                id: "3".to_string(),
                kind: AlertKind::DemandSurge,
                message: "Demand surge in Zone B".to_string(),
                severity: Level::Low,
                timestamp: at,
                vehicle_id: None,
                action_required: false,
            },
        ];
        let criteria = TrafficAlertCriteria {
            action_required_only: true,
            ..Default::default()
        };
        let out = evaluate(&TrafficAlertView, &alerts, &criteria);

        assert_eq!(out.visible.len(), 1);
        assert_eq!(out.summary.action_required, 1);
        assert_eq!(out.summary.high, 1);
        assert_eq!(out.summary.low, 1);
        assert_eq!(out.summary.total, 2);
    }
}
