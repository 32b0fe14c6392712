//! Record types for the supply-chain dashboards.
//!
//! Every record is a plain, read-only value supplied whole by the data
//! source. Status and urgency classifications are never stored: each one is a
//! function of the numeric fields it depends on, so a record's displayed
//! status cannot drift from its quantities, hours or scores.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::clamp_percentage;
use crate::thresholds::{
    ELEVATED_DELAY_MINUTES, ELEVATED_DEMAND_SCORE, FAIR_LOAD_SCORE, GOOD_LOAD_SCORE,
    HIGH_DELAY_RISK, HIGH_DEMAND_SCORE, SEVERE_DELAY_MINUTES, Thresholds,
};

// ============================================================================
// Shared enums
// ============================================================================

/// Business priority, written capitalised by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Generic three-step severity used for congestion, stop urgency and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

/// Road traffic on a planned route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Low,
    Medium,
    Heavy,
}

/// Perishability of an item or of a stop's delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    Perishable,
    NonPerishable,
}

impl ItemType {
    /// Item type of a record carrying a `perishable` flag.
    pub fn from_perishable(perishable: bool) -> Self {
        if perishable {
            ItemType::Perishable
        } else {
            ItemType::NonPerishable
        }
    }
}

// ============================================================================
// Derived classifications
// ============================================================================

/// Stock health of an inventory line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// At or above the safety threshold.
    Healthy,
    /// In stock but below the safety threshold.
    Low,
    /// Out of stock.
    Critical,
}

impl StockStatus {
    /// Classify a stock level.
    ///
    /// # Thresholds
    ///
    /// - `critical`: quantity == 0, whatever the safety threshold
    /// - `low`: 0 < quantity < safety_threshold
    /// - `healthy`: otherwise
    pub fn from_levels(quantity: u32, safety_threshold: u32) -> Self {
        if quantity == 0 {
            StockStatus::Critical
        } else if quantity < safety_threshold {
            StockStatus::Low
        } else {
            StockStatus::Healthy
        }
    }

    /// Whether this line needs restocking.
    pub fn needs_restock(&self) -> bool {
        !matches!(self, StockStatus::Healthy)
    }
}

/// Urgency of a perishable delivery, derived from remaining shelf life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShelfLifeUrgency {
    Normal,
    Medium,
    Critical,
}

impl ShelfLifeUrgency {
    /// `Critical` below the critical cutoff, `Medium` below the warning
    /// cutoff, `Normal` otherwise. Both cutoffs are exclusive.
    pub fn from_hours(hours: f64, thresholds: &Thresholds) -> Self {
        if hours < thresholds.critical_shelf_hours {
            ShelfLifeUrgency::Critical
        } else if hours < thresholds.warning_shelf_hours {
            ShelfLifeUrgency::Medium
        } else {
            ShelfLifeUrgency::Normal
        }
    }
}

/// Colour band for a traffic-light style indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Green,
    Amber,
    Red,
}

impl Band {
    /// Shelf-life progress bar colour: red below the critical cutoff, amber
    /// below the warning cutoff.
    pub fn for_shelf_life(hours: f64, thresholds: &Thresholds) -> Self {
        if hours < thresholds.critical_shelf_hours {
            Band::Red
        } else if hours < thresholds.warning_shelf_hours {
            Band::Amber
        } else {
            Band::Green
        }
    }

    /// Colour of an hourly average delay bar.
    pub fn for_average_delay(minutes: f64) -> Self {
        if minutes > SEVERE_DELAY_MINUTES {
            Band::Red
        } else if minutes > ELEVATED_DELAY_MINUTES {
            Band::Amber
        } else {
            Band::Green
        }
    }
}

/// Share of a fixed reference ceiling, clamped to `[0, 100]`.
///
/// A non-positive ceiling yields 0.
pub fn shelf_life_percentage(hours: f64, ceiling_hours: f64) -> f64 {
    if ceiling_hours <= 0.0 {
        return 0.0;
    }
    clamp_percentage(hours / ceiling_hours * 100.0)
}

/// Demand heat of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandLevel {
    Normal,
    Elevated,
    High,
}

impl DemandLevel {
    /// Classify a 0–100 demand score.
    ///
    /// # Thresholds
    ///
    /// - `high`: score >= 80
    /// - `elevated`: 60 <= score < 80
    /// - `normal`: otherwise
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_DEMAND_SCORE {
            DemandLevel::High
        } else if score >= ELEVATED_DEMAND_SCORE {
            DemandLevel::Elevated
        } else {
            DemandLevel::Normal
        }
    }
}

/// Packing quality of a truck load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadBand {
    Poor,
    Fair,
    Good,
}

impl LoadBand {
    /// Classify a 0–100 load score.
    ///
    /// # Thresholds
    ///
    /// - `good`: score >= 80
    /// - `fair`: 60 <= score < 80
    /// - `poor`: otherwise
    pub fn from_score(score: u32) -> Self {
        if score >= GOOD_LOAD_SCORE {
            LoadBand::Good
        } else if score >= FAIR_LOAD_SCORE {
            LoadBand::Fair
        } else {
            LoadBand::Poor
        }
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// One item line in one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub store_id: String,
    pub store_name: String,
    pub item_id: String,
    pub item_name: String,
    pub quantity: u32,
    pub safety_threshold: u32,
    pub perishable: bool,
    pub last_refill_date: NaiveDate,
    pub restocking_priority: Priority,
}

impl InventoryRecord {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_levels(self.quantity, self.safety_threshold)
    }

    pub fn item_type(&self) -> ItemType {
        ItemType::from_perishable(self.perishable)
    }
}

// ============================================================================
// Demand heatmap
// ============================================================================

/// An item a store is asking for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedItem {
    pub item: String,
    pub quantity: u32,
    pub perishable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_hours_left: Option<f64>,
}

impl RequestedItem {
    pub fn item_type(&self) -> ItemType {
        ItemType::from_perishable(self.perishable)
    }
}

/// Current demand at a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub store_id: String,
    pub store_name: String,
    pub lat: f64,
    pub lng: f64,
    /// 0–100.
    pub current_demand_score: u32,
    /// Ordered by request volume, most requested first.
    pub top_requested_items: Vec<RequestedItem>,
    pub has_stockout: bool,
}

impl DemandRecord {
    pub fn demand_level(&self) -> DemandLevel {
        DemandLevel::from_score(self.current_demand_score)
    }

    /// The first `n` requested items.
    pub fn top_items(&self, n: usize) -> &[RequestedItem] {
        &self.top_requested_items[..n.min(self.top_requested_items.len())]
    }
}

/// A perishable shipment en route to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerishableAlert {
    pub item: String,
    pub shelf_life_remaining_hrs: f64,
    pub destination_store: String,
    pub route_id: String,
}

impl PerishableAlert {
    pub fn urgency(&self, thresholds: &Thresholds) -> ShelfLifeUrgency {
        ShelfLifeUrgency::from_hours(self.shelf_life_remaining_hrs, thresholds)
    }

    pub fn shelf_life_band(&self, thresholds: &Thresholds) -> Band {
        Band::for_shelf_life(self.shelf_life_remaining_hrs, thresholds)
    }

    pub fn shelf_life_percentage(&self, thresholds: &Thresholds) -> f64 {
        shelf_life_percentage(
            self.shelf_life_remaining_hrs,
            thresholds.shelf_life_ceiling_hours,
        )
    }
}

// ============================================================================
// Routes
// ============================================================================

/// A delivery stop on a planned route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub store_id: String,
    pub lat: f64,
    pub lng: f64,
    pub urgency: Level,
    pub item_type: ItemType,
    pub address: String,
}

/// A planned truck route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub truck_id: String,
    pub driver: String,
    /// 0–10.
    pub urgency_score: f64,
    pub route_distance_km: f64,
    pub eta_minutes: u32,
    pub traffic_level: TrafficLevel,
    pub stops: Vec<Stop>,
}

// ============================================================================
// Traffic
// ============================================================================

/// Something carried by a truck in transit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardItem {
    pub item: String,
    pub perishable: bool,
    /// 0 for non-perishables.
    pub expiry_hours: f64,
}

/// A truck in transit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub truck_id: String,
    pub lat: f64,
    pub lng: f64,
    /// (lat, lng) pairs in driving order.
    pub route_polyline: Vec<(f64, f64)>,
    pub current_congestion_level: Level,
    pub delayed_minutes: u32,
    pub eta_minutes: u32,
    pub items_onboard: Vec<OnboardItem>,
    pub driver: String,
    pub route_distance_km: f64,
    pub last_reroute_timestamp: DateTime<Utc>,
}

impl VehicleRecord {
    pub fn carries_perishables(&self) -> bool {
        self.items_onboard.iter().any(|item| item.perishable)
    }

    pub fn is_delayed(&self) -> bool {
        self.delayed_minutes > 0
    }

    /// Perishables onboard expiring before the critical shelf-life cutoff.
    pub fn perishables_at_risk(&self, thresholds: &Thresholds) -> usize {
        self.items_onboard
            .iter()
            .filter(|item| item.perishable && item.expiry_hours < thresholds.critical_shelf_hours)
            .count()
    }
}

/// Kind of operational alert raised on the traffic dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Congestion,
    Perishable,
    DemandSurge,
    Stockout,
}

/// An operational alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub severity: Level,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    pub action_required: bool,
}

// ============================================================================
// Predictive logistics
// ============================================================================

/// One day of forecast demand for a zone and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub zone: String,
    pub category: String,
    pub predicted_volume: f64,
    /// (low, high).
    pub confidence_range: (f64, f64),
    pub historical_avg: f64,
}

impl ForecastPoint {
    /// Predicted change relative to the historical average, in percent.
    ///
    /// Returns 0 when there is no historical baseline.
    pub fn growth_pct(&self) -> f64 {
        if self.historical_avg <= 0.0 {
            return 0.0;
        }
        (self.predicted_volume - self.historical_avg) / self.historical_avg * 100.0
    }
}

/// An item assigned to a truck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadItem {
    pub name: String,
    pub volume: f64,
    pub urgency: Priority,
    pub perishable: bool,
}

/// The cargo assigned to one truck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckLoad {
    pub truck_id: String,
    pub capacity: f64,
    pub occupied: f64,
    pub items: Vec<LoadItem>,
    /// 0–100, produced by the load planner.
    pub load_score: u32,
}

impl TruckLoad {
    /// Occupied share of capacity, clamped to `[0, 100]`.
    pub fn utilization_pct(&self) -> f64 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        clamp_percentage(self.occupied / self.capacity * 100.0)
    }

    pub fn load_band(&self) -> LoadBand {
        LoadBand::from_score(self.load_score)
    }

    pub fn free_capacity(&self) -> f64 {
        (self.capacity - self.occupied).max(0.0)
    }
}

/// A scheduled store delivery and the window the store accepts it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryWindowRecord {
    pub truck_id: String,
    pub store_id: String,
    pub store_name: String,
    pub delivery_eta: NaiveDateTime,
    /// (start, end), both inclusive.
    pub allowed_window: (NaiveDateTime, NaiveDateTime),
    /// Compliance as reported by the scheduler.
    pub compliance: bool,
    /// 0–100.
    pub delay_risk_score: u32,
}

impl DeliveryWindowRecord {
    pub fn within_window(&self) -> bool {
        let (start, end) = self.allowed_window;
        start <= self.delivery_eta && self.delivery_eta <= end
    }

    /// Reported compliant and actually scheduled inside the window.
    pub fn is_compliant(&self) -> bool {
        self.compliance && self.within_window()
    }

    pub fn is_high_risk(&self) -> bool {
        self.delay_risk_score > HIGH_DELAY_RISK
    }
}

/// Health of an upstream integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceStatus {
    Online,
    Warning,
    Offline,
}

/// Last known state of an upstream integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiStatusRecord {
    pub service: String,
    pub status: ServiceStatus,
    pub last_sync: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiStatusRecord {
    pub fn needs_reconnect(&self) -> bool {
        self.status != ServiceStatus::Online
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_critical_ignores_threshold() {
        assert_eq!(StockStatus::from_levels(0, 10), StockStatus::Critical);
        assert_eq!(StockStatus::from_levels(0, 0), StockStatus::Critical);
    }

    #[test]
    fn test_stock_status_low_and_healthy() {
        assert_eq!(StockStatus::from_levels(5, 10), StockStatus::Low);
        assert_eq!(StockStatus::from_levels(9, 10), StockStatus::Low);
        assert_eq!(StockStatus::from_levels(10, 10), StockStatus::Healthy);
        assert_eq!(StockStatus::from_levels(15, 10), StockStatus::Healthy);
    }

    #[test]
    fn test_shelf_life_urgency_bands() {
        let thresholds = Thresholds::default();
        assert_eq!(
            ShelfLifeUrgency::from_hours(4.0, &thresholds),
            ShelfLifeUrgency::Critical
        );
        assert_eq!(
            ShelfLifeUrgency::from_hours(8.0, &thresholds),
            ShelfLifeUrgency::Medium
        );
        assert_eq!(
            ShelfLifeUrgency::from_hours(10.0, &thresholds),
            ShelfLifeUrgency::Medium
        );
        assert_eq!(
            ShelfLifeUrgency::from_hours(24.0, &thresholds),
            ShelfLifeUrgency::Normal
        );
        assert_eq!(
            ShelfLifeUrgency::from_hours(30.0, &thresholds),
            ShelfLifeUrgency::Normal
        );
    }

    #[test]
    fn test_shelf_life_band_uses_both_cutoffs() {
        let thresholds = Thresholds::default();
        assert_eq!(Band::for_shelf_life(7.5, &thresholds), Band::Red);
        assert_eq!(Band::for_shelf_life(12.0, &thresholds), Band::Amber);
        assert_eq!(Band::for_shelf_life(36.0, &thresholds), Band::Green);
    }

    #[test]
    fn test_shelf_life_percentage_clamped() {
        assert_eq!(shelf_life_percentage(12.0, 48.0), 25.0);
        assert_eq!(shelf_life_percentage(96.0, 48.0), 100.0);
        assert_eq!(shelf_life_percentage(-3.0, 48.0), 0.0);
        assert_eq!(shelf_life_percentage(12.0, 0.0), 0.0);
    }

    #[test]
    fn test_average_delay_band() {
        assert_eq!(Band::for_average_delay(2.0), Band::Green);
        assert_eq!(Band::for_average_delay(5.0), Band::Green);
        assert_eq!(Band::for_average_delay(7.0), Band::Amber);
        assert_eq!(Band::for_average_delay(15.0), Band::Red);
    }

    #[test]
    fn test_demand_and_load_bands() {
        assert_eq!(DemandLevel::from_score(95), DemandLevel::High);
        assert_eq!(DemandLevel::from_score(80), DemandLevel::High);
        assert_eq!(DemandLevel::from_score(65), DemandLevel::Elevated);
        assert_eq!(DemandLevel::from_score(59), DemandLevel::Normal);

        assert_eq!(LoadBand::from_score(89), LoadBand::Good);
        assert_eq!(LoadBand::from_score(76), LoadBand::Fair);
        assert_eq!(LoadBand::from_score(45), LoadBand::Poor);
    }

    #[test]
    fn test_forecast_growth_without_baseline() {
        let point = ForecastPoint {
            date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            zone: "Southwest".to_string(),
            category: "Dairy".to_string(),
            predicted_volume: 820.0,
            confidence_range: (780.0, 860.0),
            historical_avg: 0.0,
        };
        assert_eq!(point.growth_pct(), 0.0);

        let with_baseline = ForecastPoint {
            historical_avg: 800.0,
            ..point
        };
        assert!((with_baseline.growth_pct() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_truck_utilization() {
        let load = TruckLoad {
            truck_id: "TR001".to_string(),
            capacity: 120.0,
            occupied: 78.0,
            items: vec![],
            load_score: 89,
        };
        assert!((load.utilization_pct() - 65.0).abs() < 1e-9);
        assert_eq!(load.free_capacity(), 42.0);

        let empty = TruckLoad {
            capacity: 0.0,
            ..load
        };
        assert_eq!(empty.utilization_pct(), 0.0);
    }

    #[test]
    fn test_delivery_compliance_requires_window() {
        let at = |h: u32, m: u32| {
            NaiveDate::from_ymd_opt(2025, 1, 6)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap()
        };
        let window = DeliveryWindowRecord {
            truck_id: "TR001".to_string(),
            store_id: "ST005".to_string(),
            store_name: "Walmart Downtown".to_string(),
            delivery_eta: at(10, 45),
            allowed_window: (at(10, 0), at(12, 0)),
            compliance: true,
            delay_risk_score: 15,
        };
        assert!(window.is_compliant());
        assert!(!window.is_high_risk());

        let late = DeliveryWindowRecord {
            delivery_eta: at(12, 30),
            ..window.clone()
        };
        assert!(!late.within_window());
        assert!(!late.is_compliant());

        let flagged = DeliveryWindowRecord {
            compliance: false,
            delay_risk_score: 85,
            ..window
        };
        assert!(!flagged.is_compliant());
        assert!(flagged.is_high_risk());
    }

    #[test]
    fn test_item_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&ItemType::NonPerishable).unwrap(),
            "\"non-perishable\""
        );
        let level: TrafficLevel = serde_json::from_str("\"heavy\"").unwrap();
        assert_eq!(level, TrafficLevel::Heavy);
        let priority: Priority = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(priority, Priority::High);
    }
}
