//! Predictive logistics: demand forecast, truck loads, delivery windows and
//! upstream integration health.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::aggregation::{
    average, clamp_percentage, count_where, distinct_values, on_time_rate, percentage,
};
use crate::engine::{Choice, View, at_least, matches_search};
use crate::model::{
    ApiStatusRecord, DeliveryWindowRecord, ForecastPoint, LoadBand, ServiceStatus, TruckLoad,
};

// ============================================================================
// Demand forecast
// ============================================================================

/// Forecast chart filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastCriteria {
    pub zone: Choice<String>,
    pub category: Choice<String>,
}

/// Forecast totals over the visible points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub points: usize,
    pub total_predicted_volume: f64,
    /// Mean growth over the visible points, in percent.
    pub average_growth_pct: f64,
    /// Zone filter options, in first-seen order over every point.
    pub zones: Vec<String>,
    /// Category filter options, in first-seen order over every point.
    pub categories: Vec<String>,
}

/// Demand forecast chart view.
#[derive(Debug, Clone, Default)]
pub struct ForecastView;

impl View for ForecastView {
    const NAME: &'static str = "forecast";

    type Record = ForecastPoint;
    type Criteria = ForecastCriteria;
    type Summary = ForecastSummary;

    fn matches(&self, criteria: &ForecastCriteria, point: &ForecastPoint) -> bool {
        criteria.zone.admits_str(&point.zone) && criteria.category.admits_str(&point.category)
    }

    fn summarize(&self, all: &[ForecastPoint], visible: &[ForecastPoint]) -> ForecastSummary {
        ForecastSummary {
            points: visible.len(),
            total_predicted_volume: visible.iter().map(|p| p.predicted_volume).sum(),
            average_growth_pct: average(visible.iter().map(ForecastPoint::growth_pct)),
            zones: distinct_values(all, |p| p.zone.as_str()),
            categories: distinct_values(all, |p| p.category.as_str()),
        }
    }
}

// ============================================================================
// Truck loads
// ============================================================================

/// Truck load filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruckLoadCriteria {
    pub truck: Choice<String>,
    /// Inclusive lower bound on the load score.
    pub min_load_score: u32,
}

/// Capacity and packing quality of the visible trucks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckLoadSummary {
    pub trucks: usize,
    pub total_capacity: f64,
    pub total_occupied: f64,
    /// Occupied share of the visible fleet's capacity.
    pub fleet_utilization_pct: f64,
    pub good_loads: usize,
    pub fair_loads: usize,
    pub poor_loads: usize,
}

/// Truck load optimizer view.
#[derive(Debug, Clone, Default)]
pub struct TruckLoadView;

impl View for TruckLoadView {
    const NAME: &'static str = "truck_loads";

    type Record = TruckLoad;
    type Criteria = TruckLoadCriteria;
    type Summary = TruckLoadSummary;

    fn matches(&self, criteria: &TruckLoadCriteria, load: &TruckLoad) -> bool {
        criteria.truck.admits_str(&load.truck_id)
            && at_least(load.load_score, criteria.min_load_score)
    }

    fn summarize(&self, _all: &[TruckLoad], visible: &[TruckLoad]) -> TruckLoadSummary {
        let total_capacity: f64 = visible.iter().map(|l| l.capacity).sum();
        let total_occupied: f64 = visible.iter().map(|l| l.occupied).sum();
        let fleet_utilization_pct = if total_capacity > 0.0 {
            clamp_percentage(total_occupied / total_capacity * 100.0)
        } else {
            0.0
        };

        TruckLoadSummary {
            trucks: visible.len(),
            total_capacity,
            total_occupied,
            fleet_utilization_pct,
            good_loads: count_where(visible, |l| l.load_band() == LoadBand::Good),
            fair_loads: count_where(visible, |l| l.load_band() == LoadBand::Fair),
            poor_loads: count_where(visible, |l| l.load_band() == LoadBand::Poor),
        }
    }
}

// ============================================================================
// Delivery windows
// ============================================================================

/// First hour of the delivery day grid.
const FIRST_SLOT_HOUR: u32 = 8;
/// Hour the delivery day grid ends.
const LAST_SLOT_HOUR: u32 = 18;
/// Width of one grid slot.
const SLOT_HOURS: u32 = 2;

/// A two-hour column of the delivery schedule grid, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimeSlot {
    /// Every slot of the grid, earliest first.
    pub fn grid() -> Vec<TimeSlot> {
        (FIRST_SLOT_HOUR..LAST_SLOT_HOUR)
            .step_by(SLOT_HOURS as usize)
            .map(|start_hour| TimeSlot {
                start_hour,
                end_hour: start_hour + SLOT_HOURS,
            })
            .collect()
    }

    /// Grid slot containing `at`, if it falls inside the grid.
    pub fn containing(at: NaiveDateTime) -> Option<TimeSlot> {
        let hour = at.hour();
        if !(FIRST_SLOT_HOUR..LAST_SLOT_HOUR).contains(&hour) {
            return None;
        }
        let start_hour = FIRST_SLOT_HOUR + (hour - FIRST_SLOT_HOUR) / SLOT_HOURS * SLOT_HOURS;
        Some(TimeSlot {
            start_hour,
            end_hour: start_hour + SLOT_HOURS,
        })
    }
}

/// Delivery schedule filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryWindowCriteria {
    pub truck: Choice<String>,
    /// Keeps only windows whose derived compliance is false.
    pub non_compliant_only: bool,
}

/// A visible delivery placed on the schedule grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledDelivery {
    pub truck_id: String,
    pub store_name: String,
    pub slot: Option<TimeSlot>,
    pub compliant: bool,
    pub high_risk: bool,
}

/// Compliance counts over every window, plus the visible schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryWindowSummary {
    pub windows: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub high_risk: usize,
    /// Share of all windows delivered compliantly.
    pub on_time_rate: f64,
    /// Truck filter options, in first-seen order.
    pub trucks: Vec<String>,
    pub schedule: Vec<ScheduledDelivery>,
}

/// Delivery window schedule view.
#[derive(Debug, Clone, Default)]
pub struct DeliveryWindowView;

impl View for DeliveryWindowView {
    const NAME: &'static str = "delivery_windows";

    type Record = DeliveryWindowRecord;
    type Criteria = DeliveryWindowCriteria;
    type Summary = DeliveryWindowSummary;

    fn matches(&self, criteria: &DeliveryWindowCriteria, window: &DeliveryWindowRecord) -> bool {
        criteria.truck.admits_str(&window.truck_id)
            && (!criteria.non_compliant_only || !window.is_compliant())
    }

    fn summarize(
        &self,
        all: &[DeliveryWindowRecord],
        visible: &[DeliveryWindowRecord],
    ) -> DeliveryWindowSummary {
        let compliant = count_where(all, DeliveryWindowRecord::is_compliant);
        let non_compliant = all.len() - compliant;

        DeliveryWindowSummary {
            windows: all.len(),
            compliant,
            non_compliant,
            high_risk: count_where(all, DeliveryWindowRecord::is_high_risk),
            on_time_rate: on_time_rate(all.len(), non_compliant),
            trucks: distinct_values(all, |w| w.truck_id.as_str()),
            schedule: visible
                .iter()
                .map(|w| ScheduledDelivery {
                    truck_id: w.truck_id.clone(),
                    store_name: w.store_name.clone(),
                    slot: TimeSlot::containing(w.delivery_eta),
                    compliant: w.is_compliant(),
                    high_risk: w.is_high_risk(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Integration status
// ============================================================================

/// Integration list filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiStatusCriteria {
    /// Matched against the service name.
    pub search: String,
    pub status: Choice<ServiceStatus>,
}

/// Integration health over every service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiStatusSummary {
    pub services: usize,
    pub online: usize,
    pub warning: usize,
    pub offline: usize,
    /// Share of services online.
    pub availability_pct: f64,
    /// Services offering a reconnect action, in input order.
    pub needs_reconnect: Vec<String>,
}

/// Upstream integration status view.
#[derive(Debug, Clone, Default)]
pub struct ApiStatusView;

impl View for ApiStatusView {
    const NAME: &'static str = "api_status";

    type Record = ApiStatusRecord;
    type Criteria = ApiStatusCriteria;
    type Summary = ApiStatusSummary;

    fn matches(&self, criteria: &ApiStatusCriteria, api: &ApiStatusRecord) -> bool {
        matches_search(&criteria.search, [api.service.as_str()])
            && criteria.status.admits(&api.status)
    }

    fn summarize(&self, all: &[ApiStatusRecord], _visible: &[ApiStatusRecord]) -> ApiStatusSummary {
        let online = count_where(all, |a| a.status == ServiceStatus::Online);

        ApiStatusSummary {
            services: all.len(),
            online,
            warning: count_where(all, |a| a.status == ServiceStatus::Warning),
            offline: count_where(all, |a| a.status == ServiceStatus::Offline),
            availability_pct: percentage(online, all.len()),
            needs_reconnect: all
                .iter()
                .filter(|a| a.needs_reconnect())
                .map(|a| a.service.clone())
                .collect(),
        }
    }
}
