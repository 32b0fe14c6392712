//! Dashboard host: one memoized view per record kind.
//!
//! The host owns the loaded dataset as shared slices and hands every view's
//! output back in a single [`DashboardSnapshot`]. Interactive state (search
//! boxes, dropdowns, toggles) lives with the caller and flows in through
//! [`DashboardCriteria`]. Re-rendering with unchanged criteria is served from
//! each view's cache; [`Dashboard::reload`] swaps in new slices, which makes
//! every cache miss on the next snapshot.
//!
//! # Usage
//!
//! ```ignore
//! let mut dashboard = Dashboard::new(Dataset::sample()?, Thresholds::default());
//! let snapshot = dashboard.snapshot(&DashboardCriteria::default());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::View;
use crate::memo::{Memoized, SharedOutput};
use crate::model::Band;
use crate::source::Dataset;
use crate::thresholds::Thresholds;
use crate::views::demand::{DemandCriteria, PerishableAlertCriteria};
use crate::views::forecast::{
    ApiStatusCriteria, DeliveryWindowCriteria, ForecastCriteria, TruckLoadCriteria,
};
use crate::views::inventory::InventoryCriteria;
use crate::views::routes::RouteCriteria;
use crate::views::traffic::{
    DelayBlock, DeliveryTally, TrafficAlertCriteria, VehicleCriteria,
};
use crate::views::{
    ApiStatusView, DeliveryWindowView, DemandView, ForecastView, InventoryView,
    PerishableAlertView, RouteView, TrafficAlertView, TruckLoadView, VehicleView,
};

/// Criteria for every view at once. The default shows everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardCriteria {
    pub inventory: InventoryCriteria,
    pub demand: DemandCriteria,
    pub perishable_alerts: PerishableAlertCriteria,
    pub routes: RouteCriteria,
    pub vehicles: VehicleCriteria,
    pub traffic_alerts: TrafficAlertCriteria,
    pub forecast: ForecastCriteria,
    pub truck_loads: TruckLoadCriteria,
    pub delivery_windows: DeliveryWindowCriteria,
    pub api_status: ApiStatusCriteria,
}

/// Average delay of one time block with its indicator colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayBand {
    pub label: String,
    pub average_delay_minutes: f64,
    pub band: Band,
}

impl From<&DelayBlock> for DelayBand {
    fn from(block: &DelayBlock) -> Self {
        Self {
            label: block.label.clone(),
            average_delay_minutes: block.average_delay_minutes,
            band: block.band(),
        }
    }
}

/// Every view's output for one set of criteria.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub inventory: SharedOutput<InventoryView>,
    pub demand: SharedOutput<DemandView>,
    pub perishable_alerts: SharedOutput<PerishableAlertView>,
    pub routes: SharedOutput<RouteView>,
    pub vehicles: SharedOutput<VehicleView>,
    pub traffic_alerts: SharedOutput<TrafficAlertView>,
    pub forecast: SharedOutput<ForecastView>,
    pub truck_loads: SharedOutput<TruckLoadView>,
    pub delivery_windows: SharedOutput<DeliveryWindowView>,
    pub api_status: SharedOutput<ApiStatusView>,
    /// Fleet-wide on-time share from the dispatch counters.
    pub fleet_on_time_rate: f64,
    pub delay_bands: Vec<DelayBand>,
}

/// Cache counters for one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoStats {
    pub view: &'static str,
    pub hits: u64,
    pub misses: u64,
}

/// A record slice and the memoized view rendering it.
struct Panel<V: View> {
    records: Arc<[V::Record]>,
    memo: Memoized<V>,
}

impl<V: View> Panel<V> {
    fn new(view: V, records: Vec<V::Record>) -> Self {
        Self {
            records: Arc::from(records),
            memo: Memoized::new(view),
        }
    }

    fn render(&mut self, criteria: &V::Criteria) -> SharedOutput<V> {
        self.memo.evaluate(&self.records, criteria)
    }

    fn replace(&mut self, records: Vec<V::Record>) {
        self.records = Arc::from(records);
    }

    fn stats(&self) -> MemoStats {
        let (hits, misses) = self.memo.stats();
        MemoStats {
            view: V::NAME,
            hits,
            misses,
        }
    }
}

/// Every dashboard view over one loaded dataset.
pub struct Dashboard {
    inventory: Panel<InventoryView>,
    demand: Panel<DemandView>,
    perishable_alerts: Panel<PerishableAlertView>,
    routes: Panel<RouteView>,
    vehicles: Panel<VehicleView>,
    traffic_alerts: Panel<TrafficAlertView>,
    forecast: Panel<ForecastView>,
    truck_loads: Panel<TruckLoadView>,
    delivery_windows: Panel<DeliveryWindowView>,
    api_status: Panel<ApiStatusView>,
    delivery_tally: DeliveryTally,
    delay_blocks: Vec<DelayBlock>,
}

impl Dashboard {
    pub fn new(dataset: Dataset, thresholds: Thresholds) -> Self {
        let Dataset {
            inventory,
            demand,
            perishable_alerts,
            routes,
            vehicles,
            traffic_alerts,
            delivery_tally,
            delay_blocks,
            forecast,
            truck_loads,
            delivery_windows,
            api_status,
        } = dataset;

        Self {
            inventory: Panel::new(
                InventoryView {
                    top_stores: thresholds.top_stores,
                },
                inventory,
            ),
            demand: Panel::new(DemandView, demand),
            perishable_alerts: Panel::new(PerishableAlertView { thresholds }, perishable_alerts),
            routes: Panel::new(RouteView, routes),
            vehicles: Panel::new(VehicleView { thresholds }, vehicles),
            traffic_alerts: Panel::new(TrafficAlertView, traffic_alerts),
            forecast: Panel::new(ForecastView, forecast),
            truck_loads: Panel::new(TruckLoadView, truck_loads),
            delivery_windows: Panel::new(DeliveryWindowView, delivery_windows),
            api_status: Panel::new(ApiStatusView, api_status),
            delivery_tally,
            delay_blocks,
        }
    }

    /// Replace every record slice with the contents of `dataset`.
    pub fn reload(&mut self, dataset: Dataset) {
        let records = dataset.record_count();

        self.inventory.replace(dataset.inventory);
        self.demand.replace(dataset.demand);
        self.perishable_alerts.replace(dataset.perishable_alerts);
        self.routes.replace(dataset.routes);
        self.vehicles.replace(dataset.vehicles);
        self.traffic_alerts.replace(dataset.traffic_alerts);
        self.forecast.replace(dataset.forecast);
        self.truck_loads.replace(dataset.truck_loads);
        self.delivery_windows.replace(dataset.delivery_windows);
        self.api_status.replace(dataset.api_status);
        self.delivery_tally = dataset.delivery_tally;
        self.delay_blocks = dataset.delay_blocks;

        info!(records, "Dashboard reloaded");
    }

    /// Render every view under `criteria`.
    pub fn snapshot(&mut self, criteria: &DashboardCriteria) -> DashboardSnapshot {
        DashboardSnapshot {
            inventory: self.inventory.render(&criteria.inventory),
            demand: self.demand.render(&criteria.demand),
            perishable_alerts: self.perishable_alerts.render(&criteria.perishable_alerts),
            routes: self.routes.render(&criteria.routes),
            vehicles: self.vehicles.render(&criteria.vehicles),
            traffic_alerts: self.traffic_alerts.render(&criteria.traffic_alerts),
            forecast: self.forecast.render(&criteria.forecast),
            truck_loads: self.truck_loads.render(&criteria.truck_loads),
            delivery_windows: self.delivery_windows.render(&criteria.delivery_windows),
            api_status: self.api_status.render(&criteria.api_status),
            fleet_on_time_rate: self.delivery_tally.on_time_rate(),
            delay_bands: self.delay_blocks.iter().map(DelayBand::from).collect(),
        }
    }

    /// Cache counters for every view, in snapshot order.
    pub fn memo_stats(&self) -> Vec<MemoStats> {
        vec![
            self.inventory.stats(),
            self.demand.stats(),
            self.perishable_alerts.stats(),
            self.routes.stats(),
            self.vehicles.stats(),
            self.traffic_alerts.stats(),
            self.forecast.stats(),
            self.truck_loads.stats(),
            self.delivery_windows.stats(),
            self.api_status.stats(),
        ]
    }
}
