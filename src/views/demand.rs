//! Demand heatmap: per-store demand and perishable shipment alerts.

use serde::{Deserialize, Serialize};

use crate::aggregation::{average, count_where};
use crate::engine::{Choice, View, at_least};
use crate::model::{
    Band, DemandLevel, DemandRecord, ItemType, PerishableAlert, RequestedItem, ShelfLifeUrgency,
};
use crate::thresholds::{TOP_REQUESTED_ITEMS, Thresholds};

/// Heatmap filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandCriteria {
    /// Inclusive lower bound on the demand score.
    pub min_demand_score: u32,
    /// Keeps stores with at least one requested item of this type.
    pub item_type: Choice<ItemType>,
    pub stockouts_only: bool,
}

/// Heatmap KPI cards, computed over every store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSummary {
    pub total_stores: usize,
    pub visible_stores: usize,
    pub high_demand_stores: usize,
    pub stockout_stores: usize,
    /// Rounded mean demand score, 0 without stores.
    pub average_demand_score: u32,
    /// Heat level and most requested items of each visible store, in order.
    pub stores: Vec<StoreRequests>,
}

/// A store's marker on the heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRequests {
    pub store_id: String,
    pub store_name: String,
    pub demand_level: DemandLevel,
    /// At most [`TOP_REQUESTED_ITEMS`], most requested first.
    pub top_items: Vec<RequestedItem>,
}

/// Demand heatmap view.
#[derive(Debug, Clone, Default)]
pub struct DemandView;

impl View for DemandView {
    const NAME: &'static str = "demand";

    type Record = DemandRecord;
    type Criteria = DemandCriteria;
    type Summary = DemandSummary;

    fn matches(&self, criteria: &DemandCriteria, store: &DemandRecord) -> bool {
        at_least(store.current_demand_score, criteria.min_demand_score)
            && criteria
                .item_type
                .admits_any(store.top_requested_items.iter().map(|i| i.item_type()))
            && (!criteria.stockouts_only || store.has_stockout)
    }

    fn summarize(&self, all: &[DemandRecord], visible: &[DemandRecord]) -> DemandSummary {
        let mean = average(all.iter().map(|s| f64::from(s.current_demand_score)));

        DemandSummary {
            total_stores: all.len(),
            visible_stores: visible.len(),
            high_demand_stores: count_where(all, |s| s.demand_level() == DemandLevel::High),
            stockout_stores: count_where(all, |s| s.has_stockout),
            average_demand_score: mean.round() as u32,
            stores: visible
                .iter()
                .map(|s| StoreRequests {
                    store_id: s.store_id.clone(),
                    store_name: s.store_name.clone(),
                    demand_level: s.demand_level(),
                    top_items: s.top_items(TOP_REQUESTED_ITEMS).to_vec(),
                })
                .collect(),
        }
    }
}

/// Perishable alert panel filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerishableAlertCriteria {
    /// Compared against the urgency derived from remaining shelf life.
    pub urgency: Choice<ShelfLifeUrgency>,
    pub destination_store: Choice<String>,
}

/// One alert as shown in the panel, with its derived display values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertBadge {
    pub item: String,
    pub urgency: ShelfLifeUrgency,
    pub band: Band,
    pub shelf_life_pct: f64,
}

/// Perishable alert counts over every alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerishableAlertSummary {
    pub total: usize,
    pub critical: usize,
    pub medium: usize,
    pub normal: usize,
    /// Display values of the visible alerts, in order.
    pub badges: Vec<AlertBadge>,
}

/// Perishable shipment alert view; urgency cutoffs come from `thresholds`.
#[derive(Debug, Clone, Default)]
pub struct PerishableAlertView {
    pub thresholds: Thresholds,
}

impl View for PerishableAlertView {
    const NAME: &'static str = "perishable_alerts";

    type Record = PerishableAlert;
    type Criteria = PerishableAlertCriteria;
    type Summary = PerishableAlertSummary;

    fn matches(&self, criteria: &PerishableAlertCriteria, alert: &PerishableAlert) -> bool {
        criteria.urgency.admits(&alert.urgency(&self.thresholds))
            && criteria.destination_store.admits_str(&alert.destination_store)
    }

    fn summarize(
        &self,
        all: &[PerishableAlert],
        visible: &[PerishableAlert],
    ) -> PerishableAlertSummary {
        let with_urgency =
            |urgency: ShelfLifeUrgency| count_where(all, |a| a.urgency(&self.thresholds) == urgency);

        PerishableAlertSummary {
            total: all.len(),
            critical: with_urgency(ShelfLifeUrgency::Critical),
            medium: with_urgency(ShelfLifeUrgency::Medium),
            normal: with_urgency(ShelfLifeUrgency::Normal),
            badges: visible
                .iter()
                .map(|a| AlertBadge {
                    item: a.item.clone(),
                    urgency: a.urgency(&self.thresholds),
                    band: a.shelf_life_band(&self.thresholds),
                    shelf_life_pct: a.shelf_life_percentage(&self.thresholds),
                })
                .collect(),
        }
    }
}
