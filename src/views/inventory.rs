//! Inventory monitoring: stock levels per store and item.

use serde::{Deserialize, Serialize};

use crate::aggregation::{GroupCount, count_where, distinct_count, rank_groups};
use crate::engine::{Choice, View, matches_search};
use crate::model::{InventoryRecord, ItemType, Priority, StockStatus};
use crate::thresholds::TOP_STORES;

/// Inventory table filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryCriteria {
    /// Matched against store name and item name.
    pub search: String,
    pub stock_status: Choice<StockStatus>,
    pub item_type: Choice<ItemType>,
    pub priority: Choice<Priority>,
}

/// KPI cards of the inventory dashboard.
///
/// Counts other than `visible` cover the whole inventory, not the filtered
/// table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub total: usize,
    pub visible: usize,
    pub critical: usize,
    pub low: usize,
    /// Stores with at least one critical or low line.
    pub affected_stores: usize,
    /// Stores ranked by critical lines, then by critical + low lines.
    pub top_stores: Vec<GroupCount>,
}

/// Inventory view; `top_stores` bounds the stockout overview.
#[derive(Debug, Clone)]
pub struct InventoryView {
    pub top_stores: usize,
}

impl Default for InventoryView {
    fn default() -> Self {
        Self {
            top_stores: TOP_STORES,
        }
    }
}

impl View for InventoryView {
    const NAME: &'static str = "inventory";

    type Record = InventoryRecord;
    type Criteria = InventoryCriteria;
    type Summary = InventorySummary;

    fn matches(&self, criteria: &InventoryCriteria, item: &InventoryRecord) -> bool {
        matches_search(
            &criteria.search,
            [item.store_name.as_str(), item.item_name.as_str()],
        ) && criteria.stock_status.admits(&item.stock_status())
            && criteria.item_type.admits(&item.item_type())
            && criteria.priority.admits(&item.restocking_priority)
    }

    fn summarize(&self, all: &[InventoryRecord], visible: &[InventoryRecord]) -> InventorySummary {
        let needs_restock = |item: &InventoryRecord| item.stock_status().needs_restock();

        InventorySummary {
            total: all.len(),
            visible: visible.len(),
            critical: count_where(all, |i| i.stock_status() == StockStatus::Critical),
            low: count_where(all, |i| i.stock_status() == StockStatus::Low),
            affected_stores: distinct_count(all, needs_restock, |i| i.store_id.as_str()),
            top_stores: rank_groups(
                all,
                needs_restock,
                |i| i.store_id.as_str(),
                |i| i.store_name.as_str(),
                |i| i.stock_status() == StockStatus::Critical,
                self.top_stores,
            ),
        }
    }
}
