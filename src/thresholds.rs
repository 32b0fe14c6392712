//! Cutoffs shared by classification and summary logic.
//!
//! Every band boundary used by the dashboards lives here so that the
//! shelf-life urgency classification and the progress-bar colouring read the
//! same numbers. Defaults reproduce the values the dashboards shipped with;
//! [`crate::config::Config`] can override the shelf-life ones.

use serde::{Deserialize, Serialize};

/// Remaining shelf life (hours) below which a perishable is `Critical`.
pub const CRITICAL_SHELF_HOURS: f64 = 8.0;

/// Remaining shelf life (hours) below which a perishable is `Medium`.
pub const WARNING_SHELF_HOURS: f64 = 24.0;

/// Reference ceiling for "shelf life remaining" percentages.
pub const SHELF_LIFE_CEILING_HOURS: f64 = 48.0;

/// Demand score at or above which a store is treated as high demand.
pub const HIGH_DEMAND_SCORE: u32 = 80;

/// Demand score at or above which a store is treated as elevated demand.
pub const ELEVATED_DEMAND_SCORE: u32 = 60;

/// Load score at or above which a truck load is well packed.
pub const GOOD_LOAD_SCORE: u32 = 80;

/// Load score at or above which a truck load is acceptable.
pub const FAIR_LOAD_SCORE: u32 = 60;

/// Delay-risk score strictly above which a delivery window is high risk.
pub const HIGH_DELAY_RISK: u32 = 70;

/// Average delay (minutes) strictly above which a time block is severe.
pub const SEVERE_DELAY_MINUTES: f64 = 10.0;

/// Average delay (minutes) strictly above which a time block is elevated.
pub const ELEVATED_DELAY_MINUTES: f64 = 5.0;

/// Number of stores listed in the inventory stockout overview.
pub const TOP_STORES: usize = 3;

/// Number of requested items shown per store on the demand heatmap.
pub const TOP_REQUESTED_ITEMS: usize = 3;

/// The configurable subset of cutoffs, carried by views that need them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub critical_shelf_hours: f64,
    pub warning_shelf_hours: f64,
    pub shelf_life_ceiling_hours: f64,
    pub top_stores: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical_shelf_hours: CRITICAL_SHELF_HOURS,
            warning_shelf_hours: WARNING_SHELF_HOURS,
            shelf_life_ceiling_hours: SHELF_LIFE_CEILING_HOURS,
            top_stores: TOP_STORES,
        }
    }
}
