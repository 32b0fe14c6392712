//! Route optimization: planned truck routes and their stops.

use serde::{Deserialize, Serialize};

use crate::aggregation::{average, count_where};
use crate::engine::{Choice, View, at_least, matches_search};
use crate::model::{ItemType, Level, RouteRecord, TrafficLevel};

/// Route list filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteCriteria {
    /// Matched against truck id and driver.
    pub search: String,
    /// Keeps routes with at least one stop of this item type.
    pub item_type: Choice<ItemType>,
    pub traffic: Choice<TrafficLevel>,
    /// Keeps routes with at least one stop of this urgency.
    pub urgency: Choice<Level>,
    /// Inclusive lower bound on the route urgency score.
    pub min_urgency_score: f64,
}

/// Route panel summary, over the visible routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub total_routes: usize,
    pub visible_routes: usize,
    pub stops: usize,
    pub total_distance_km: f64,
    pub average_eta_minutes: f64,
    pub heavy_traffic_routes: usize,
    /// Visible route with the highest urgency score.
    pub most_urgent: Option<String>,
}

/// Planned route list view.
#[derive(Debug, Clone, Default)]
pub struct RouteView;

impl View for RouteView {
    const NAME: &'static str = "routes";

    type Record = RouteRecord;
    type Criteria = RouteCriteria;
    type Summary = RouteSummary;

    fn matches(&self, criteria: &RouteCriteria, route: &RouteRecord) -> bool {
        matches_search(
            &criteria.search,
            [route.truck_id.as_str(), route.driver.as_str()],
        ) && criteria
            .item_type
            .admits_any(route.stops.iter().map(|s| s.item_type))
            && criteria.traffic.admits(&route.traffic_level)
            && criteria
                .urgency
                .admits_any(route.stops.iter().map(|s| s.urgency))
            && at_least(route.urgency_score, criteria.min_urgency_score)
    }

    fn summarize(&self, all: &[RouteRecord], visible: &[RouteRecord]) -> RouteSummary {
        RouteSummary {
            total_routes: all.len(),
            visible_routes: visible.len(),
            stops: visible.iter().map(|r| r.stops.len()).sum(),
            total_distance_km: visible.iter().map(|r| r.route_distance_km).sum(),
            average_eta_minutes: average(visible.iter().map(|r| f64::from(r.eta_minutes))),
            heavy_traffic_routes: count_where(visible, |r| r.traffic_level == TrafficLevel::Heavy),
            most_urgent: visible
                .iter()
                .max_by(|a, b| a.urgency_score.total_cmp(&b.urgency_score))
                .map(|r| r.truck_id.clone()),
        }
    }
}

/// `"1h 8m"`, or `"52m"` under an hour.
pub fn format_eta(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}
