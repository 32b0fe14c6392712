//! Per-dashboard specialisations of the engine.
//!
//! Each module pairs a criteria type, whose `Default` matches every record,
//! with a summary type and a [`crate::engine::View`] implementation:
//!
//! - [`inventory`]: store stock levels and restocking overview
//! - [`demand`]: demand heatmap and perishable shipment alerts
//! - [`routes`]: planned delivery routes
//! - [`traffic`]: trucks in transit and operational alerts
//! - [`forecast`]: demand forecast, truck loads, delivery windows, integrations

pub mod demand;
pub mod forecast;
pub mod inventory;
pub mod routes;
pub mod traffic;

pub use demand::{DemandView, PerishableAlertView};
pub use forecast::{ApiStatusView, DeliveryWindowView, ForecastView, TruckLoadView};
pub use inventory::InventoryView;
pub use routes::RouteView;
pub use traffic::{TrafficAlertView, VehicleView};
