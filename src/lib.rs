//! Supplyboard - filter and aggregate engine for retail supply-chain dashboards.
//!
//! # Overview
//!
//! Supplyboard backs a set of read-only operational dashboards: store
//! inventory, demand heatmap, delivery routes, traffic, demand forecast,
//! truck loads, delivery windows and integration health. Every dashboard is
//! the same computation over a different record shape: narrow an immutable
//! record list by a criteria value, then summarize it into KPI figures.
//!
//! # Guarantees
//!
//! - Evaluation is pure: identical records and criteria give identical output
//! - Default criteria keep every record, in input order
//! - Statuses and urgencies are derived from numeric fields, never stored
//! - Ratios over empty inputs are 0, never NaN
//!
//! # Modules
//!
//! - [`model`]: Record types and derived classifications
//! - [`thresholds`]: Band cutoffs shared by classification and summaries
//! - [`engine`]: The generic view abstraction and its evaluation
//! - [`aggregation`]: Zero-safe ratios, counts and group ranking
//! - [`views`]: Per-dashboard criteria, summaries and views
//! - [`memo`]: Single-entry caching of view outputs
//! - [`source`]: JSON dataset parsing and validation
//! - [`dashboard`]: Host rendering every view at once
//! - [`config`]: Environment configuration

pub mod aggregation;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod memo;
pub mod model;
pub mod source;
pub mod thresholds;
pub mod views;
