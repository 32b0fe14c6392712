//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::thresholds::Thresholds;

/// Path to a JSON dataset; the built-in sample is used when unset.
pub const DATASET_VAR: &str = "SUPPLYBOARD_DATASET";
pub const CRITICAL_SHELF_HOURS_VAR: &str = "SUPPLYBOARD_CRITICAL_SHELF_HOURS";
pub const WARNING_SHELF_HOURS_VAR: &str = "SUPPLYBOARD_WARNING_SHELF_HOURS";
pub const SHELF_LIFE_CEILING_HOURS_VAR: &str = "SUPPLYBOARD_SHELF_LIFE_CEILING_HOURS";
pub const TOP_STORES_VAR: &str = "SUPPLYBOARD_TOP_STORES";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub dataset: Option<PathBuf>,
    pub thresholds: Thresholds,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to their defaults. Shelf-life cutoffs
    /// that would put the warning cutoff below the critical one are
    /// rejected as a pair.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Thresholds::default();

        let dataset = lookup(DATASET_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let mut thresholds = Thresholds {
            critical_shelf_hours: parse_or(
                &lookup,
                CRITICAL_SHELF_HOURS_VAR,
                defaults.critical_shelf_hours,
            ),
            warning_shelf_hours: parse_or(
                &lookup,
                WARNING_SHELF_HOURS_VAR,
                defaults.warning_shelf_hours,
            ),
            shelf_life_ceiling_hours: parse_or(
                &lookup,
                SHELF_LIFE_CEILING_HOURS_VAR,
                defaults.shelf_life_ceiling_hours,
            ),
            top_stores: parse_or(&lookup, TOP_STORES_VAR, defaults.top_stores),
        };

        if !hours_valid(thresholds.critical_shelf_hours)
            || !hours_valid(thresholds.warning_shelf_hours)
            || thresholds.warning_shelf_hours < thresholds.critical_shelf_hours
        {
            warn!(
                critical = thresholds.critical_shelf_hours,
                warning = thresholds.warning_shelf_hours,
                "Ignoring inconsistent shelf-life cutoffs"
            );
            thresholds.critical_shelf_hours = defaults.critical_shelf_hours;
            thresholds.warning_shelf_hours = defaults.warning_shelf_hours;
        }
        if !hours_valid(thresholds.shelf_life_ceiling_hours)
            || thresholds.shelf_life_ceiling_hours == 0.0
        {
            thresholds.shelf_life_ceiling_hours = defaults.shelf_life_ceiling_hours;
        }

        Self {
            dataset,
            thresholds,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn hours_valid(hours: f64) -> bool {
    hours.is_finite() && hours >= 0.0
}
