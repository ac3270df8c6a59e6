#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate view types and pipeline parameters for incident analytics.
//!
//! The parameter types ([`FilterCriteria`], [`YearAxis`], [`RateCorrection`])
//! are deserialized straight out of dataset definitions. The view types
//! ([`MapView`], [`YearlyCounts`], [`RegionRate`]) are what the aggregation
//! stage produces and what figure generation consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use terror_map_incident_models::CasualtyClass;

/// Row predicate applied before deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Only rows whose country equals this value are kept.
    pub target_country: String,
    /// Rows whose region equals this value are dropped.
    #[serde(default)]
    pub excluded_region: Option<String>,
}

/// Declared x-axis for the per-year chart.
///
/// A contiguous range of years with known gap years removed. Gap years are
/// years the dataset has no data for at all, as opposed to years with zero
/// incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearAxis {
    /// First year on the axis (inclusive).
    pub first: i32,
    /// Last year on the axis (inclusive).
    pub last: i32,
    /// Years missing from the source data.
    #[serde(default)]
    pub missing: Vec<i32>,
}

impl YearAxis {
    /// Returns the declared years in ascending order.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        (self.first..=self.last)
            .filter(|year| !self.missing.contains(year))
            .collect()
    }

    /// Whether `year` is on the declared axis.
    #[must_use]
    pub fn contains(&self, year: i32) -> bool {
        (self.first..=self.last).contains(&year) && !self.missing.contains(&year)
    }

    /// Human-readable span, e.g. `"1970-2015"`.
    #[must_use]
    pub fn span_label(&self) -> String {
        format!("{}-{}", self.first, self.last)
    }
}

/// Manual adjustment applied to one region's per-capita rate.
///
/// Used when a region's population figure undercounts the population the
/// incidents actually draw from (e.g. a city-sized jurisdiction with a large
/// commuter catchment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCorrection {
    /// Two-letter region code the correction applies to.
    pub region: String,
    /// The computed rate is divided by this value.
    pub divisor: f64,
}

/// One marker on the incident map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Source event identifier.
    pub id: i64,
    /// Marker latitude.
    pub latitude: Option<f64>,
    /// Marker longitude.
    pub longitude: Option<f64>,
    /// Hover label, e.g. `"July 1, 1985<br>0 Killed, 3 Injured"`.
    pub text: String,
    /// Marker diameter.
    pub size: f64,
}

/// Map markers split by casualty class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Incidents with at least one fatality.
    pub fatal: Vec<MapPoint>,
    /// Incidents with no fatalities.
    pub non_fatal: Vec<MapPoint>,
}

impl MapView {
    /// Returns the markers for one casualty class.
    #[must_use]
    pub fn series(&self, class: CasualtyClass) -> &[MapPoint] {
        match class {
            CasualtyClass::Fatal => &self.fatal,
            CasualtyClass::NonFatal => &self.non_fatal,
        }
    }

    /// Total number of markers across both series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fatal.len() + self.non_fatal.len()
    }

    /// Whether both series are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fatal.is_empty() && self.non_fatal.is_empty()
    }
}

/// Incident counts per year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyCounts {
    /// Count for every year observed in the data.
    pub counts: BTreeMap<i32, u64>,
    /// Declared chart axis.
    pub axis: Vec<i32>,
}

impl YearlyCounts {
    /// Counts aligned to [`Self::axis`]; years with no incidents are `0`.
    #[must_use]
    pub fn series(&self) -> Vec<u64> {
        self.axis
            .iter()
            .map(|year| self.counts.get(year).copied().unwrap_or(0))
            .collect()
    }

    /// Sum of all observed counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Per-capita incident rate for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRate {
    /// Two-letter region code.
    pub code: String,
    /// Full region name.
    pub name: String,
    /// Population used as the denominator.
    pub population: u64,
    /// Number of retained incidents in the region.
    pub count: u64,
    /// Incidents per 100,000 people, rounded to 2 decimals (after any
    /// correction).
    pub rate: f64,
    /// Whether a [`RateCorrection`] was applied.
    pub corrected: bool,
}
