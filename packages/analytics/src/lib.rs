#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident filtering, deduplication, and aggregate views.
//!
//! The stages run in order over an in-memory table:
//!
//! 1. [`filter::filter_incidents`] keeps the target country's rows.
//! 2. [`dedup::assign_dates`] resolves each row's calendar date.
//! 3. [`dedup::dedup_most_severe`] collapses duplicate reports.
//! 4. [`views`] derives the map, per-year, and per-region views.

pub mod dedup;
pub mod filter;
pub mod views;

use terror_map_analytics_models::{MapView, RateCorrection, RegionRate, YearAxis, YearlyCounts};
use terror_map_geography_models::StatePopulation;
use terror_map_incident_models::DatedIncident;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Year, month, and day do not form a calendar date.
    #[error("Invalid date {year}-{month:02}-{day:02} for event {id}")]
    Date {
        /// Event identifier of the offending record.
        id: i64,
        /// Year component.
        year: i32,
        /// Month component.
        month: u32,
        /// Day component (after unknown-day normalization).
        day: u32,
    },

    /// A region has no entry in the population table.
    #[error("No population entry for region '{region}'{}", event_suffix(*.id))]
    Lookup {
        /// Region name or code that was looked up.
        region: String,
        /// An event in that region, if the lookup came from incident data.
        id: Option<i64>,
    },
}

fn event_suffix(id: Option<i64>) -> String {
    id.map(|id| format!(" (event {id})")).unwrap_or_default()
}

/// The three aggregate views derived from the deduplicated incidents.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentViews {
    /// Map markers split by casualty class.
    pub map: MapView,
    /// Incident counts per year.
    pub years: YearlyCounts,
    /// Per-capita rates for every region in the population table.
    pub regions: Vec<RegionRate>,
}

/// Derives all aggregate views from deduplicated incidents.
///
/// # Errors
///
/// Returns [`AnalyticsError::Lookup`] if an incident's region, or a
/// correction's region, is missing from `populations`.
pub fn aggregate(
    incidents: &[DatedIncident],
    axis: &YearAxis,
    populations: &[StatePopulation],
    corrections: &[RateCorrection],
) -> Result<IncidentViews, AnalyticsError> {
    Ok(IncidentViews {
        map: views::map_view(incidents),
        years: views::yearly_counts(incidents, axis),
        regions: views::region_rates(incidents, populations, corrections)?,
    })
}
