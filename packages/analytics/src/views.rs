//! Aggregate views over deduplicated incidents.
//!
//! Each view is derived independently from the same slice of incidents.

use std::collections::BTreeMap;

use terror_map_analytics_models::{
    MapPoint, MapView, RateCorrection, RegionRate, YearAxis, YearlyCounts,
};
use terror_map_geography_models::{StatePopulation, find_by_code, find_by_name};
use terror_map_incident_models::{CasualtyClass, DatedIncident};

use crate::AnalyticsError;

/// Rates are expressed per this many people.
pub const RATE_PER: f64 = 100_000.0;

/// Base diameter multiplier shared by both marker series.
const MARKER_SCALE: f64 = 8.0;

/// Exponent applied to the fatality count for fatal markers.
const FATALITY_EXPONENT: f64 = 0.255;

/// Exponent applied to `injuries + 1` for non-fatal markers.
const INJURY_EXPONENT: f64 = 0.245;

/// Rounds to two decimals, ties to even.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Marker diameter for an incident with at least one fatality.
#[must_use]
pub fn fatality_marker_size(fatalities: u32) -> f64 {
    f64::from(fatalities).powf(FATALITY_EXPONENT) * MARKER_SCALE
}

/// Marker diameter for an incident with no fatalities.
#[must_use]
pub fn injury_marker_size(injuries: u32) -> f64 {
    (f64::from(injuries) + 1.0).powf(INJURY_EXPONENT) * MARKER_SCALE
}

/// Hover label for a map marker, e.g. `"July 1, 1985<br>0 Killed, 3 Injured"`.
#[must_use]
pub fn hover_text(incident: &DatedIncident) -> String {
    format!(
        "{}<br>{} Killed, {} Injured",
        incident.date.format("%B %-d, %Y"),
        incident.incident.fatalities,
        incident.incident.injuries
    )
}

/// Splits incidents into fatal and non-fatal map markers, preserving input
/// order within each series.
#[must_use]
pub fn map_view(incidents: &[DatedIncident]) -> MapView {
    let mut view = MapView::default();

    for incident in incidents {
        let class = incident.casualty_class();
        let size = match class {
            CasualtyClass::Fatal => fatality_marker_size(incident.incident.fatalities),
            CasualtyClass::NonFatal => injury_marker_size(incident.incident.injuries),
        };
        let point = MapPoint {
            id: incident.incident.id,
            latitude: incident.incident.latitude,
            longitude: incident.incident.longitude,
            text: hover_text(incident),
            size,
        };
        match class {
            CasualtyClass::Fatal => view.fatal.push(point),
            CasualtyClass::NonFatal => view.non_fatal.push(point),
        }
    }

    log::debug!(
        "Map view: {} fatal, {} non-fatal markers",
        view.fatal.len(),
        view.non_fatal.len()
    );

    view
}

/// Counts incidents per year and attaches the declared axis.
///
/// Every observed year is counted, including years that are not on the
/// axis, so the counts always sum to the number of incidents.
#[must_use]
pub fn yearly_counts(incidents: &[DatedIncident], axis: &YearAxis) -> YearlyCounts {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for incident in incidents {
        *counts.entry(incident.incident.year).or_default() += 1;
    }

    for (year, count) in &counts {
        if !axis.contains(*year) {
            log::warn!(
                "{count} incidents in {year}, which is outside the declared {} axis",
                axis.span_label()
            );
        }
    }

    YearlyCounts {
        counts,
        axis: axis.years(),
    }
}

/// Computes incidents per 100,000 people for every region in `populations`.
///
/// Regions with no incidents get a count and rate of `0`. Results are in
/// table order. Each [`RateCorrection`] divides its region's rounded rate
/// and rounds again.
///
/// # Errors
///
/// Returns [`AnalyticsError::Lookup`] if an incident's region name, or a
/// correction's region code, is not in `populations`.
pub fn region_rates(
    incidents: &[DatedIncident],
    populations: &[StatePopulation],
    corrections: &[RateCorrection],
) -> Result<Vec<RegionRate>, AnalyticsError> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for incident in incidents {
        let region = incident.incident.region.as_str();
        let state = find_by_name(populations, region).ok_or_else(|| AnalyticsError::Lookup {
            region: region.to_string(),
            id: Some(incident.incident.id),
        })?;
        *counts.entry(state.name).or_default() += 1;
    }

    for correction in corrections {
        if find_by_code(populations, &correction.region).is_none() {
            return Err(AnalyticsError::Lookup {
                region: correction.region.clone(),
                id: None,
            });
        }
    }

    let rates = populations
        .iter()
        .map(|state| {
            let count = counts.get(state.name).copied().unwrap_or(0);
            #[allow(clippy::cast_precision_loss)]
            let raw = count as f64 / state.population as f64 * RATE_PER;
            let mut rate = round_to_hundredths(raw);

            let correction = corrections
                .iter()
                .find(|c| c.region.eq_ignore_ascii_case(state.code));
            if let Some(correction) = correction {
                log::debug!(
                    "Correcting {} rate {rate} by 1/{}",
                    state.code,
                    correction.divisor
                );
                rate = round_to_hundredths(rate / correction.divisor);
            }

            RegionRate {
                code: state.code.to_string(),
                name: state.name.to_string(),
                population: state.population,
                count,
                rate,
                corrected: correction.is_some(),
            }
        })
        .collect();

    Ok(rates)
}
