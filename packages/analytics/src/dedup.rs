//! Date resolution and duplicate-report collapsing.
//!
//! The dataset frequently carries the same event more than once (separate
//! reports from different sources, or one row per claimed perpetrator).
//! Duplicates are grouped by [`DedupKey`] and only the most severe report in
//! each group survives.

use std::collections::HashMap;

use chrono::NaiveDate;
use terror_map_incident_models::{DatedIncident, DedupKey, IncidentRecord};

use crate::AnalyticsError;

/// Resolves the calendar date of every record. An unknown day (`0`) is
/// replaced with the first of the month before the date is built.
///
/// # Errors
///
/// Returns [`AnalyticsError::Date`] for the first record whose year, month,
/// and normalized day do not form a valid date.
pub fn assign_dates(records: Vec<IncidentRecord>) -> Result<Vec<DatedIncident>, AnalyticsError> {
    records
        .into_iter()
        .map(|mut incident| {
            incident.day = incident.normalized_day();
            let date = NaiveDate::from_ymd_opt(incident.year, incident.month, incident.day)
                .ok_or(AnalyticsError::Date {
                    id: incident.id,
                    year: incident.year,
                    month: incident.month,
                    day: incident.day,
                })?;
            Ok(DatedIncident { incident, date })
        })
        .collect()
}

/// Collapses incidents sharing a [`DedupKey`], keeping the one with the
/// greatest `(fatalities, injuries)`. Ties keep the earliest in input order.
///
/// Survivors are returned most severe first; incidents of equal severity
/// keep their relative input order.
#[must_use]
pub fn dedup_most_severe(incidents: Vec<DatedIncident>) -> Vec<DatedIncident> {
    let total = incidents.len();
    let mut best: HashMap<DedupKey, usize> = HashMap::with_capacity(total);

    for (index, incident) in incidents.iter().enumerate() {
        best.entry(incident.dedup_key())
            .and_modify(|current| {
                if incident.incident.severity() > incidents[*current].incident.severity() {
                    *current = index;
                }
            })
            .or_insert(index);
    }

    let mut survivors: Vec<usize> = best.into_values().collect();
    survivors.sort_unstable_by(|&a, &b| {
        incidents[b]
            .incident
            .severity()
            .cmp(&incidents[a].incident.severity())
            .then(a.cmp(&b))
    });

    let mut slots: Vec<Option<DatedIncident>> = incidents.into_iter().map(Some).collect();
    let kept: Vec<_> = survivors
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect();

    log::info!(
        "Deduplicated {total} incidents to {} ({} duplicates dropped)",
        kept.len(),
        total - kept.len()
    );

    kept
}
