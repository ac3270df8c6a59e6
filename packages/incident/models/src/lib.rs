#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record types shared across the terror-map pipeline.
//!
//! An [`IncidentRecord`] is one normalized row of the source dataset. Once
//! its calendar date has been resolved it becomes a [`DatedIncident`], which
//! is the unit the deduplication and aggregation stages operate on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Whether an incident killed anyone.
///
/// The map view plots the two classes as separate series with different
/// marker sizing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CasualtyClass {
    /// At least one fatality.
    Fatal,
    /// No fatalities (injuries only, or no casualties at all).
    NonFatal,
}

impl CasualtyClass {
    /// Classifies a fatality count.
    #[must_use]
    pub const fn from_fatalities(fatalities: u32) -> Self {
        if fatalities > 0 {
            Self::Fatal
        } else {
            Self::NonFatal
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Fatal, Self::NonFatal]
    }
}

/// One normalized row of the incident dataset.
///
/// Casualty counts are always present: blank source cells are normalized to
/// zero before a record is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Opaque event identifier from the source dataset.
    pub id: i64,
    /// Year the incident occurred.
    pub year: i32,
    /// Month the incident occurred (1-12).
    pub month: u32,
    /// Day of month. `0` means the source did not record the day.
    pub day: u32,
    /// Country name as spelled in the source dataset.
    pub country: String,
    /// State, province, or other first-level region name.
    pub region: String,
    /// Latitude (WGS84). `None` when the source cell is blank.
    pub latitude: Option<f64>,
    /// Longitude (WGS84). `None` when the source cell is blank.
    pub longitude: Option<f64>,
    /// Primary target category (e.g. "Business", "Private Citizens & Property").
    pub target: String,
    /// Primary weapon category (e.g. "Explosives/Bombs/Dynamite").
    pub weapon: String,
    /// Number of people killed.
    pub fatalities: u32,
    /// Number of people injured.
    pub injuries: u32,
}

impl IncidentRecord {
    /// Severity ordering key: fatalities first, injuries second.
    #[must_use]
    pub const fn severity(&self) -> (u32, u32) {
        (self.fatalities, self.injuries)
    }

    /// Returns the day of month with the unknown-day placeholder (`0`)
    /// replaced by the first of the month.
    #[must_use]
    pub const fn normalized_day(&self) -> u32 {
        if self.day == 0 { 1 } else { self.day }
    }
}

/// An [`IncidentRecord`] with a resolved calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedIncident {
    /// The underlying record. Its `day` field has already been normalized.
    pub incident: IncidentRecord,
    /// Calendar date built from year, month, and normalized day.
    pub date: NaiveDate,
}

impl DatedIncident {
    /// Returns the key used to decide whether two incidents describe the
    /// same event.
    #[must_use]
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            date: self.date,
            latitude_bits: self.incident.latitude.map(f64::to_bits),
            longitude_bits: self.incident.longitude.map(f64::to_bits),
            fatalities: self.incident.fatalities,
        }
    }

    /// Returns the casualty class of this incident.
    #[must_use]
    pub const fn casualty_class(&self) -> CasualtyClass {
        CasualtyClass::from_fatalities(self.incident.fatalities)
    }
}

/// Identity of an incident for deduplication purposes.
///
/// Coordinates are compared by their exact bit patterns. Injuries are
/// deliberately not part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    /// Calendar date of the incident.
    pub date: NaiveDate,
    /// Bit pattern of the latitude, if present.
    pub latitude_bits: Option<u64>,
    /// Bit pattern of the longitude, if present.
    pub longitude_bits: Option<u64>,
    /// Number of fatalities.
    pub fatalities: u32,
}
