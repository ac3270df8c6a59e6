//! Raw row normalization.
//!
//! Turns [`RawRow`] text cells into typed [`IncidentRecord`]s. Blank
//! casualty cells become `0` and fractional counts are truncated, so every
//! normalized record has defined, non-negative casualty counts.

use terror_map_incident_models::IncidentRecord;

use crate::SourceError;
use crate::loader::RawRow;
use crate::parsing::{parse_coordinate, parse_count, parse_integer};

/// Normalizes a single raw row.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] naming the row's line (and event id, once
/// it has been parsed) if any numeric cell is invalid.
pub fn normalize_row(row: &RawRow) -> Result<IncidentRecord, SourceError> {
    let id = parse_integer(&row.id).ok_or_else(|| SourceError::Parse {
        line: row.line,
        id: None,
        message: format!("invalid event id '{}'", row.id),
    })?;

    let invalid = |field: &str, value: &str| SourceError::Parse {
        line: row.line,
        id: Some(id),
        message: format!("invalid {field} '{value}'"),
    };

    let year = parse_integer(&row.year)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| invalid("year", &row.year))?;
    let month = parse_integer(&row.month)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| invalid("month", &row.month))?;
    let day = parse_integer(&row.day)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| invalid("day", &row.day))?;
    let latitude = parse_coordinate(&row.latitude).map_err(|_| invalid("latitude", &row.latitude))?;
    let longitude =
        parse_coordinate(&row.longitude).map_err(|_| invalid("longitude", &row.longitude))?;
    let fatalities =
        parse_count(&row.fatalities).ok_or_else(|| invalid("fatality count", &row.fatalities))?;
    let injuries =
        parse_count(&row.injuries).ok_or_else(|| invalid("injury count", &row.injuries))?;

    Ok(IncidentRecord {
        id,
        year,
        month,
        day,
        country: row.country.clone(),
        region: row.region.clone(),
        latitude,
        longitude,
        target: row.target.clone(),
        weapon: row.weapon.clone(),
        fatalities,
        injuries,
    })
}

/// Normalizes every raw row, stopping at the first invalid one.
///
/// # Errors
///
/// Returns the first [`SourceError::Parse`] encountered.
pub fn normalize_all(rows: &[RawRow]) -> Result<Vec<IncidentRecord>, SourceError> {
    let records = rows
        .iter()
        .map(normalize_row)
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Normalized {} records", records.len());

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RawRow {
        RawRow {
            line: 2,
            id: "198507010001".to_string(),
            year: "1985".to_string(),
            month: "7".to_string(),
            day: "0".to_string(),
            country: "United States".to_string(),
            region: "California".to_string(),
            latitude: "34.05".to_string(),
            longitude: "-118.24".to_string(),
            target: "Business".to_string(),
            weapon: "Explosives/Bombs/Dynamite".to_string(),
            fatalities: String::new(),
            injuries: "3".to_string(),
        }
    }

    #[test]
    fn blank_fatalities_become_zero() {
        let record = normalize_row(&row()).unwrap();
        assert_eq!(record.id, 198_507_010_001);
        assert_eq!(record.year, 1985);
        assert_eq!(record.month, 7);
        assert_eq!(record.day, 0);
        assert_eq!(record.fatalities, 0);
        assert_eq!(record.injuries, 3);
    }

    #[test]
    fn fractional_counts_truncate() {
        let mut raw = row();
        raw.fatalities = "4.0".to_string();
        raw.injuries = "2.75".to_string();
        let record = normalize_row(&raw).unwrap();
        assert_eq!(record.fatalities, 4);
        assert_eq!(record.injuries, 2);
    }

    #[test]
    fn blank_coordinates_are_none() {
        let mut raw = row();
        raw.latitude = String::new();
        raw.longitude = " ".to_string();
        let record = normalize_row(&raw).unwrap();
        assert_eq!(record.latitude, None);
        assert_eq!(record.longitude, None);
    }

    #[test]
    fn invalid_count_names_the_event() {
        let mut raw = row();
        raw.injuries = "-5".to_string();
        let err = normalize_row(&raw).unwrap_err();
        assert!(
            matches!(
                err,
                SourceError::Parse {
                    line: 2,
                    id: Some(198_507_010_001),
                    ..
                }
            ),
            "{err}"
        );
        assert!(err.to_string().contains("event 198507010001"));
    }

    #[test]
    fn invalid_id_has_no_event() {
        let mut raw = row();
        raw.id = "abc".to_string();
        let err = normalize_row(&raw).unwrap_err();
        assert!(matches!(err, SourceError::Parse { id: None, .. }), "{err}");
    }

    #[test]
    fn normalize_all_stops_at_first_error() {
        let mut bad = row();
        bad.line = 3;
        bad.year = "unknown".to_string();
        let err = normalize_all(&[row(), bad]).unwrap_err();
        assert!(matches!(err, SourceError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn normalized_counts_are_always_defined() {
        let cells = ["", "0", "1", "2.5", "  7 "];
        for fatalities in cells {
            for injuries in cells {
                let mut raw = row();
                raw.fatalities = fatalities.to_string();
                raw.injuries = injuries.to_string();
                let record = normalize_row(&raw).unwrap();
                assert!(record.fatalities <= 7 && record.injuries <= 7);
            }
        }
    }
}
