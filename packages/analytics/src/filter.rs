//! Row filter applied before deduplication.

use terror_map_analytics_models::FilterCriteria;
use terror_map_incident_models::IncidentRecord;

/// Whether a record passes the filter: country equals the target, region is
/// not the excluded region, and longitude is present and negative.
#[must_use]
pub fn matches(record: &IncidentRecord, criteria: &FilterCriteria) -> bool {
    record.country == criteria.target_country
        && criteria
            .excluded_region
            .as_deref()
            .is_none_or(|excluded| record.region != excluded)
        && record.longitude.is_some_and(|lon| lon < 0.0)
}

/// Keeps only the records that pass [`matches`], preserving input order.
#[must_use]
pub fn filter_incidents(
    records: Vec<IncidentRecord>,
    criteria: &FilterCriteria,
) -> Vec<IncidentRecord> {
    let total = records.len();
    let kept: Vec<_> = records
        .into_iter()
        .filter(|record| matches(record, criteria))
        .collect();

    log::info!(
        "Filtered {total} records to {} in {}",
        kept.len(),
        criteria.target_country
    );

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> FilterCriteria {
        FilterCriteria {
            target_country: "United States".to_string(),
            excluded_region: Some("Puerto Rico".to_string()),
        }
    }

    fn record(id: i64, country: &str, region: &str, longitude: Option<f64>) -> IncidentRecord {
        IncidentRecord {
            id,
            year: 1990,
            month: 5,
            day: 4,
            country: country.to_string(),
            region: region.to_string(),
            latitude: Some(35.0),
            longitude,
            target: "Business".to_string(),
            weapon: "Incendiary".to_string(),
            fatalities: 0,
            injuries: 0,
        }
    }

    #[test]
    fn keeps_target_country_rows() {
        assert!(matches(
            &record(1, "United States", "Texas", Some(-97.0)),
            &criteria()
        ));
    }

    #[test]
    fn drops_other_countries() {
        assert!(!matches(
            &record(1, "Canada", "Ontario", Some(-79.0)),
            &criteria()
        ));
    }

    #[test]
    fn drops_excluded_region() {
        assert!(!matches(
            &record(1, "United States", "Puerto Rico", Some(-66.1)),
            &criteria()
        ));
    }

    #[test]
    fn drops_missing_or_non_negative_longitude() {
        let c = criteria();
        assert!(!matches(&record(1, "United States", "Texas", None), &c));
        assert!(!matches(&record(2, "United States", "Guam", Some(144.8)), &c));
        assert!(!matches(&record(3, "United States", "Texas", Some(0.0)), &c));
    }

    #[test]
    fn no_excluded_region_keeps_everything_in_country() {
        let c = FilterCriteria {
            excluded_region: None,
            ..criteria()
        };
        assert!(matches(
            &record(1, "United States", "Puerto Rico", Some(-66.1)),
            &c
        ));
    }

    #[test]
    fn retained_records_satisfy_predicate() {
        let records = vec![
            record(1, "United States", "Texas", Some(-97.0)),
            record(2, "United States", "Puerto Rico", Some(-66.1)),
            record(3, "Mexico", "Sonora", Some(-110.0)),
            record(4, "United States", "New York", Some(-74.0)),
            record(5, "United States", "Hawaii", None),
        ];
        let kept = filter_incidents(records, &criteria());
        assert_eq!(kept.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 4]);
        for r in &kept {
            assert_eq!(r.country, "United States");
            assert_ne!(r.region, "Puerto Rico");
            assert!(r.longitude.unwrap() < 0.0);
        }
    }
}
