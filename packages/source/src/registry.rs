//! Dataset registry: loads all dataset definitions from embedded TOML.
//!
//! Each `.toml` file in `packages/source/datasets/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a dataset is a matter of
//! creating a TOML file and listing it below.

use crate::SourceError;
use crate::dataset_def::{DatasetDefinition, parse_dataset_toml};

/// TOML configs embedded at compile time.
const DATASET_TOMLS: &[(&str, &str)] = &[("gtd_usa", include_str!("../datasets/gtd_usa.toml"))];

/// Identifier of the dataset used when none is requested.
pub const DEFAULT_DATASET: &str = "gtd_usa";

/// Returns all embedded dataset definitions.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if any embedded TOML is malformed.
pub fn all_datasets() -> Result<Vec<DatasetDefinition>, SourceError> {
    DATASET_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_dataset_toml(toml).map_err(|e| SourceError::Config {
                message: format!("{name}.toml: {e}"),
            })
        })
        .collect()
}

/// Looks up an embedded dataset by identifier.
///
/// # Errors
///
/// Returns [`SourceError::UnknownDataset`] if no dataset has the given id,
/// or [`SourceError::Config`] if the embedded TOML is malformed.
pub fn find_dataset(id: &str) -> Result<DatasetDefinition, SourceError> {
    all_datasets()?
        .into_iter()
        .find(|def| def.id == id)
        .ok_or_else(|| SourceError::UnknownDataset { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use terror_map_analytics_models::RateCorrection;

    use super::*;
    use crate::dataset_def::Encoding;

    #[test]
    fn loads_all_datasets() {
        let datasets = all_datasets().unwrap();
        assert_eq!(datasets.len(), DATASET_TOMLS.len());
        for (name, _) in DATASET_TOMLS {
            assert!(
                datasets.iter().any(|d| d.id == *name),
                "{name}.toml id does not match its registry key"
            );
        }
    }

    #[test]
    fn gtd_usa_matches_reference_constants() {
        let def = find_dataset(DEFAULT_DATASET).unwrap();
        assert_eq!(def.encoding, Encoding::Latin1);
        assert_eq!(def.filter.target_country, "United States");
        assert_eq!(def.filter.excluded_region.as_deref(), Some("Puerto Rico"));

        let c = def.columns;
        assert_eq!(
            [
                c.id,
                c.year,
                c.month,
                c.day,
                c.country,
                c.region,
                c.latitude,
                c.longitude,
                c.target,
                c.weapon,
                c.fatalities,
                c.injuries
            ],
            [0, 1, 2, 3, 8, 11, 13, 14, 35, 84, 100, 103]
        );

        assert_eq!((def.years.first, def.years.last), (1970, 2015));
        assert_eq!(def.years.missing, vec![1993]);
        assert_eq!(
            def.rate_corrections,
            vec![RateCorrection {
                region: "DC".to_string(),
                divisor: 6.0,
            }]
        );
    }

    #[test]
    fn unknown_dataset() {
        assert!(matches!(
            find_dataset("gtd_mars"),
            Err(SourceError::UnknownDataset { .. })
        ));
    }
}
