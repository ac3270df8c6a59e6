//! Config-driven dataset definition.
//!
//! [`DatasetDefinition`] captures everything specific to one incident
//! extract (where it lives, how it is encoded, which columns hold which
//! fields, and which data-specific corrections apply) in a serializable
//! config struct. Definitions are parsed from TOML.

use std::path::PathBuf;

use serde::Deserialize;
use strum_macros::{AsRefStr, Display, EnumString};
use terror_map_analytics_models::{FilterCriteria, RateCorrection, YearAxis};

use crate::SourceError;

// ── Top-level dataset definition ─────────────────────────────────────────

/// A complete dataset definition.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"gtd_usa"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Path to the delimited source file. Relative paths are resolved
    /// against the project root.
    pub path: PathBuf,
    /// Text encoding of the source file.
    #[serde(default)]
    pub encoding: Encoding,
    /// Field delimiter. Must be a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Row predicate applied before deduplication.
    pub filter: FilterCriteria,
    /// Column positions of each field.
    pub columns: ColumnMapping,
    /// Declared year axis for the per-year chart.
    pub years: YearAxis,
    /// Manual per-region rate adjustments.
    #[serde(default)]
    pub rate_corrections: Vec<RateCorrection>,
}

const fn default_delimiter() -> char {
    ','
}

impl DatasetDefinition {
    /// Returns the delimiter as the byte the CSV reader expects.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the delimiter is not ASCII.
    pub fn delimiter_byte(&self) -> Result<u8, SourceError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| SourceError::Config {
                message: format!(
                    "[{}] delimiter '{}' is not a single ASCII character",
                    self.id, self.delimiter
                ),
            })
    }

    /// Returns the source file path, resolving relative paths against the
    /// project root.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            crate::project_root().join(&self.path)
        }
    }
}

// ── Encoding ─────────────────────────────────────────────────────────────

/// Text encoding of a source file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Encoding {
    /// ISO-8859-1: every byte maps to the Unicode scalar of the same value.
    #[default]
    #[serde(rename = "iso-8859-1", alias = "latin1")]
    #[strum(to_string = "iso-8859-1", serialize = "latin1")]
    Latin1,
    /// Strict UTF-8.
    #[serde(rename = "utf-8", alias = "utf8")]
    #[strum(to_string = "utf-8", serialize = "utf8")]
    Utf8,
}

impl Encoding {
    /// Decodes one field.
    ///
    /// # Errors
    ///
    /// Returns the UTF-8 error if the encoding is [`Encoding::Utf8`] and
    /// `bytes` is not valid UTF-8. Latin-1 decoding cannot fail.
    pub fn decode(self, bytes: &[u8]) -> Result<String, std::str::Utf8Error> {
        match self {
            Self::Latin1 => Ok(bytes.iter().copied().map(char::from).collect()),
            Self::Utf8 => std::str::from_utf8(bytes).map(str::to_owned),
        }
    }
}

// ── Column mapping ───────────────────────────────────────────────────────

/// Zero-based column positions of each incident field in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ColumnMapping {
    /// Event identifier.
    pub id: usize,
    /// Year of occurrence.
    pub year: usize,
    /// Month of occurrence.
    pub month: usize,
    /// Day of occurrence (`0` = unknown).
    pub day: usize,
    /// Country name.
    pub country: usize,
    /// State/province name.
    pub region: usize,
    /// Latitude.
    pub latitude: usize,
    /// Longitude.
    pub longitude: usize,
    /// Primary target category.
    pub target: usize,
    /// Primary weapon category.
    pub weapon: usize,
    /// Number killed.
    pub fatalities: usize,
    /// Number wounded.
    pub injuries: usize,
}

impl ColumnMapping {
    /// Minimum number of columns a row must have for every mapped position
    /// to exist.
    #[must_use]
    pub fn required_width(&self) -> usize {
        [
            self.id,
            self.year,
            self.month,
            self.day,
            self.country,
            self.region,
            self.latitude,
            self.longitude,
            self.target,
            self.weapon,
            self.fatalities,
            self.injuries,
        ]
        .into_iter()
        .max()
        .map_or(0, |max| max + 1)
    }
}

/// Parses a TOML string into a [`DatasetDefinition`].
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetDefinition, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    const MINIMAL: &str = r#"
id = "test"
name = "Test"
path = "incidents.csv"

[filter]
target_country = "United States"

[columns]
id = 0
year = 1
month = 2
day = 3
country = 4
region = 5
latitude = 6
longitude = 7
target = 8
weapon = 9
fatalities = 10
injuries = 11

[years]
first = 2000
last = 2002
"#;

    #[test]
    fn parses_minimal_definition_with_defaults() {
        let def = parse_dataset_toml(MINIMAL).unwrap();
        assert_eq!(def.id, "test");
        assert_eq!(def.encoding, Encoding::Latin1);
        assert_eq!(def.delimiter_byte().unwrap(), b',');
        assert!(def.rate_corrections.is_empty());
        assert_eq!(def.filter.excluded_region, None);
        assert_eq!(def.columns.required_width(), 12);
    }

    #[test]
    fn relative_path_resolves_against_project_root() {
        let def = parse_dataset_toml(MINIMAL).unwrap();
        let resolved = def.resolved_path();
        assert!(resolved.starts_with(crate::project_root()));
        assert!(resolved.ends_with("incidents.csv"));
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        let toml = MINIMAL.replace("path =", "delimiter = \"§\"\npath =");
        let def = parse_dataset_toml(&toml).unwrap();
        assert!(matches!(
            def.delimiter_byte(),
            Err(SourceError::Config { .. })
        ));
    }

    #[test]
    fn rejects_missing_columns_table() {
        let toml = MINIMAL.replace("[columns]", "[unused]");
        assert!(matches!(
            parse_dataset_toml(&toml),
            Err(SourceError::Config { .. })
        ));
    }

    #[test]
    fn encoding_names() {
        assert_eq!(Encoding::from_str("latin1").unwrap(), Encoding::Latin1);
        assert_eq!(Encoding::from_str("iso-8859-1").unwrap(), Encoding::Latin1);
        assert_eq!(Encoding::from_str("utf-8").unwrap(), Encoding::Utf8);
        assert_eq!(Encoding::Latin1.to_string(), "iso-8859-1");
    }

    #[test]
    fn latin1_maps_high_bytes() {
        assert_eq!(Encoding::Latin1.decode(b"Qu\xe9bec").unwrap(), "Québec");
    }

    #[test]
    fn utf8_rejects_invalid_bytes() {
        assert!(Encoding::Utf8.decode(b"Qu\xe9bec").is_err());
        assert_eq!(Encoding::Utf8.decode("Québec".as_bytes()).unwrap(), "Québec");
    }
}
