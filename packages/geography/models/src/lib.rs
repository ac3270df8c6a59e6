#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic reference data.
//!
//! These tables are compiled into the binary and never derived from the
//! incident data. They are used to normalize per-region incident counts
//! against population.

pub mod states;

use serde::Serialize;

/// One row of a region population table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePopulation {
    /// Two-letter abbreviation (e.g. "DC", "IL").
    pub code: &'static str,
    /// Full name as spelled in incident datasets (e.g. "District of Columbia").
    pub name: &'static str,
    /// Population estimate in persons.
    pub population: u64,
}

impl StatePopulation {
    /// Creates a table row.
    #[must_use]
    pub const fn new(code: &'static str, name: &'static str, population: u64) -> Self {
        Self {
            code,
            name,
            population,
        }
    }
}

/// Finds the row whose full name equals `name` exactly.
#[must_use]
pub fn find_by_name<'a>(table: &'a [StatePopulation], name: &str) -> Option<&'a StatePopulation> {
    table.iter().find(|s| s.name == name)
}

/// Finds the row whose code matches `code`, ignoring ASCII case.
#[must_use]
pub fn find_by_code<'a>(table: &'a [StatePopulation], code: &str) -> Option<&'a StatePopulation> {
    table.iter().find(|s| s.code.eq_ignore_ascii_case(code))
}
