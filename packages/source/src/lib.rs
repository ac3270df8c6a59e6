#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident dataset loading and normalization.
//!
//! Each input extract is described by a [`dataset_def::DatasetDefinition`]
//! embedded at compile time. The [`loader`] reads the raw delimited file
//! into [`loader::RawRow`]s and the [`normalize`] module turns those into
//! typed [`terror_map_incident_models::IncidentRecord`]s.

pub mod dataset_def;
pub mod loader;
pub mod normalize;
pub mod parsing;
pub mod progress;
pub mod registry;

use std::path::{Path, PathBuf};

/// Errors that can occur while loading or normalizing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The input file does not exist.
    #[error("Input file not found: {}", .path.display())]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A row could not be decoded or parsed.
    #[error("Parse error on line {line}{}: {message}", event_suffix(*.id))]
    Parse {
        /// One-based line number in the source file.
        line: u64,
        /// Event identifier of the offending row, when it could be read.
        id: Option<i64>,
        /// Description of what went wrong.
        message: String,
    },

    /// The CSV reader rejected the file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dataset definition is invalid.
    #[error("Dataset config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// No embedded dataset has the requested identifier.
    #[error("Unknown dataset '{id}'")]
    UnknownDataset {
        /// The identifier that was requested.
        id: String,
    },
}

fn event_suffix(id: Option<i64>) -> String {
    id.map(|id| format!(" (event {id})")).unwrap_or_default()
}

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR` so relative dataset
/// and output paths do not depend on the caller's working directory. Falls
/// back to the current directory if the manifest directory is too shallow.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
