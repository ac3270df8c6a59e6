//! Delimited file loader.
//!
//! Reads a dataset file in a single pass, keeping only the columns named in
//! the [`ColumnMapping`] and decoding each kept cell with the configured
//! [`Encoding`]. The file is closed before any transformation runs.
//!
//! Progress is reported in bytes consumed, so a caller that knows the file
//! size can show a sized bar.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use crate::SourceError;
use crate::dataset_def::{ColumnMapping, DatasetDefinition, Encoding};
use crate::parsing::parse_integer;
use crate::progress::ProgressCallback;

/// One source row reduced to the mapped columns, still as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// One-based line number in the source file.
    pub line: u64,
    /// Event identifier cell.
    pub id: String,
    /// Year cell.
    pub year: String,
    /// Month cell.
    pub month: String,
    /// Day cell.
    pub day: String,
    /// Country cell.
    pub country: String,
    /// Region cell.
    pub region: String,
    /// Latitude cell.
    pub latitude: String,
    /// Longitude cell.
    pub longitude: String,
    /// Target category cell.
    pub target: String,
    /// Weapon category cell.
    pub weapon: String,
    /// Fatality count cell.
    pub fatalities: String,
    /// Injury count cell.
    pub injuries: String,
}

/// Reader settings derived from a [`DatasetDefinition`].
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Column positions to extract.
    pub columns: ColumnMapping,
    /// Cell text encoding.
    pub encoding: Encoding,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl LoadOptions {
    /// Builds loader settings from a dataset definition.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the delimiter is not ASCII.
    pub fn from_definition(def: &DatasetDefinition) -> Result<Self, SourceError> {
        Ok(Self {
            columns: def.columns,
            encoding: def.encoding,
            delimiter: def.delimiter_byte()?,
        })
    }
}

/// Loads every row of the file at `path`.
///
/// # Errors
///
/// Returns [`SourceError::FileNotFound`] if `path` does not exist, and
/// any error [`load_reader`] returns.
pub fn load_file(
    path: &Path,
    options: &LoadOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<RawRow>, SourceError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SourceError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => SourceError::Io(e),
    })?;
    progress.set_total(file.metadata()?.len());

    log::info!("Loading incidents from {}", path.display());
    let rows = load_reader(BufReader::new(file), options, progress)?;
    log::info!("Loaded {} rows from {}", rows.len(), path.display());

    Ok(rows)
}

/// Loads every row from `reader`. The first row is treated as a header and
/// skipped. `progress` is advanced by the number of bytes read, header
/// included.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if a row is narrower than the column
/// mapping requires or a kept cell cannot be decoded, and
/// [`SourceError::Csv`] if the input is not well-formed delimited text.
pub fn load_reader<R: Read>(
    reader: R,
    options: &LoadOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<RawRow>, SourceError> {
    let width = options.columns.required_width();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header_width = reader.byte_headers()?.len();
    if header_width < width {
        return Err(SourceError::Parse {
            line: 1,
            id: None,
            message: format!("header has {header_width} columns, expected at least {width}"),
        });
    }

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    let mut consumed = 0;

    while reader.read_byte_record(&mut record)? {
        let line = record.position().map_or(0, csv::Position::line);

        if record.len() < width {
            return Err(SourceError::Parse {
                line,
                id: row_id(&record, options),
                message: format!("row has {} columns, expected at least {width}", record.len()),
            });
        }

        rows.push(extract_row(&record, line, options)?);

        let position = reader.position().byte();
        progress.inc(position - consumed);
        consumed = position;
    }
    progress.inc(reader.position().byte() - consumed);

    progress.finish(format!("loaded {} rows", rows.len()));

    Ok(rows)
}

/// Best-effort event id for diagnostics on a row that failed to load.
fn row_id(record: &csv::ByteRecord, options: &LoadOptions) -> Option<i64> {
    let bytes = record.get(options.columns.id)?;
    let text = options.encoding.decode(bytes).ok()?;
    parse_integer(&text)
}

fn extract_row(
    record: &csv::ByteRecord,
    line: u64,
    options: &LoadOptions,
) -> Result<RawRow, SourceError> {
    let cell = |index: usize, name: &str| -> Result<String, SourceError> {
        let bytes = record.get(index).unwrap_or_default();
        options
            .encoding
            .decode(bytes)
            .map_err(|e| SourceError::Parse {
                line,
                id: row_id(record, options),
                message: format!("{name} column is not valid {}: {e}", options.encoding),
            })
    };

    let columns = &options.columns;

    Ok(RawRow {
        line,
        id: cell(columns.id, "id")?,
        year: cell(columns.year, "year")?,
        month: cell(columns.month, "month")?,
        day: cell(columns.day, "day")?,
        country: cell(columns.country, "country")?,
        region: cell(columns.region, "region")?,
        latitude: cell(columns.latitude, "latitude")?,
        longitude: cell(columns.longitude, "longitude")?,
        target: cell(columns.target, "target")?,
        weapon: cell(columns.weapon, "weapon")?,
        fatalities: cell(columns.fatalities, "fatalities")?,
        injuries: cell(columns.injuries, "injuries")?,
    })
}
