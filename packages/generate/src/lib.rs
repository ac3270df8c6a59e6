#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart generation for terrorism incident datasets.
//!
//! Runs the full batch pipeline (load, normalize, filter, date resolution,
//! deduplication, aggregation) for one embedded dataset and writes the
//! resulting chart figures as JSON, along with a `metadata.json` describing
//! the run.

pub mod figures;
pub mod interactive;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};
use terror_map_analytics::{AnalyticsError, IncidentViews};
use terror_map_cli_utils::{IndicatifProgress, MultiProgress};
use terror_map_geography_models::states::STATE_POPULATIONS;
use terror_map_source::SourceError;
use terror_map_source::dataset_def::DatasetDefinition;
use terror_map_source::loader::{self, LoadOptions, RawRow};
use terror_map_source::progress::{ProgressCallback, null_progress};
use terror_map_source::registry;
use thiserror::Error;

use crate::figures::ChartContext;

/// Name of the run metadata file written next to the figures.
pub const METADATA_FILE: &str = "metadata.json";

/// Pipeline stages reported to the stage progress bar, in order.
const STAGES: &[&str] = &["load", "normalize", "filter", "dedup", "aggregate"];

/// Errors that can occur while generating figures.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Loading or normalizing the dataset failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Deduplication or aggregation failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// Writing an output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing an output file failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A chart figure the tool can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FigureKind {
    /// Scatter map of incident locations.
    Map,
    /// Incident count per year.
    Years,
    /// Incidents per 100,000 people by state.
    States,
}

impl FigureKind {
    /// Every figure, in output order.
    pub const ALL: [Self; 3] = [Self::Map, Self::Years, Self::States];

    /// File name of the figure inside the output directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Map => "map.json",
            Self::Years => "years.json",
            Self::States => "states.json",
        }
    }
}

/// Returns the default output directory for generated files.
#[must_use]
pub fn output_dir() -> PathBuf {
    terror_map_source::project_root().join("data/generated")
}

/// Options shared by every generation entry point.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Embedded dataset identifier.
    pub dataset: String,

    /// Overrides the dataset's input file path.
    pub input: Option<PathBuf>,

    /// Overrides the output directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            dataset: registry::DEFAULT_DATASET.to_string(),
            input: None,
            output_dir: None,
        }
    }
}

impl GenerateArgs {
    /// Looks up the requested dataset and applies the input override.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnknownDataset`] if no embedded dataset has
    /// the requested id.
    pub fn resolve_dataset(&self) -> Result<DatasetDefinition, SourceError> {
        let mut def = registry::find_dataset(&self.dataset)?;
        if let Some(input) = &self.input {
            def.path.clone_from(input);
        }
        Ok(def)
    }

    /// Output directory to write into.
    #[must_use]
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(output_dir)
    }
}

/// Progress sinks for a pipeline run.
pub struct PipelineProgress {
    /// Advanced by the bytes read from the input file.
    pub rows: Arc<dyn ProgressCallback>,
    /// Advanced once per completed stage.
    pub stages: Arc<dyn ProgressCallback>,
}

impl PipelineProgress {
    /// Progress that reports nothing.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            rows: null_progress(),
            stages: null_progress(),
        }
    }

    /// Terminal progress bars attached to `multi`.
    #[must_use]
    pub fn bars(multi: &MultiProgress) -> Self {
        Self {
            stages: IndicatifProgress::steps_bar(multi, "Pipeline", STAGES.len() as u64),
            rows: IndicatifProgress::records_bar(multi, "Reading input"),
        }
    }

    fn stage_done(&self, stage: &str) {
        self.stages.set_message(stage.to_string());
        self.stages.inc(1);
    }
}

/// Record counts after each filtering stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    /// Rows read from the input file.
    pub loaded: usize,
    /// Records that passed the row filter.
    pub filtered: usize,
    /// Records left after deduplication.
    pub deduplicated: usize,
}

/// The outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// The dataset that was processed.
    pub dataset: DatasetDefinition,
    /// Record counts per stage.
    pub counts: StageCounts,
    /// Aggregate views of the deduplicated incidents.
    pub views: IncidentViews,
}

impl PipelineRun {
    /// Title values derived from the dataset configuration.
    #[must_use]
    pub fn chart_context(&self) -> ChartContext {
        ChartContext {
            country: self.dataset.filter.target_country.clone(),
            span: self.dataset.years.span_label(),
        }
    }

    /// Builds the figure JSON for `kind`.
    #[must_use]
    pub fn figure(&self, kind: FigureKind) -> Value {
        let context = self.chart_context();
        match kind {
            FigureKind::Map => figures::map_figure(&self.views.map, &context),
            FigureKind::Years => figures::years_figure(&self.views.years, &context),
            FigureKind::States => figures::states_figure(&self.views.regions, &context),
        }
    }
}

/// Loads the dataset's input file and runs every stage over it.
///
/// # Errors
///
/// Returns the first error raised by any stage.
pub fn run_pipeline(
    def: &DatasetDefinition,
    progress: &PipelineProgress,
) -> Result<PipelineRun, GenerateError> {
    let options = LoadOptions::from_definition(def)?;
    let rows = loader::load_file(&def.resolved_path(), &options, &progress.rows)?;
    progress.stage_done(STAGES[0]);

    process_rows(def, &rows, progress)
}

/// Runs every stage after loading over already-read rows.
///
/// # Errors
///
/// Returns the first error raised by normalization, date resolution, or
/// aggregation.
pub fn process_rows(
    def: &DatasetDefinition,
    rows: &[RawRow],
    progress: &PipelineProgress,
) -> Result<PipelineRun, GenerateError> {
    let loaded = rows.len();

    let records = terror_map_source::normalize::normalize_all(rows)?;
    progress.stage_done(STAGES[1]);

    let records = terror_map_analytics::filter::filter_incidents(records, &def.filter);
    let filtered = records.len();
    progress.stage_done(STAGES[2]);

    let dated = terror_map_analytics::dedup::assign_dates(records)?;
    let incidents = terror_map_analytics::dedup::dedup_most_severe(dated);
    progress.stage_done(STAGES[3]);

    let views = terror_map_analytics::aggregate(
        &incidents,
        &def.years,
        STATE_POPULATIONS,
        &def.rate_corrections,
    )?;
    progress.stage_done(STAGES[4]);
    progress
        .stages
        .finish(format!("{} incidents", incidents.len()));

    Ok(PipelineRun {
        dataset: def.clone(),
        counts: StageCounts {
            loaded,
            filtered,
            deduplicated: incidents.len(),
        },
        views,
    })
}

/// Contents of `metadata.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunMetadata<'a> {
    dataset: &'a str,
    generated_at: String,
    counts: StageCounts,
    outputs: Vec<&'static str>,
}

/// Writes `value` as pretty JSON to `path`.
///
/// Uses an atomic write pattern (write to `.tmp`, then rename) so readers
/// never see a half-written file.
fn write_json(path: &Path, value: &impl Serialize) -> Result<(), GenerateError> {
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let contents = serde_json::to_string_pretty(value)?;
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Writes the requested figures and `metadata.json` into `dir`, creating it
/// if needed. Returns the paths written, figures first.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] or [`GenerateError::Json`] if any file
/// cannot be written.
pub fn write_outputs(
    run: &PipelineRun,
    kinds: &[FigureKind],
    dir: &Path,
) -> Result<Vec<PathBuf>, GenerateError> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(kinds.len() + 1);
    for &kind in kinds {
        let path = dir.join(kind.file_name());
        write_json(&path, &run.figure(kind))?;
        log::info!("{kind} figure generated: {}", path.display());
        written.push(path);
    }

    let metadata = RunMetadata {
        dataset: &run.dataset.id,
        generated_at: chrono::Utc::now().to_rfc3339(),
        counts: run.counts,
        outputs: kinds.iter().map(|kind| kind.file_name()).collect(),
    };
    let path = dir.join(METADATA_FILE);
    write_json(&path, &metadata)?;
    log::info!("Run metadata generated: {}", path.display());
    written.push(path);

    Ok(written)
}

/// Resolves the dataset, runs the pipeline, and writes `kinds`.
///
/// # Errors
///
/// Returns the first error from dataset lookup, the pipeline, or writing.
pub fn generate(
    args: &GenerateArgs,
    kinds: &[FigureKind],
    progress: &PipelineProgress,
) -> Result<Vec<PathBuf>, GenerateError> {
    let def = args.resolve_dataset()?;
    let run = run_pipeline(&def, progress)?;
    write_outputs(&run, kinds, &args.resolved_output_dir())
}

/// Formats the per-year and per-region tables as plain text.
#[must_use]
pub fn summary_table(run: &PipelineRun) -> String {
    let mut out = String::new();
    let counts = run.counts;

    let _ = writeln!(out, "Dataset: {} ({})", run.dataset.name, run.dataset.id);
    let _ = writeln!(
        out,
        "Rows: {} loaded, {} after filter, {} after dedup",
        counts.loaded, counts.filtered, counts.deduplicated
    );

    let _ = writeln!(out, "\n{:<6} {:>8}", "Year", "Attacks");
    for (year, count) in run.views.years.axis.iter().zip(run.views.years.series()) {
        let _ = writeln!(out, "{year:<6} {count:>8}");
    }

    let _ = writeln!(
        out,
        "\n{:<4} {:<22} {:>8} {:>10}",
        "Code", "State", "Attacks", "Per 100k"
    );
    for region in &run.views.regions {
        let marker = if region.corrected { "*" } else { "" };
        let _ = writeln!(
            out,
            "{:<4} {:<22} {:>8} {:>10.2}{marker}",
            region.code, region.name, region.count, region.rate
        );
    }

    out
}

/// Formats the embedded dataset definitions as one line each.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if an embedded definition is malformed.
pub fn dataset_listing() -> Result<String, SourceError> {
    let mut out = String::new();
    for def in registry::all_datasets()? {
        let _ = writeln!(
            out,
            "{:<12} {} [{}, {}]",
            def.id,
            def.name,
            def.filter.target_country,
            def.years.span_label()
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    const HEADER: &str = "eventid,iyear,imonth,iday,country_txt,provstate,latitude,longitude,targtype1_txt,weaptype1_txt,nkill,nwound\n";

    fn dataset() -> DatasetDefinition {
        let mut def = registry::find_dataset(registry::DEFAULT_DATASET).unwrap();
        def.columns = terror_map_source::dataset_def::ColumnMapping {
            id: 0,
            year: 1,
            month: 2,
            day: 3,
            country: 4,
            region: 5,
            latitude: 6,
            longitude: 7,
            target: 8,
            weapon: 9,
            fatalities: 10,
            injuries: 11,
        };
        def
    }

    fn rows(body: &str) -> Vec<RawRow> {
        let def = dataset();
        let options = LoadOptions::from_definition(&def).unwrap();
        let input = format!("{HEADER}{body}");
        loader::load_reader(input.as_bytes(), &options, &null_progress()).unwrap()
    }

    fn run(body: &str) -> PipelineRun {
        process_rows(&dataset(), &rows(body), &PipelineProgress::silent()).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "terror_map_generate_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    const BODY: &str = "\
1,2001,9,11,United States,New York,40.7,-74.0,Business,Explosives,5,3
2,2001,9,11,United States,New York,40.7,-74.0,Business,Explosives,5,7
3,1985,7,0,United States,California,34.0,-118.2,Government,Incendiary,0,0
4,1990,1,5,United States,Puerto Rico,18.4,-66.1,Police,Firearms,1,0
5,1990,1,5,Canada,Ontario,43.6,-79.4,Business,Incendiary,0,0
6,1995,4,19,United States,Oklahoma,35.5,-97.5,Government,Explosives,168,650
";

    #[test]
    fn figure_kind_names_round_trip() {
        for kind in FigureKind::ALL {
            assert_eq!(FigureKind::from_str(kind.as_ref()).unwrap(), kind);
        }
        assert_eq!(FigureKind::States.to_string(), "states");
        assert_eq!(FigureKind::Years.file_name(), "years.json");
    }

    #[test]
    fn pipeline_counts_each_stage() {
        let run = run(BODY);
        assert_eq!(
            run.counts,
            StageCounts {
                loaded: 6,
                filtered: 4,
                deduplicated: 3,
            }
        );
        assert_eq!(run.views.years.total(), 3);
        assert_eq!(run.views.map.len(), 3);
    }

    #[test]
    fn pipeline_keeps_most_severe_duplicate() {
        let run = run(BODY);
        let ny = run
            .views
            .map
            .fatal
            .iter()
            .find(|p| p.id == 1 || p.id == 2)
            .unwrap();
        assert_eq!(ny.id, 2);
    }

    #[test]
    fn unknown_region_fails_the_run() {
        let rows = rows("9,2001,1,1,United States,Atlantis,40.0,-70.0,Business,Other,0,0\n");
        let err = process_rows(&dataset(), &rows, &PipelineProgress::silent()).unwrap_err();
        assert!(
            matches!(
                err,
                GenerateError::Analytics(AnalyticsError::Lookup { id: Some(9), .. })
            ),
            "{err}"
        );
    }

    #[test]
    fn input_override_replaces_dataset_path() {
        let args = GenerateArgs {
            input: Some(PathBuf::from("/tmp/other.csv")),
            ..GenerateArgs::default()
        };
        let def = args.resolve_dataset().unwrap();
        assert_eq!(def.resolved_path(), PathBuf::from("/tmp/other.csv"));
    }

    #[test]
    fn unknown_dataset_is_rejected() {
        let args = GenerateArgs {
            dataset: "nope".to_string(),
            ..GenerateArgs::default()
        };
        assert!(matches!(
            args.resolve_dataset(),
            Err(SourceError::UnknownDataset { .. })
        ));
    }

    #[test]
    fn missing_input_file_is_reported() {
        let args = GenerateArgs {
            input: Some(scratch_dir("missing").join("absent.csv")),
            output_dir: Some(scratch_dir("missing_out")),
            ..GenerateArgs::default()
        };
        let err = generate(&args, &FigureKind::ALL, &PipelineProgress::silent()).unwrap_err();
        assert!(
            matches!(err, GenerateError::Source(SourceError::FileNotFound { .. })),
            "{err}"
        );
    }

    #[test]
    fn writes_requested_figures_and_metadata() {
        let run = run(BODY);
        let dir = scratch_dir("outputs");

        let written = write_outputs(&run, &[FigureKind::Map, FigureKind::States], &dir).unwrap();
        assert_eq!(
            written,
            vec![
                dir.join("map.json"),
                dir.join("states.json"),
                dir.join(METADATA_FILE)
            ]
        );
        assert!(!dir.join("years.json").exists());

        let metadata: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join(METADATA_FILE)).unwrap())
                .unwrap();
        assert_eq!(metadata["dataset"], "gtd_usa");
        assert_eq!(metadata["counts"]["deduplicated"], 3);
        assert_eq!(
            metadata["outputs"],
            serde_json::json!(["map.json", "states.json"])
        );
        assert!(metadata["generatedAt"].is_string());

        let states: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("states.json")).unwrap())
                .unwrap();
        assert_eq!(states["data"][0]["locations"].as_array().unwrap().len(), 51);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn summary_lists_axis_years_and_regions() {
        let table = summary_table(&run(BODY));
        assert!(table.contains("Rows: 6 loaded, 4 after filter, 3 after dedup"));
        assert!(table.contains("1970 "));
        assert!(!table.contains("\n1993 "));
        assert!(table.contains("DC   District of Columbia"));
    }

    #[test]
    fn dataset_listing_names_default() {
        let listing = dataset_listing().unwrap();
        assert!(listing.starts_with("gtd_usa"));
        assert!(listing.contains("1970-2015"));
    }
}
