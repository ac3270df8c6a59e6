#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI tool for generating terrorism incident charts.
//!
//! Loads an embedded dataset, deduplicates its incidents, and writes map,
//! per-year, and per-state figures as JSON. With no subcommand every figure
//! is generated; `interactive` opens a menu instead.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use terror_map_generate::{
    FigureKind, GenerateArgs, PipelineProgress, dataset_listing, generate, interactive,
    run_pipeline, summary_table,
};
use terror_map_source::registry::DEFAULT_DATASET;

#[derive(Parser)]
#[command(name = "terror_map_generate", about = "Terrorism incident chart generator")]
struct Cli {
    /// Embedded dataset to process
    #[arg(long, global = true, default_value = DEFAULT_DATASET)]
    dataset: String,

    /// Input file, overriding the dataset's configured path
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Directory to write figures into (default: data/generated)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Generate every figure (the default)
    All,
    /// Generate the incident location map
    Map,
    /// Generate the incidents-per-year chart
    Years,
    /// Generate the incidents-per-100k state map
    States,
    /// Print the per-year and per-state tables
    Summary,
    /// List embedded datasets
    Datasets,
    /// Choose what to generate from a menu
    Interactive,
}

impl Cli {
    fn resolved_command(&self) -> Commands {
        self.command.unwrap_or(Commands::All)
    }
}

/// Figures written by a generating command; `None` for the others.
const fn figures_for(command: Commands) -> Option<&'static [FigureKind]> {
    match command {
        Commands::All => Some(&FigureKind::ALL),
        Commands::Map => Some(&[FigureKind::Map]),
        Commands::Years => Some(&[FigureKind::Years]),
        Commands::States => Some(&[FigureKind::States]),
        Commands::Summary | Commands::Datasets | Commands::Interactive => None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = terror_map_cli_utils::init_logger();
    let cli = Cli::parse();
    let command = cli.resolved_command();

    let args = GenerateArgs {
        dataset: cli.dataset,
        input: cli.input,
        output_dir: cli.output_dir,
    };

    let Some(kinds) = figures_for(command) else {
        match command {
            Commands::Summary => {
                let def = args.resolve_dataset()?;
                let run = run_pipeline(&def, &PipelineProgress::bars(&multi))?;
                print!("{}", summary_table(&run));
            }
            Commands::Datasets => print!("{}", dataset_listing()?),
            _ => interactive::run(&args, &multi)?,
        }
        return Ok(());
    };

    let written = generate(&args, kinds, &PipelineProgress::bars(&multi))?;
    log::info!(
        "Wrote {} files to {}",
        written.len(),
        args.resolved_output_dir().display()
    );

    Ok(())
}
