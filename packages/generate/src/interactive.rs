//! Interactive menu for the generate tool.
//!
//! Provides a terminal-based UI using `dialoguer` that lets users pick which
//! figures to generate without memorizing CLI flags.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use terror_map_cli_utils::MultiProgress;

use crate::{
    FigureKind, GenerateArgs, PipelineProgress, dataset_listing, generate, run_pipeline,
    summary_table,
};

/// Runs the interactive generation menu.
///
/// `defaults` seeds the dataset and output directory prompts.
///
/// # Errors
///
/// Returns an error if user input, dataset lookup, or generation fails.
pub fn run(defaults: &GenerateArgs, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let choices = &[
        "Generate all figures",
        "Generate map",
        "Generate yearly chart",
        "Generate state rate map",
        "Print summary tables",
        "List datasets",
    ];

    let selection = Select::new()
        .with_prompt("What would you like to do?")
        .items(choices)
        .default(0)
        .interact()?;

    if selection == 5 {
        print!("{}", dataset_listing()?);
        return Ok(());
    }

    let dataset: String = Input::new()
        .with_prompt("Dataset")
        .default(defaults.dataset.clone())
        .interact_text()?;

    let default_dir = defaults.resolved_output_dir().display().to_string();
    let dir: String = Input::new()
        .with_prompt("Output directory")
        .default(default_dir)
        .interact_text()?;

    let args = GenerateArgs {
        dataset: dataset.trim().to_string(),
        input: defaults.input.clone(),
        output_dir: Some(PathBuf::from(dir.trim())),
    };

    let kinds: &[FigureKind] = match selection {
        0 => &FigureKind::ALL,
        1 => &[FigureKind::Map],
        2 => &[FigureKind::Years],
        3 => &[FigureKind::States],
        _ => {
            let def = args.resolve_dataset()?;
            let run = run_pipeline(&def, &PipelineProgress::bars(multi))?;
            print!("{}", summary_table(&run));
            return Ok(());
        }
    };

    let written = generate(&args, kinds, &PipelineProgress::bars(multi))?;
    log::info!("Wrote {} files", written.len());

    Ok(())
}
