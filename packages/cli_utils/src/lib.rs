#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal helpers shared by the terror map binaries.
//!
//! [`IndicatifProgress`] renders pipeline progress through the
//! [`ProgressCallback`] trait, and [`init_logger`] routes `log` output
//! through `indicatif-log-bridge` so log lines don't tear the bars.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use terror_map_source::progress::ProgressCallback;

pub use indicatif::MultiProgress;

const TICK: Duration = Duration::from_millis(100);

/// An `indicatif` [`ProgressBar`] driven through [`ProgressCallback`].
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Applied when `set_total()` makes the length known.
    sized_style: ProgressStyle,
}

fn style(template: &str, fallback: fn() -> ProgressStyle) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| fallback())
}

impl IndicatifProgress {
    /// Byte-count spinner for reading an input file. Switches to a sized
    /// bar once the loader reports the file length via `set_total()`.
    #[must_use]
    pub fn records_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(TICK);
        bar.set_style(style(
            "{spinner:.cyan} {msg} {bytes} [{elapsed}]",
            ProgressStyle::default_spinner,
        ));
        bar.set_message(message.to_string());

        let sized_style = style(
            "  {msg} {wide_bar:.cyan/dim} {bytes}/{total_bytes} {percent}% [{eta}]",
            ProgressStyle::default_bar,
        )
        .progress_chars("##-");

        Arc::new(Self { bar, sized_style })
    }

    /// Bar over a known number of pipeline stages.
    #[must_use]
    pub fn steps_bar(multi: &MultiProgress, message: &str, total: u64) -> Arc<dyn ProgressCallback> {
        let sized_style = style(
            "{prefix} {wide_bar:.green/dim} {pos}/{len} {msg} [{elapsed_precise}]",
            ProgressStyle::default_bar,
        )
        .progress_chars("##-");

        let bar = multi.add(ProgressBar::new(total));
        bar.set_style(sized_style.clone());
        bar.set_prefix(message.to_string());

        Arc::new(Self { bar, sized_style })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.sized_style.clone());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs `pretty_env_logger` (configured from `RUST_LOG`) behind
/// `indicatif-log-bridge`.
///
/// Returns the [`MultiProgress`] that progress bars must be added to for
/// log output to be suspended while they redraw.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Already installed when called twice in one process.
    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }

    multi
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    #[test]
    fn hidden_bars_accept_progress() {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());

        let rows = IndicatifProgress::records_bar(&multi, "Reading rows");
        rows.inc(10);
        rows.set_total(20);
        rows.inc(5);
        rows.finish("done".to_string());

        let steps = IndicatifProgress::steps_bar(&multi, "Pipeline", 5);
        steps.set_message("load".to_string());
        steps.inc(1);
        steps.finish("done".to_string());
    }

    #[test]
    fn logger_init_is_repeatable() {
        let _ = init_logger();
        let _ = init_logger();
        log::info!("still logging");
    }
}
